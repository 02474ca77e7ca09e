//! Shared domain enumerations for the reference datasets.

use std::fmt;

/// One of the four static datasets served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Types,
    Creatures,
    ExtinctionLevels,
    EvolutionTypes,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Types => "types",
            ResourceKind::Creatures => "dex",
            ResourceKind::ExtinctionLevels => "extinction_levels",
            ResourceKind::EvolutionTypes => "evolution_types",
        }
    }

    /// File name of the dataset inside the data bundle.
    pub fn dataset_file(self) -> &'static str {
        match self {
            ResourceKind::Types => "types.json",
            ResourceKind::Creatures => "dex.json",
            ResourceKind::ExtinctionLevels => "extinction_levels.json",
            ResourceKind::EvolutionTypes => "evolution_types.json",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integer-set attributes that support containment filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetAttribute {
    Types,
    Weaknesses,
}

impl SetAttribute {
    pub fn as_str(self) -> &'static str {
        match self {
            SetAttribute::Types => "types",
            SetAttribute::Weaknesses => "weaknesses",
        }
    }
}

/// Boolean attributes that support equality filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagAttribute {
    Starter,
}

impl FlagAttribute {
    pub fn as_str(self) -> &'static str {
        match self {
            FlagAttribute::Starter => "starter",
        }
    }
}
