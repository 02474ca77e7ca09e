//! Reference records loaded from the bundled datasets.
//!
//! Every record carries its identifier and the attributes the filters need as
//! typed fields. Anything else in the dataset is kept verbatim in `extra` and
//! echoed back in responses.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::domain::types::{FlagAttribute, ResourceKind, SetAttribute};

/// A record that can live in a reference collection.
pub trait ReferenceRecord: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn identifier(&self) -> u32;

    /// Integer-set attribute used by containment filters, if the record has one.
    fn set_attribute(&self, _attribute: SetAttribute) -> Option<&[u32]> {
        None
    }

    /// Boolean attribute used by equality filters, if the record has one.
    fn flag_attribute(&self, _attribute: FlagAttribute) -> Option<bool> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRecord {
    pub id: u32,
    pub name: String,
    pub weaknesses: Vec<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReferenceRecord for TypeRecord {
    const KIND: ResourceKind = ResourceKind::Types;

    fn identifier(&self) -> u32 {
        self.id
    }

    fn set_attribute(&self, attribute: SetAttribute) -> Option<&[u32]> {
        match attribute {
            SetAttribute::Weaknesses => Some(&self.weaknesses),
            SetAttribute::Types => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureRecord {
    pub id: u32,
    pub name: String,
    pub types: Vec<u32>,
    pub starter: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReferenceRecord for CreatureRecord {
    const KIND: ResourceKind = ResourceKind::Creatures;

    fn identifier(&self) -> u32 {
        self.id
    }

    fn set_attribute(&self, attribute: SetAttribute) -> Option<&[u32]> {
        match attribute {
            SetAttribute::Types => Some(&self.types),
            SetAttribute::Weaknesses => None,
        }
    }

    fn flag_attribute(&self, attribute: FlagAttribute) -> Option<bool> {
        match attribute {
            FlagAttribute::Starter => Some(self.starter),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtinctionLevelRecord {
    pub level: u32,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReferenceRecord for ExtinctionLevelRecord {
    const KIND: ResourceKind = ResourceKind::ExtinctionLevels;

    fn identifier(&self) -> u32 {
        self.level
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionTypeRecord {
    #[serde(rename = "type")]
    pub kind: u32,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReferenceRecord for EvolutionTypeRecord {
    const KIND: ResourceKind = ResourceKind::EvolutionTypes;

    fn identifier(&self) -> u32 {
        self.kind
    }
}

/// Name and version reported by the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
}
