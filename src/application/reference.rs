//! Immutable reference collections loaded once at startup.

use std::borrow::Cow;

use thiserror::Error;
use tracing::info;

use crate::domain::{
    entities::{
        CreatureRecord, EvolutionTypeRecord, ExtinctionLevelRecord, ReferenceRecord, ServiceInfo,
        TypeRecord,
    },
    error::DomainError,
    types::ResourceKind,
};

pub const INFO_FILE: &str = "info.json";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset `{file}` is missing")]
    Missing { file: String },
    #[error("failed to read dataset `{file}`: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("dataset `{file}` is malformed: {source}")]
    Malformed {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl DatasetError {
    pub fn missing(file: impl Into<String>) -> Self {
        Self::Missing { file: file.into() }
    }
}

/// Where the raw dataset bytes come from.
pub trait DatasetSource: Send + Sync {
    fn read(&self, file: &str) -> Result<Cow<'static, [u8]>, DatasetError>;

    /// Human-readable origin used in startup logs.
    fn describe(&self) -> String;
}

/// Records of one kind, kept in ascending identifier order.
///
/// Identifiers are unique; construction fails otherwise.
#[derive(Debug, Clone)]
pub struct ReferenceCollection<T> {
    records: Vec<T>,
}

impl<T: ReferenceRecord> ReferenceCollection<T> {
    pub fn new(mut records: Vec<T>) -> Result<Self, DomainError> {
        records.sort_by_key(|record| record.identifier());

        if let Some(pair) = records
            .windows(2)
            .find(|pair| pair[0].identifier() == pair[1].identifier())
        {
            return Err(DomainError::duplicate_identifier(
                T::KIND,
                pair[0].identifier(),
            ));
        }

        Ok(Self { records })
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, DatasetError> {
        let records: Vec<T> =
            serde_json::from_slice(bytes).map_err(|source| DatasetError::Malformed {
                file: T::KIND.dataset_file().to_string(),
                source,
            })?;
        Ok(Self::new(records)?)
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// All reference data served by the API.
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    types: ReferenceCollection<TypeRecord>,
    creatures: ReferenceCollection<CreatureRecord>,
    extinction_levels: ReferenceCollection<ExtinctionLevelRecord>,
    evolution_types: ReferenceCollection<EvolutionTypeRecord>,
    info: ServiceInfo,
}

impl ReferenceStore {
    pub fn new(
        types: ReferenceCollection<TypeRecord>,
        creatures: ReferenceCollection<CreatureRecord>,
        extinction_levels: ReferenceCollection<ExtinctionLevelRecord>,
        evolution_types: ReferenceCollection<EvolutionTypeRecord>,
        info: ServiceInfo,
    ) -> Self {
        Self {
            types,
            creatures,
            extinction_levels,
            evolution_types,
            info,
        }
    }

    /// Load every dataset from `source`. Any failure is fatal for the process.
    pub fn load(source: &dyn DatasetSource) -> Result<Self, DatasetError> {
        let store = Self {
            types: load_collection(source)?,
            creatures: load_collection(source)?,
            extinction_levels: load_collection(source)?,
            evolution_types: load_collection(source)?,
            info: load_info(source)?,
        };

        info!(
            target = "bestiary::reference",
            source = %source.describe(),
            types = store.types.len(),
            creatures = store.creatures.len(),
            extinction_levels = store.extinction_levels.len(),
            evolution_types = store.evolution_types.len(),
            "Loaded reference datasets"
        );

        Ok(store)
    }

    pub fn collection<T: Stored>(&self) -> &ReferenceCollection<T> {
        T::collection(self)
    }

    pub fn info(&self) -> &ServiceInfo {
        &self.info
    }

    /// Record count per resource kind, in declaration order.
    pub fn counts(&self) -> [(ResourceKind, usize); 4] {
        [
            (ResourceKind::Types, self.types.len()),
            (ResourceKind::Creatures, self.creatures.len()),
            (ResourceKind::ExtinctionLevels, self.extinction_levels.len()),
            (ResourceKind::EvolutionTypes, self.evolution_types.len()),
        ]
    }
}

/// Records that have a collection inside [`ReferenceStore`].
pub trait Stored: ReferenceRecord {
    fn collection(store: &ReferenceStore) -> &ReferenceCollection<Self>;
}

impl Stored for TypeRecord {
    fn collection(store: &ReferenceStore) -> &ReferenceCollection<Self> {
        &store.types
    }
}

impl Stored for CreatureRecord {
    fn collection(store: &ReferenceStore) -> &ReferenceCollection<Self> {
        &store.creatures
    }
}

impl Stored for ExtinctionLevelRecord {
    fn collection(store: &ReferenceStore) -> &ReferenceCollection<Self> {
        &store.extinction_levels
    }
}

impl Stored for EvolutionTypeRecord {
    fn collection(store: &ReferenceStore) -> &ReferenceCollection<Self> {
        &store.evolution_types
    }
}

fn load_collection<T: ReferenceRecord>(
    source: &dyn DatasetSource,
) -> Result<ReferenceCollection<T>, DatasetError> {
    let bytes = source.read(T::KIND.dataset_file())?;
    ReferenceCollection::from_json(&bytes)
}

fn load_info(source: &dyn DatasetSource) -> Result<ServiceInfo, DatasetError> {
    let bytes = source.read(INFO_FILE)?;
    let info: ServiceInfo =
        serde_json::from_slice(&bytes).map_err(|source| DatasetError::Malformed {
            file: INFO_FILE.to_string(),
            source,
        })?;

    if info.name.trim().is_empty() || info.version.trim().is_empty() {
        return Err(DomainError::validation("service info requires a name and a version").into());
    }

    Ok(info)
}
