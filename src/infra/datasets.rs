//! Dataset sources: the copies embedded at build time or a directory on disk.

use std::{
    borrow::Cow,
    io,
    path::PathBuf,
};

use include_dir::{Dir, include_dir};

use crate::{
    application::reference::{DatasetError, DatasetSource},
    config::DataSettings,
    infra::error::InfraError,
};

static EMBEDDED_DATASETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/data");

/// Datasets compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedDatasets;

impl DatasetSource for EmbeddedDatasets {
    fn read(&self, file: &str) -> Result<Cow<'static, [u8]>, DatasetError> {
        EMBEDDED_DATASETS
            .get_file(file)
            .map(|entry| Cow::Borrowed(entry.contents()))
            .ok_or_else(|| DatasetError::missing(file))
    }

    fn describe(&self) -> String {
        "embedded".to_string()
    }
}

/// Datasets read from a directory at startup.
#[derive(Debug, Clone)]
pub struct DirectoryDatasets {
    root: PathBuf,
}

impl DirectoryDatasets {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, InfraError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(InfraError::dataset(format!(
                "`{}` is not a readable directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }
}

impl DatasetSource for DirectoryDatasets {
    fn read(&self, file: &str) -> Result<Cow<'static, [u8]>, DatasetError> {
        match std::fs::read(self.root.join(file)) {
            Ok(bytes) => Ok(Cow::Owned(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(DatasetError::missing(file)),
            Err(source) => Err(DatasetError::Io {
                file: file.to_string(),
                source,
            }),
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Pick the dataset source configured in `settings`.
pub fn source_from_settings(settings: &DataSettings) -> Result<Box<dyn DatasetSource>, InfraError> {
    Ok(match settings.directory.as_ref() {
        Some(directory) => Box::new(DirectoryDatasets::open(directory)?),
        None => Box::new(EmbeddedDatasets),
    })
}
