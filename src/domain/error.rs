use thiserror::Error;

use crate::domain::types::ResourceKind;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("duplicate identifier {identifier} in `{kind}` dataset")]
    DuplicateIdentifier { kind: ResourceKind, identifier: u32 },
    #[error("domain validation failed: {message}")]
    Validation { message: String },
}

impl DomainError {
    pub fn duplicate_identifier(kind: ResourceKind, identifier: u32) -> Self {
        Self::DuplicateIdentifier { kind, identifier }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
