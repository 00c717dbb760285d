use thiserror::Error;

use crate::domain::entities::FormSchema;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::SchemaVersion;
#[cfg(test)]
use mockall::{automock, predicate::*};

#[derive(Debug, Error)]
pub enum SchemaSourceError {
    #[error("Unknown schema version: {0}")]
    UnknownVersion(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid form mapping: {0}")]
    Invalid(String),
}

impl From<DomainError> for SchemaSourceError {
    fn from(err: DomainError) -> Self {
        SchemaSourceError::Invalid(err.to_string())
    }
}

/// Port resolving a schema version to its form layout
#[cfg_attr(test, automock)]
pub trait FormSchemaSource: Send + Sync {
    fn load(&self, version: &SchemaVersion) -> Result<FormSchema, SchemaSourceError>;

    /// Known versions, sorted
    fn versions(&self) -> Vec<SchemaVersion>;
}
