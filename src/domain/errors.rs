use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid specimen label: {0}")]
    InvalidLabel(String),

    #[error("Invalid SQL identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid container ID: {0}")]
    InvalidContainerId(String),

    #[error("Invalid activity status: {0}")]
    InvalidActivityStatus(String),

    #[error("Invalid schema version: {0}")]
    InvalidSchemaVersion(String),

    #[error("Incomplete form mapping for {form} form: missing field '{field}'")]
    IncompleteFormMapping { form: String, field: String },
}
