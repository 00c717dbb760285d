//! Error taxonomy for the lookup use cases
//!
//! Repository failures are classified on the way in so callers can decide
//! between fixing configuration, retrying, or accepting an empty answer.

use std::time::Duration;

use thiserror::Error;

use crate::application::ports::{RepositoryError, SchemaSourceError};

#[derive(Debug, Error)]
pub enum LookupError {
    /// Form mapping does not match the database
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Transient store unavailability
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Lookup timed out after {0:?}")]
    Timeout(Duration),

    /// Result violates the one-row-per-specimen invariant
    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

impl LookupError {
    /// Whether the caller may retry the same call
    pub fn is_transient(&self) -> bool {
        matches!(self, LookupError::Connection(_) | LookupError::Timeout(_))
    }
}

impl From<RepositoryError> for LookupError {
    fn from(err: RepositoryError) -> Self {
        if err.is_undefined_object() {
            LookupError::Configuration(err.to_string())
        } else if err.is_connection_failure() {
            LookupError::Connection(err.to_string())
        } else {
            LookupError::Repository(err)
        }
    }
}

impl From<SchemaSourceError> for LookupError {
    fn from(err: SchemaSourceError) -> Self {
        LookupError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_becomes_connection_error() {
        let err: LookupError = RepositoryError::Database(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(err, LookupError::Connection(_)));
        assert!(err.is_transient());
    }

    #[test]
    fn test_other_repository_errors_pass_through() {
        let err: LookupError = RepositoryError::Database(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, LookupError::Repository(_)));
        assert!(!err.is_transient());
        assert!(err.to_string().contains("Repository error"));
    }

    #[test]
    fn test_schema_source_errors_are_configuration_errors() {
        let err: LookupError = SchemaSourceError::UnknownVersion("v7".to_string()).into();
        assert!(matches!(err, LookupError::Configuration(_)));
        assert!(err.to_string().contains("v7"));
    }

    #[test]
    fn test_timeout_display() {
        let err = LookupError::Timeout(Duration::from_secs(5));
        assert!(err.to_string().contains("5s"));
        assert!(err.is_transient());
    }

    #[test]
    fn test_not_found_is_not_transient() {
        assert!(!LookupError::NotFound("label".to_string()).is_transient());
        assert!(!LookupError::Configuration("x".to_string()).is_transient());
    }
}
