use async_trait::async_trait;
use thiserror::Error;

use crate::application::dto::SpecimenFilter;
use crate::domain::entities::{FormSchema, SpecimenFormRecord};
#[cfg(test)]
use mockall::{automock, predicate::*};

/// SQLSTATE for a missing table
const UNDEFINED_TABLE: &str = "42P01";
/// SQLSTATE for a missing column
const UNDEFINED_COLUMN: &str = "42703";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl RepositoryError {
    /// The query referenced a table or column the database does not have
    pub fn is_undefined_object(&self) -> bool {
        match self {
            RepositoryError::Database(sqlx::Error::Database(db)) => matches!(
                db.code().as_deref(),
                Some(UNDEFINED_TABLE) | Some(UNDEFINED_COLUMN)
            ),
            _ => false,
        }
    }

    /// The store could not be reached; retrying may succeed
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            RepositoryError::Database(
                sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::WorkerCrashed
            )
        )
    }
}

/// Port for reading joined specimen/form rows from the registry
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpecimenFormRepository: Send + Sync {
    /// Eligible specimens joined with their primary form, optional custom
    /// field record and its reason/SOP values, ordered by label then id
    async fn find_records(
        &self,
        schema: &FormSchema,
        filter: &SpecimenFilter,
    ) -> Result<Vec<SpecimenFormRecord>, RepositoryError>;
}
