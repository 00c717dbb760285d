use async_trait::async_trait;

use crate::application::ports::RepositoryError;
use crate::domain::entities::RegistryTables;
use crate::domain::value_objects::{ContainerId, SqlIdentifier};
#[cfg(test)]
use mockall::{automock, predicate::*};

/// Port for catalog introspection of the registry database
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SchemaInspector: Send + Sync {
    /// Column names of `table`, or `None` when the table does not exist
    async fn table_columns(
        &self,
        table: &SqlIdentifier,
    ) -> Result<Option<Vec<SqlIdentifier>>, RepositoryError>;

    /// Whether a form context with this container id exists
    async fn container_exists(
        &self,
        registry: &RegistryTables,
        container_id: ContainerId,
    ) -> Result<bool, RepositoryError>;
}
