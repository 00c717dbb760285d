use async_trait::async_trait;
use sqlx::PgPool;

use super::QueryBuilder;
use crate::application::ports::{RepositoryError, SchemaInspector};
use crate::domain::entities::RegistryTables;
use crate::domain::value_objects::{ContainerId, SqlIdentifier};

/// Schema introspection through `information_schema`
pub struct PostgresSchemaInspector {
    pool: PgPool,
}

impl PostgresSchemaInspector {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchemaInspector for PostgresSchemaInspector {
    async fn table_columns(
        &self,
        table: &SqlIdentifier,
    ) -> Result<Option<Vec<SqlIdentifier>>, RepositoryError> {
        let names = sqlx::query_scalar::<_, String>(QueryBuilder::TABLE_COLUMNS)
            .bind(table.as_str())
            .fetch_all(&self.pool)
            .await?;

        if names.is_empty() {
            return Ok(None);
        }

        // Mappings always name lowercase identifiers; a column that needs quoting
        // to keep its case or characters can never match one
        let columns = names
            .into_iter()
            .filter_map(|name| {
                SqlIdentifier::new(name.as_str())
                    .ok()
                    .filter(|ident| ident.as_str() == name)
            })
            .collect();

        Ok(Some(columns))
    }

    async fn container_exists(
        &self,
        registry: &RegistryTables,
        container_id: ContainerId,
    ) -> Result<bool, RepositoryError> {
        let sql = QueryBuilder::container_exists(registry);
        let exists = sqlx::query_scalar::<_, bool>(&sql)
            .bind(container_id.as_i64())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}
