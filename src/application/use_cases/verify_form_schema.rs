use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::SchemaReport;
use crate::application::errors::LookupError;
use crate::application::ports::{RepositoryError, SchemaInspector};
use crate::domain::entities::{FormSchema, SchemaObject};

/// Use case: Check that a form schema matches the registry database
pub struct VerifyFormSchemaUseCase {
    inspector: Arc<dyn SchemaInspector>,
}

impl VerifyFormSchemaUseCase {
    pub fn new(inspector: Arc<dyn SchemaInspector>) -> Self {
        Self { inspector }
    }

    /// Every table, column and container the schema references but the
    /// database lacks
    pub async fn missing_objects(
        &self,
        schema: &FormSchema,
    ) -> Result<Vec<SchemaObject>, RepositoryError> {
        let mut missing = Vec::new();

        for (table, columns) in schema.referenced_columns() {
            match self.inspector.table_columns(&table).await? {
                None => missing.push(SchemaObject::Table(table)),
                Some(existing) => {
                    for column in columns {
                        if !existing.contains(&column) {
                            missing.push(SchemaObject::Column {
                                table: table.clone(),
                                column,
                            });
                        }
                    }
                }
            }
        }

        // Container ids can only be checked against a usable form context table
        let context_table = &schema.registry.form_context_table;
        let context_usable = !missing.iter().any(|object| match object {
            SchemaObject::Table(t) => t == context_table,
            SchemaObject::Column { table, .. } => table == context_table,
            SchemaObject::Container(_) => false,
        });

        if context_usable {
            for container_id in schema.container_ids() {
                if !self
                    .inspector
                    .container_exists(&schema.registry, container_id)
                    .await?
                {
                    missing.push(SchemaObject::Container(container_id));
                }
            }
        }

        Ok(missing)
    }

    /// Execute verification, failing with a configuration error that lists
    /// everything missing
    pub async fn execute(&self, schema: &FormSchema) -> Result<SchemaReport, LookupError> {
        debug!("Verifying form schema {}", schema.version);

        let missing = self.missing_objects(schema).await?;
        if !missing.is_empty() {
            let listed: Vec<String> = missing.iter().map(ToString::to_string).collect();
            warn!(
                "Form schema {} does not match database: {}",
                schema.version,
                listed.join(", ")
            );
            return Err(LookupError::Configuration(format!(
                "schema {} references missing objects: {}",
                schema.version,
                listed.join(", ")
            )));
        }

        let grouped = schema.referenced_columns();
        let report = SchemaReport {
            schema_version: schema.version.to_string(),
            tables_checked: grouped.len(),
            columns_checked: grouped.iter().map(|(_, columns)| columns.len()).sum(),
            containers_checked: schema.container_ids().len(),
        };

        info!(
            "Form schema {} verified ({} tables, {} columns, {} containers)",
            report.schema_version,
            report.tables_checked,
            report.columns_checked,
            report.containers_checked
        );

        Ok(report)
    }
}
