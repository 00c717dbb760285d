use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::QueryBuilder;
use crate::application::dto::SpecimenFilter;
use crate::application::ports::{RepositoryError, SpecimenFormRepository};
use crate::domain::entities::{
    CustomFieldValues, FormSchema, PrimaryFormValues, SpecimenFormRecord,
};
use crate::domain::value_objects::ActivityStatus;

pub struct PostgresSpecimenFormRepository {
    pool: PgPool,
}

impl PostgresSpecimenFormRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SpecimenFormRepository for PostgresSpecimenFormRepository {
    async fn find_records(
        &self,
        schema: &FormSchema,
        filter: &SpecimenFilter,
    ) -> Result<Vec<SpecimenFormRecord>, RepositoryError> {
        let sql = QueryBuilder::specimen_forms(schema, filter.label.is_some());
        debug!("Specimen form query for schema {}: {}", schema.version, sql);

        // Bind order must follow QueryBuilder's *_PARAM positions
        let mut query = sqlx::query_as::<_, SpecimenFormRow>(&sql)
            .bind(schema.primary.container_id.as_i64())
            .bind(schema.custom_field.container_id.as_i64())
            .bind(ActivityStatus::DISABLED);

        if let Some(label) = &filter.label {
            query = query.bind(label.as_str());
        }

        let rows: Vec<SpecimenFormRow> = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(|r| r.into_domain()).collect()
    }
}

// Internal row mapping struct
#[derive(sqlx::FromRow)]
struct SpecimenFormRow {
    specimen_label: Option<String>,
    specimen_id: i64,
    collection_protocol_id: Option<i64>,
    nc_details: Option<String>,
    nc_reason: Option<String>,
    sop: Option<String>,
    storage_container: Option<String>,
    technician: Option<String>,
    custom_record_id: Option<i64>,
    custom_form_context_id: Option<i64>,
    custom_nc_details: Option<String>,
    reason: Option<String>,
    custom_sop: Option<String>,
    storage_tube: Option<String>,
    request_id: Option<String>,
}

impl SpecimenFormRow {
    fn into_domain(self) -> Result<SpecimenFormRecord, RepositoryError> {
        let specimen_label = self.specimen_label.ok_or_else(|| {
            RepositoryError::SerializationError(format!(
                "Specimen {} has no label",
                self.specimen_id
            ))
        })?;

        let custom_field = match self.custom_record_id {
            Some(record_id) => {
                let form_context_id = self.custom_form_context_id.ok_or_else(|| {
                    RepositoryError::SerializationError(format!(
                        "Custom field record {} has no form context",
                        record_id
                    ))
                })?;

                Some(CustomFieldValues {
                    record_id,
                    form_context_id,
                    nc_details: self.custom_nc_details,
                    storage_tube: self.storage_tube,
                    request_id: self.request_id,
                    reason: self.reason,
                    sop: self.custom_sop,
                })
            }
            None => None,
        };

        Ok(SpecimenFormRecord {
            specimen_label,
            specimen_id: self.specimen_id,
            collection_protocol_id: self.collection_protocol_id,
            primary: PrimaryFormValues {
                nc_details: self.nc_details,
                nc_reason: self.nc_reason,
                sop: self.sop,
                storage_container: self.storage_container,
                technician: self.technician,
            },
            custom_field,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> SpecimenFormRow {
        SpecimenFormRow {
            specimen_label: Some("0043490387".to_string()),
            specimen_id: 1,
            collection_protocol_id: Some(9),
            nc_details: Some("hemolyzed".to_string()),
            nc_reason: Some("R1".to_string()),
            sop: Some("SOP-1".to_string()),
            storage_container: Some("Freezer A".to_string()),
            technician: Some("tech01".to_string()),
            custom_record_id: Some(500),
            custom_form_context_id: Some(4),
            custom_nc_details: Some("received warm".to_string()),
            reason: Some("Temperature".to_string()),
            custom_sop: Some("SOP-9".to_string()),
            storage_tube: Some("TUBE-1".to_string()),
            request_id: Some("REQ-77".to_string()),
        }
    }

    #[test]
    fn test_row_with_custom_record_maps_all_fields() {
        let record = row().into_domain().unwrap();

        assert_eq!(record.collection_protocol_id, Some(9));
        assert_eq!(record.primary.technician.as_deref(), Some("tech01"));
        let custom = record.custom_field.unwrap();
        assert_eq!(custom.record_id, 500);
        assert_eq!(custom.form_context_id, 4);
        assert_eq!(custom.reason.as_deref(), Some("Temperature"));
        assert_eq!(custom.sop.as_deref(), Some("SOP-9"));
    }

    #[test]
    fn test_row_without_custom_record_has_no_custom_field() {
        let mut r = row();
        r.custom_record_id = None;
        r.custom_form_context_id = None;
        r.reason = None;
        r.custom_sop = None;

        let record = r.into_domain().unwrap();
        assert!(!record.has_custom_field());
        assert_eq!(record.primary.nc_details.as_deref(), Some("hemolyzed"));
    }

    #[test]
    fn test_row_with_custom_record_but_no_context_is_rejected() {
        let mut r = row();
        r.custom_form_context_id = None;
        assert!(matches!(
            r.into_domain(),
            Err(RepositoryError::SerializationError(_))
        ));
    }

    #[test]
    fn test_row_without_label_is_rejected() {
        let mut r = row();
        r.specimen_label = None;
        assert!(r.into_domain().is_err());
    }
}
