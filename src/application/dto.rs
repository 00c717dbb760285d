use serde::{Deserialize, Serialize};

use crate::domain::{entities::SpecimenFormRecord, value_objects::SpecimenLabel};

/// Which specimens a lookup covers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecimenFilter {
    /// Exact label match; `None` means every eligible specimen
    pub label: Option<SpecimenLabel>,
}

impl SpecimenFilter {
    pub fn all() -> Self {
        Self { label: None }
    }

    pub fn by_label(label: SpecimenLabel) -> Self {
        Self { label: Some(label) }
    }
}

/// What to do when a labelled lookup returns no rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyResultPolicy {
    /// Report `NotFound` when a label was given and nothing matched
    #[default]
    ErrorOnLabelMiss,
    /// Always return the (possibly empty) result
    AllowEmpty,
}

/// DTO for lookup request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupRequest {
    pub label: Option<String>,
    pub schema_version: String,
    #[serde(default)]
    pub empty_result_policy: EmptyResultPolicy,
}

/// Flattened lookup row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecimenFormRecordDto {
    pub specimen_label: String,
    pub specimen_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_protocol_id: Option<i64>,
    pub nc_details: Option<String>,
    pub nc_reason: Option<String>,
    pub sop: Option<String>,
    pub storage_container: Option<String>,
    pub technician: Option<String>,
    pub custom_record_id: Option<i64>,
    pub custom_form_context_id: Option<i64>,
    pub custom_nc_details: Option<String>,
    pub reason: Option<String>,
    pub custom_sop: Option<String>,
    pub storage_tube: Option<String>,
    pub request_id: Option<String>,
}

impl From<SpecimenFormRecord> for SpecimenFormRecordDto {
    fn from(record: SpecimenFormRecord) -> Self {
        let primary = record.primary;
        let custom = record.custom_field;

        Self {
            specimen_label: record.specimen_label,
            specimen_id: record.specimen_id,
            collection_protocol_id: record.collection_protocol_id,
            nc_details: primary.nc_details,
            nc_reason: primary.nc_reason,
            sop: primary.sop,
            storage_container: primary.storage_container,
            technician: primary.technician,
            custom_record_id: custom.as_ref().map(|c| c.record_id),
            custom_form_context_id: custom.as_ref().map(|c| c.form_context_id),
            custom_nc_details: custom.as_ref().and_then(|c| c.nc_details.clone()),
            reason: custom.as_ref().and_then(|c| c.reason.clone()),
            custom_sop: custom.as_ref().and_then(|c| c.sop.clone()),
            storage_tube: custom.as_ref().and_then(|c| c.storage_tube.clone()),
            request_id: custom.and_then(|c| c.request_id),
        }
    }
}

/// DTO for lookup response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResponse {
    pub schema_version: String,
    pub label: Option<String>,
    pub records: Vec<SpecimenFormRecordDto>,
    pub total: usize,
    pub generated_at: String,
}

/// Outcome of checking a form schema against the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaReport {
    pub schema_version: String,
    pub tables_checked: usize,
    pub columns_checked: usize,
    pub containers_checked: usize,
}
