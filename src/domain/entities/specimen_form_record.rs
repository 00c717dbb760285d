use serde::{Deserialize, Serialize};

/// Fields read from the mandatory non-conformance form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryFormValues {
    pub nc_details: Option<String>,
    pub nc_reason: Option<String>,
    pub sop: Option<String>,
    pub storage_container: Option<String>,
    pub technician: Option<String>,
}

/// Fields read from the optional custom-field form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldValues {
    pub record_id: i64,
    pub form_context_id: i64,
    pub nc_details: Option<String>,
    pub storage_tube: Option<String>,
    pub request_id: Option<String>,
    /// Resolved through the reason side table by `record_id`
    pub reason: Option<String>,
    /// Resolved through the SOP side table by `record_id`
    pub sop: Option<String>,
}

/// One lookup result: a specimen joined with its form data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecimenFormRecord {
    pub specimen_label: String,
    pub specimen_id: i64,
    pub collection_protocol_id: Option<i64>,
    pub primary: PrimaryFormValues,
    pub custom_field: Option<CustomFieldValues>,
}

impl SpecimenFormRecord {
    pub fn has_custom_field(&self) -> bool {
        self.custom_field.is_some()
    }
}
