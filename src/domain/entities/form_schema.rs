//! Schema-versioned description of where a deployment keeps its forms.
//!
//! Each registry deployment stores form fields in dynamically named tables
//! selected by the form's container id. A [`FormSchema`] captures one such
//! layout so the lookup itself never hard-codes table or column names.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ContainerId, SchemaVersion, SqlIdentifier};

fn ident(name: &str) -> SqlIdentifier {
    // Only called with the literal defaults below
    SqlIdentifier::new(name).expect("default registry identifiers are valid")
}

/// Core registry tables shared by every form version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryTables {
    pub specimen_table: SqlIdentifier,
    pub specimen_id_column: SqlIdentifier,
    pub specimen_label_column: SqlIdentifier,
    pub specimen_status_column: SqlIdentifier,
    /// Selected into the result when the deployment stores it on the specimen row
    pub collection_protocol_column: Option<SqlIdentifier>,

    pub record_entry_table: SqlIdentifier,
    pub record_entry_object_column: SqlIdentifier,
    pub record_entry_record_column: SqlIdentifier,
    pub record_entry_context_column: SqlIdentifier,
    pub record_entry_status_column: SqlIdentifier,

    pub form_context_table: SqlIdentifier,
    pub form_context_id_column: SqlIdentifier,
    pub form_context_container_column: SqlIdentifier,
}

impl Default for RegistryTables {
    fn default() -> Self {
        Self {
            specimen_table: ident("catissue_specimen"),
            specimen_id_column: ident("identifier"),
            specimen_label_column: ident("label"),
            specimen_status_column: ident("activity_status"),
            collection_protocol_column: None,
            record_entry_table: ident("catissue_form_record_entry"),
            record_entry_object_column: ident("object_id"),
            record_entry_record_column: ident("record_id"),
            record_entry_context_column: ident("form_ctxt_id"),
            record_entry_status_column: ident("activity_status"),
            form_context_table: ident("catissue_form_context"),
            form_context_id_column: ident("identifier"),
            form_context_container_column: ident("container_id"),
        }
    }
}

/// Mandatory non-conformance form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryFormMapping {
    pub container_id: ContainerId,
    pub table: SqlIdentifier,
    pub record_id_column: SqlIdentifier,
    pub nc_details_column: SqlIdentifier,
    pub nc_reason_column: SqlIdentifier,
    pub sop_column: SqlIdentifier,
    pub storage_container_column: SqlIdentifier,
    pub technician_column: SqlIdentifier,
}

/// Single-value side table hanging off a custom-field record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubLookupMapping {
    pub table: SqlIdentifier,
    /// References the custom-field record id
    pub record_ref_column: SqlIdentifier,
    pub value_column: SqlIdentifier,
}

/// Optional custom-field form with its reason and SOP side tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldMapping {
    pub container_id: ContainerId,
    pub table: SqlIdentifier,
    pub record_id_column: SqlIdentifier,
    /// Column name differs between schema versions
    pub nc_details_column: SqlIdentifier,
    pub storage_tube_column: SqlIdentifier,
    pub request_id_column: SqlIdentifier,
    pub reason: SubLookupMapping,
    pub sop: SubLookupMapping,
}

/// A database object the lookup depends on
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SchemaObject {
    Table(SqlIdentifier),
    Column {
        table: SqlIdentifier,
        column: SqlIdentifier,
    },
    Container(ContainerId),
}

impl std::fmt::Display for SchemaObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaObject::Table(table) => write!(f, "table {}", table),
            SchemaObject::Column { table, column } => write!(f, "column {}.{}", table, column),
            SchemaObject::Container(id) => write!(f, "container {}", id),
        }
    }
}

/// Complete form layout for one schema version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    pub version: SchemaVersion,
    #[serde(default)]
    pub registry: RegistryTables,
    pub primary: PrimaryFormMapping,
    pub custom_field: CustomFieldMapping,
}

impl FormSchema {
    /// Every column the generated query touches, grouped by table
    pub fn referenced_columns(&self) -> Vec<(SqlIdentifier, Vec<SqlIdentifier>)> {
        let r = &self.registry;
        let p = &self.primary;
        let c = &self.custom_field;

        let mut specimen_columns = vec![
            r.specimen_id_column.clone(),
            r.specimen_label_column.clone(),
            r.specimen_status_column.clone(),
        ];
        if let Some(cp) = &r.collection_protocol_column {
            specimen_columns.push(cp.clone());
        }

        let mut grouped: Vec<(SqlIdentifier, Vec<SqlIdentifier>)> = Vec::new();
        let mut push = |table: &SqlIdentifier, columns: Vec<SqlIdentifier>| {
            match grouped.iter_mut().find(|(t, _)| t == table) {
                Some((_, existing)) => {
                    for column in columns {
                        if !existing.contains(&column) {
                            existing.push(column);
                        }
                    }
                }
                None => grouped.push((table.clone(), columns)),
            }
        };

        push(&r.specimen_table, specimen_columns);
        push(
            &r.record_entry_table,
            vec![
                r.record_entry_object_column.clone(),
                r.record_entry_record_column.clone(),
                r.record_entry_context_column.clone(),
                r.record_entry_status_column.clone(),
            ],
        );
        push(
            &r.form_context_table,
            vec![
                r.form_context_id_column.clone(),
                r.form_context_container_column.clone(),
            ],
        );
        push(
            &p.table,
            vec![
                p.record_id_column.clone(),
                p.nc_details_column.clone(),
                p.nc_reason_column.clone(),
                p.sop_column.clone(),
                p.storage_container_column.clone(),
                p.technician_column.clone(),
            ],
        );
        push(
            &c.table,
            vec![
                c.record_id_column.clone(),
                c.nc_details_column.clone(),
                c.storage_tube_column.clone(),
                c.request_id_column.clone(),
            ],
        );
        for sub in [&c.reason, &c.sop] {
            push(
                &sub.table,
                vec![sub.record_ref_column.clone(), sub.value_column.clone()],
            );
        }

        grouped
    }

    /// Container ids that must exist in the form context table
    pub fn container_ids(&self) -> Vec<ContainerId> {
        let mut ids = vec![self.primary.container_id];
        if self.custom_field.container_id != self.primary.container_id {
            ids.push(self.custom_field.container_id);
        }
        ids
    }
}
