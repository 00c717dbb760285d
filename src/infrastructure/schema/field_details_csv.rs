//! Form schemas read from a field-details CSV.
//!
//! One row per mapped field:
//!
//! ```text
//! schema_version,form,field,container_id,table_name,column_name
//! v1,primary,nc_details,11131,DE_E_11132,DE_AT_11140
//! v1,reason,value,,DE_E_11205,DE_AT_11207
//! ```
//!
//! `form` is one of `primary`, `custom`, `reason` or `sop`. Every row of a
//! form must name the same table, and `primary`/`custom` rows the same
//! container id.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::application::ports::{FormSchemaSource, SchemaSourceError};
use crate::domain::entities::{
    CustomFieldMapping, FormSchema, PrimaryFormMapping, RegistryTables, SubLookupMapping,
};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{ContainerId, SchemaVersion, SqlIdentifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FormKind {
    Primary,
    Custom,
    Reason,
    Sop,
}

impl FormKind {
    fn name(&self) -> &'static str {
        match self {
            FormKind::Primary => "primary",
            FormKind::Custom => "custom",
            FormKind::Reason => "reason",
            FormKind::Sop => "sop",
        }
    }

    fn needs_container(&self) -> bool {
        matches!(self, FormKind::Primary | FormKind::Custom)
    }
}

#[derive(Debug, Deserialize)]
struct FieldDetailRow {
    schema_version: String,
    form: FormKind,
    field: String,
    container_id: Option<i64>,
    table_name: String,
    column_name: String,
}

/// Collected rows of one form within one schema version
#[derive(Debug, Default)]
struct FormRows {
    table: Option<SqlIdentifier>,
    container_id: Option<ContainerId>,
    columns: HashMap<String, SqlIdentifier>,
}

impl FormRows {
    fn column(&self, kind: FormKind, field: &str) -> Result<SqlIdentifier, DomainError> {
        self.columns
            .get(field)
            .cloned()
            .ok_or_else(|| DomainError::IncompleteFormMapping {
                form: kind.name().to_string(),
                field: field.to_string(),
            })
    }

    fn table(&self, kind: FormKind) -> Result<SqlIdentifier, DomainError> {
        self.table
            .clone()
            .ok_or_else(|| DomainError::IncompleteFormMapping {
                form: kind.name().to_string(),
                field: "table_name".to_string(),
            })
    }

    fn container_id(&self, kind: FormKind) -> Result<ContainerId, DomainError> {
        self.container_id
            .ok_or_else(|| DomainError::IncompleteFormMapping {
                form: kind.name().to_string(),
                field: "container_id".to_string(),
            })
    }
}

/// Schema source backed by the field-details CSV
#[derive(Debug, Clone)]
pub struct CsvFormSchemaSource {
    schemas: BTreeMap<SchemaVersion, FormSchema>,
}

impl CsvFormSchemaSource {
    /// Load every schema version from the CSV file at `path`
    pub fn from_path(
        path: impl AsRef<Path>,
        registry: RegistryTables,
    ) -> Result<Self, SchemaSourceError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let source = Self::from_reader(file, registry)?;
        info!(
            "Loaded {} form schema version(s) from {}",
            source.schemas.len(),
            path.display()
        );
        Ok(source)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        registry: RegistryTables,
    ) -> Result<Self, SchemaSourceError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut versions: BTreeMap<SchemaVersion, HashMap<FormKind, FormRows>> = BTreeMap::new();

        for result in csv_reader.deserialize::<FieldDetailRow>() {
            let row = result?;
            let version = SchemaVersion::new(&row.schema_version)?;
            let forms = versions.entry(version.clone()).or_default();
            Self::add_row(forms, &version, row)?;
        }

        let mut schemas = BTreeMap::new();
        for (version, forms) in versions {
            let schema = Self::build_schema(version.clone(), &forms, registry.clone())?;
            schemas.insert(version, schema);
        }

        Ok(Self { schemas })
    }

    fn add_row(
        forms: &mut HashMap<FormKind, FormRows>,
        version: &SchemaVersion,
        row: FieldDetailRow,
    ) -> Result<(), SchemaSourceError> {
        let kind = row.form;
        let rows = forms.entry(kind).or_default();
        let table = SqlIdentifier::new(&row.table_name)?;
        let column = SqlIdentifier::new(&row.column_name)?;
        let field = row.field.to_ascii_lowercase();

        match &rows.table {
            Some(existing) if existing != &table => {
                return Err(SchemaSourceError::Invalid(format!(
                    "{} {} form maps to both {} and {}",
                    version,
                    kind.name(),
                    existing,
                    table
                )));
            }
            Some(_) => {}
            None => rows.table = Some(table),
        }

        if kind.needs_container() {
            let container_id = match row.container_id {
                Some(id) => ContainerId::new(id)?,
                None => {
                    return Err(SchemaSourceError::Invalid(format!(
                        "{} {} field '{}' has no container_id",
                        version,
                        kind.name(),
                        field
                    )));
                }
            };

            match rows.container_id {
                Some(existing) if existing != container_id => {
                    return Err(SchemaSourceError::Invalid(format!(
                        "{} {} form maps to containers {} and {}",
                        version,
                        kind.name(),
                        existing,
                        container_id
                    )));
                }
                Some(_) => {}
                None => rows.container_id = Some(container_id),
            }
        }

        if rows.columns.insert(field.clone(), column).is_some() {
            return Err(SchemaSourceError::Invalid(format!(
                "{} {} field '{}' is mapped twice",
                version,
                kind.name(),
                field
            )));
        }

        Ok(())
    }

    fn build_schema(
        version: SchemaVersion,
        forms: &HashMap<FormKind, FormRows>,
        registry: RegistryTables,
    ) -> Result<FormSchema, SchemaSourceError> {
        let empty = FormRows::default();
        let rows = |kind: FormKind| forms.get(&kind).unwrap_or(&empty);

        let incomplete = |err: DomainError| {
            SchemaSourceError::Invalid(format!("schema {}: {}", version, err))
        };

        let p = rows(FormKind::Primary);
        let primary = PrimaryFormMapping {
            container_id: p.container_id(FormKind::Primary).map_err(incomplete)?,
            table: p.table(FormKind::Primary).map_err(incomplete)?,
            record_id_column: p.column(FormKind::Primary, "record_id").map_err(incomplete)?,
            nc_details_column: p.column(FormKind::Primary, "nc_details").map_err(incomplete)?,
            nc_reason_column: p.column(FormKind::Primary, "nc_reason").map_err(incomplete)?,
            sop_column: p.column(FormKind::Primary, "sop").map_err(incomplete)?,
            storage_container_column: p
                .column(FormKind::Primary, "storage_container")
                .map_err(incomplete)?,
            technician_column: p.column(FormKind::Primary, "technician").map_err(incomplete)?,
        };

        let sub_lookup = |kind: FormKind| -> Result<SubLookupMapping, SchemaSourceError> {
            let s = rows(kind);
            Ok(SubLookupMapping {
                table: s.table(kind).map_err(incomplete)?,
                record_ref_column: s.column(kind, "record_ref").map_err(incomplete)?,
                value_column: s.column(kind, "value").map_err(incomplete)?,
            })
        };

        let c = rows(FormKind::Custom);
        let custom_field = CustomFieldMapping {
            container_id: c.container_id(FormKind::Custom).map_err(incomplete)?,
            table: c.table(FormKind::Custom).map_err(incomplete)?,
            record_id_column: c.column(FormKind::Custom, "record_id").map_err(incomplete)?,
            nc_details_column: c.column(FormKind::Custom, "nc_details").map_err(incomplete)?,
            storage_tube_column: c.column(FormKind::Custom, "storage_tube").map_err(incomplete)?,
            request_id_column: c.column(FormKind::Custom, "request_id").map_err(incomplete)?,
            reason: sub_lookup(FormKind::Reason)?,
            sop: sub_lookup(FormKind::Sop)?,
        };

        Ok(FormSchema {
            version,
            registry,
            primary,
            custom_field,
        })
    }
}

impl FormSchemaSource for CsvFormSchemaSource {
    fn load(&self, version: &SchemaVersion) -> Result<FormSchema, SchemaSourceError> {
        self.schemas
            .get(version)
            .cloned()
            .ok_or_else(|| SchemaSourceError::UnknownVersion(version.to_string()))
    }

    fn versions(&self) -> Vec<SchemaVersion> {
        self.schemas.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::test_support::sample_schema;
    use std::io::Write;

    const SAMPLE: &str = "\
schema_version,form,field,container_id,table_name,column_name
v1,primary,record_id,101,DE_E_101,IDENTIFIER
v1,primary,nc_details,101,DE_E_101,DE_AT_NC_DETAILS
v1,primary,nc_reason,101,DE_E_101,DE_AT_NC_REASON
v1,primary,sop,101,DE_E_101,DE_AT_SOP
v1,primary,storage_container,101,DE_E_101,DE_AT_STORAGE_CONTAINER
v1,primary,technician,101,DE_E_101,DE_AT_TECHNICIAN
v1,custom,record_id,202,DE_E_202,IDENTIFIER
v1,custom,nc_details,202,DE_E_202,DE_AT_NC_DETAILS_V1
v1,custom,storage_tube,202,DE_E_202,DE_AT_STORAGE_TUBE
v1,custom,request_id,202,DE_E_202,DE_AT_REQUEST_ID
v1,reason,record_ref,,DE_E_202_REASON,DE_E_202_RECORD_ID
v1,reason,value,,DE_E_202_REASON,DE_AT_REASON
v1,sop,record_ref,,DE_E_202_SOP,DE_E_202_RECORD_ID
v1,sop,value,,DE_E_202_SOP,DE_AT_SOP
";

    fn load(csv: &str) -> Result<CsvFormSchemaSource, SchemaSourceError> {
        CsvFormSchemaSource::from_reader(csv.as_bytes(), RegistryTables::default())
    }

    #[test]
    fn test_csv_builds_same_schema_as_fixture() {
        let source = load(SAMPLE).unwrap();
        let schema = source.load(&SchemaVersion::new("v1").unwrap()).unwrap();
        assert_eq!(schema, sample_schema());
    }

    #[test]
    fn test_csv_supports_multiple_versions() {
        let v2 = SAMPLE
            .lines()
            .skip(1)
            .map(|line| {
                line.replacen("v1,", "v2,", 1)
                    .replace("DE_AT_NC_DETAILS_V1", "DE_AT_NC_DETAILS_V2")
                    .replace(",202,", ",303,")
            })
            .collect::<Vec<_>>()
            .join("\n");
        let csv = format!("{}{}\n", SAMPLE, v2);

        let source = load(&csv).unwrap();
        assert_eq!(source.versions().len(), 2);

        let schema = source.load(&SchemaVersion::new("v2").unwrap()).unwrap();
        assert_eq!(schema.custom_field.container_id.as_i64(), 303);
        assert_eq!(
            schema.custom_field.nc_details_column.as_str(),
            "de_at_nc_details_v2"
        );
        assert_eq!(schema.primary.container_id.as_i64(), 101);
    }

    #[test]
    fn test_missing_field_is_reported() {
        let csv: String = SAMPLE
            .lines()
            .filter(|line| !line.contains(",technician,"))
            .map(|line| format!("{}\n", line))
            .collect();

        let err = load(&csv).unwrap_err();
        assert!(matches!(err, SchemaSourceError::Invalid(_)));
        assert!(err.to_string().contains("technician"));
        assert!(err.to_string().contains("v1"));
    }

    #[test]
    fn test_conflicting_tables_rejected() {
        let csv = format!("{}v1,primary,extra,101,DE_E_999,DE_AT_1\n", SAMPLE);
        let err = load(&csv).unwrap_err();
        assert!(err.to_string().contains("de_e_999"));
    }

    #[test]
    fn test_conflicting_containers_rejected() {
        let csv = format!("{}v1,custom,extra,203,DE_E_202,DE_AT_1\n", SAMPLE);
        let err = load(&csv).unwrap_err();
        assert!(err.to_string().contains("203"));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let csv = format!("{}v1,primary,SOP,101,DE_E_101,DE_AT_OTHER\n", SAMPLE);
        let err = load(&csv).unwrap_err();
        assert!(err.to_string().contains("mapped twice"));
    }

    #[test]
    fn test_primary_row_without_container_rejected() {
        let csv = format!("{}v1,primary,extra,,DE_E_101,DE_AT_1\n", SAMPLE);
        let err = load(&csv).unwrap_err();
        assert!(err.to_string().contains("no container_id"));
    }

    #[test]
    fn test_unsafe_identifier_rejected() {
        let csv = SAMPLE.replace("DE_AT_TECHNICIAN", "DE_AT_X; DROP TABLE y");
        assert!(matches!(load(&csv), Err(SchemaSourceError::Invalid(_))));
    }

    #[test]
    fn test_unknown_form_kind_is_csv_error() {
        let csv = format!("{}v1,audit,field,1,T,C\n", SAMPLE);
        assert!(matches!(load(&csv), Err(SchemaSourceError::Csv(_))));
    }

    #[test]
    fn test_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = CsvFormSchemaSource::from_path(file.path(), RegistryTables::default()).unwrap();
        assert_eq!(source.versions().len(), 1);
    }

    #[test]
    fn test_from_path_missing_file_is_io_error() {
        let err = CsvFormSchemaSource::from_path("/nonexistent/fields.csv", RegistryTables::default())
            .unwrap_err();
        assert!(matches!(err, SchemaSourceError::Io(_)));
    }
}
