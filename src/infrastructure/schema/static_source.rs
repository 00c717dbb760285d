use std::collections::BTreeMap;

use crate::application::ports::{FormSchemaSource, SchemaSourceError};
use crate::domain::entities::FormSchema;
use crate::domain::value_objects::SchemaVersion;

/// In-memory schema registry
#[derive(Debug, Clone, Default)]
pub struct StaticFormSchemaSource {
    schemas: BTreeMap<SchemaVersion, FormSchema>,
}

impl StaticFormSchemaSource {
    /// Later schemas replace earlier ones with the same version
    pub fn new(schemas: impl IntoIterator<Item = FormSchema>) -> Self {
        Self {
            schemas: schemas
                .into_iter()
                .map(|schema| (schema.version.clone(), schema))
                .collect(),
        }
    }
}

impl FormSchemaSource for StaticFormSchemaSource {
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

    #[test]
    fn test_static_source_lookup() {
        let source = StaticFormSchemaSource::new(vec![sample_schema()]);
        let v1 = SchemaVersion::new("v1").unwrap();

        assert_eq!(source.load(&v1).unwrap(), sample_schema());
        assert_eq!(source.versions(), vec![v1]);
    }

    #[test]
    fn test_static_source_unknown_version() {
        let source = StaticFormSchemaSource::default();
        let err = source.load(&SchemaVersion::new("v2").unwrap()).unwrap_err();
        assert!(matches!(err, SchemaSourceError::UnknownVersion(v) if v == "v2"));
    }
}
