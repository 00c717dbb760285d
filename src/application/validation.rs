//! Request validation shared by the lookup use cases

use crate::application::errors::LookupError;
use crate::domain::value_objects::{SchemaVersion, SpecimenLabel};

/// Validate an optional label filter
pub fn validate_label(label: Option<&str>) -> Result<Option<SpecimenLabel>, LookupError> {
    label
        .map(|l| SpecimenLabel::new(l).map_err(|e| LookupError::InvalidRequest(e.to_string())))
        .transpose()
}

/// Validate a schema version name
pub fn validate_schema_version(version: &str) -> Result<SchemaVersion, LookupError> {
    SchemaVersion::new(version).map_err(|e| LookupError::InvalidRequest(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_label_is_valid() {
        assert!(validate_label(None).unwrap().is_none());
    }

    #[test]
    fn test_blank_label_is_invalid_request() {
        let err = validate_label(Some("  ")).unwrap_err();
        assert!(matches!(err, LookupError::InvalidRequest(_)));
    }

    #[test]
    fn test_schema_version_validation() {
        assert_eq!(validate_schema_version("v2").unwrap().as_str(), "v2");
        assert!(matches!(
            validate_schema_version("bad version"),
            Err(LookupError::InvalidRequest(_))
        ));
    }
}
