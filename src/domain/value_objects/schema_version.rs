use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Name of a form schema profile (e.g. "v1", "v2-2019")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion(String);

impl SchemaVersion {
    const MAX_LENGTH: usize = 64;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let value = value.trim();

        if value.is_empty() {
            return Err(DomainError::InvalidSchemaVersion(
                "Schema version cannot be empty".to_string(),
            ));
        }

        if value.len() > Self::MAX_LENGTH {
            return Err(DomainError::InvalidSchemaVersion(format!(
                "Schema version too long: {} > {}",
                value.len(),
                Self::MAX_LENGTH
            )));
        }

        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(DomainError::InvalidSchemaVersion(format!(
                "Schema version must be alphanumeric with '_', '-' or '.': {}",
                value
            )));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SchemaVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_version_trims_and_accepts_dotted() {
        assert_eq!(SchemaVersion::new(" v2.1 ").unwrap().as_str(), "v2.1");
    }

    #[test]
    fn test_schema_version_rejects_bad_input() {
        assert!(SchemaVersion::new("").is_err());
        assert!(SchemaVersion::new("v 2").is_err());
        assert!(SchemaVersion::new("x".repeat(65)).is_err());
    }
}
