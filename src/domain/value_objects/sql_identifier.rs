use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

static IDENTIFIER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is a valid regex")
});

/// Table or column name that is safe to splice into generated SQL
///
/// Names are folded to lowercase, which is how PostgreSQL stores unquoted
/// identifiers, and are always emitted double-quoted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SqlIdentifier(String);

impl SqlIdentifier {
    /// PostgreSQL NAMEDATALEN - 1
    const MAX_LENGTH: usize = 63;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::InvalidIdentifier(
                "Identifier cannot be empty".to_string(),
            ));
        }

        if value.len() > Self::MAX_LENGTH {
            return Err(DomainError::InvalidIdentifier(format!(
                "Identifier too long: {} > {}",
                value.len(),
                Self::MAX_LENGTH
            )));
        }

        if !IDENTIFIER_PATTERN.is_match(&value) {
            return Err(DomainError::InvalidIdentifier(format!(
                "'{}' must start with a letter or underscore and contain only letters, digits or underscores",
                value
            )));
        }

        Ok(Self(value.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Double-quoted form for SQL text
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl TryFrom<String> for SqlIdentifier {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for SqlIdentifier {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SqlIdentifier> for String {
    fn from(id: SqlIdentifier) -> Self {
        id.0
    }
}

impl std::fmt::Display for SqlIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SqlIdentifier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_folds_case_and_quotes() {
        let id = SqlIdentifier::new("DE_E_11131").unwrap();
        assert_eq!(id.as_str(), "de_e_11131");
        assert_eq!(id.quoted(), "\"de_e_11131\"");
    }

    #[test]
    fn test_identifier_rejects_injection_attempts() {
        assert!(SqlIdentifier::new("t; DROP TABLE x").is_err());
        assert!(SqlIdentifier::new("a\"b").is_err());
        assert!(SqlIdentifier::new("schema.table").is_err());
        assert!(SqlIdentifier::new("1abc").is_err());
    }

    #[test]
    fn test_identifier_rejects_surrounding_whitespace() {
        // Callers trim their input; a padded name is never silently accepted
        assert!(SqlIdentifier::new("de_e_101 ").is_err());
        assert!(SqlIdentifier::new(" de_e_101").is_err());
        assert!(SqlIdentifier::new("\tidentifier").is_err());
        assert!(SqlIdentifier::new(" ").is_err());
    }

    #[test]
    fn test_identifier_length_limit() {
        assert!(SqlIdentifier::new("a".repeat(63)).is_ok());
        assert!(SqlIdentifier::new("a".repeat(64)).is_err());
    }
}
