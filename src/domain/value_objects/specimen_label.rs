use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Specimen label used as an exact-match lookup key
///
/// The value is kept verbatim (no trimming or case folding) so it matches
/// the registry's stored label byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SpecimenLabel(String);

impl SpecimenLabel {
    const MAX_LENGTH: usize = 255;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.trim().is_empty() {
            return Err(DomainError::InvalidLabel(
                "Specimen label cannot be empty".to_string(),
            ));
        }

        if value.chars().count() > Self::MAX_LENGTH {
            return Err(DomainError::InvalidLabel(format!(
                "Specimen label too long: {} > {}",
                value.chars().count(),
                Self::MAX_LENGTH
            )));
        }

        if value.chars().any(char::is_control) {
            return Err(DomainError::InvalidLabel(
                "Specimen label cannot contain control characters".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SpecimenLabel {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SpecimenLabel> for String {
    fn from(label: SpecimenLabel) -> Self {
        label.0
    }
}

impl std::fmt::Display for SpecimenLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SpecimenLabel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
