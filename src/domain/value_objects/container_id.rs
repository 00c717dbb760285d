use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Form-definition container identifier from the registry's form contexts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ContainerId(i64);

impl ContainerId {
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value <= 0 {
            return Err(DomainError::InvalidContainerId(format!(
                "Container ID must be positive, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for ContainerId {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContainerId> for i64 {
    fn from(id: ContainerId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ContainerId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|e| DomainError::InvalidContainerId(format!("{}: {}", s, e)))?;
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_container_id_rejects_non_positive() {
        assert!(ContainerId::new(0).is_err());
        assert!(ContainerId::new(-4).is_err());
        assert_eq!(ContainerId::new(1042).unwrap().as_i64(), 1042);
    }

    #[test]
    fn test_container_id_from_str() {
        assert_eq!(ContainerId::from_str(" 77 ").unwrap().as_i64(), 77);
        assert!(ContainerId::from_str("abc").is_err());
    }

    #[test]
    fn test_container_id_deserialize_validates() {
        let ok: ContainerId = serde_json::from_str("12").unwrap();
        assert_eq!(ok.as_i64(), 12);
        assert!(serde_json::from_str::<ContainerId>("0").is_err());
    }
}
