use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Registry activity status shared by specimens and form record entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityStatus {
    Active,
    Closed,
    /// Soft-deleted; never eligible for lookups
    Disabled,
}

impl ActivityStatus {
    /// Value stored in the registry for excluded rows
    pub const DISABLED: &'static str = "Disabled";

    pub fn is_eligible(&self) -> bool {
        !matches!(self, ActivityStatus::Disabled)
    }
}

impl std::fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityStatus::Active => write!(f, "Active"),
            ActivityStatus::Closed => write!(f, "Closed"),
            ActivityStatus::Disabled => write!(f, "Disabled"),
        }
    }
}

impl std::str::FromStr for ActivityStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(ActivityStatus::Active),
            "Closed" => Ok(ActivityStatus::Closed),
            "Disabled" => Ok(ActivityStatus::Disabled),
            _ => Err(DomainError::InvalidActivityStatus(s.to_string())),
        }
    }
}
