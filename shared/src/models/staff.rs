//! Staff identity attached to orders and commands

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    Admin,
    #[default]
    Waiter,
    Kitchen,
}

impl std::str::FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "WAITER" => Ok(Self::Waiter),
            "KITCHEN" => Ok(Self::Kitchen),
            other => Err(format!("unknown staff role: {other}")),
        }
    }
}

/// Authenticated actor snapshot (display and audit only)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaffRef {
    pub id: String,
    pub name: String,
    pub role: StaffRole,
}

impl StaffRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: StaffRole) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }

    /// Actor used for seeding and other server-initiated work
    pub fn system() -> Self {
        Self::new("system", "System", StaffRole::Admin)
    }
}
