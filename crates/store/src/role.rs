use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Who is editing. Decides which layer a routed theme update writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Writes the master config and clears the merchant keys it touches
    #[default]
    Admin,
    /// Writes the merchant override layer
    Merchant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Merchant => "merchant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "merchant" => Ok(Role::Merchant),
            other => Err(format!("unknown role '{other}' (expected admin or merchant)")),
        }
    }
}
