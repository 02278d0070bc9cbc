//! Marketplace roles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role carried in access tokens.
///
/// Closed set: an unknown role string inside a token is a malformed token,
/// never "no role".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Hoster,
    Customer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Hoster, Role::Customer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Hoster => "hoster",
            Role::Customer => "customer",
        }
    }

    /// Message returned when a role gate for this role rejects a request
    pub fn access_required_message(&self) -> &'static str {
        match self {
            Role::Admin => "Admin access required",
            Role::Hoster => "Hoster access required",
            Role::Customer => "Customer access required",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "hoster" => Ok(Role::Hoster),
            "customer" => Ok(Role::Customer),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
