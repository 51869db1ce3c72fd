//! Access control types
//!
//! Core types used by the access policy.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Access class stored on a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Contributor,
    ClientManager,
    /// Client users; served by the separate client portal
    Standard,
}

impl Role {
    /// All known roles
    pub const ALL: [Role; 4] = [
        Role::Admin,
        Role::Contributor,
        Role::ClientManager,
        Role::Standard,
    ];

    /// Get the role name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Contributor => "contributor",
            Role::ClientManager => "client_manager",
            Role::Standard => "standard",
        }
    }

    /// Try to parse a role from a string
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "contributor" => Some(Role::Contributor),
            "client_manager" => Some(Role::ClientManager),
            "standard" => Some(Role::Standard),
            _ => None,
        }
    }

    /// Whether this portal serves the role at all
    pub fn is_portal_role(&self) -> bool {
        !matches!(self, Role::Standard)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a role name is not recognised
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role '{0}' (expected admin, contributor, client_manager or standard)")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::try_parse(s.trim()).ok_or_else(|| ParseRoleError(s.to_string()))
    }
}

/// Roles a mount point accepts
///
/// Compared by value, so a freshly built set with the same members counts as
/// unchanged when deciding whether to re-run an evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequiredRoles(BTreeSet<Role>);

impl RequiredRoles {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self(roles.into_iter().collect())
    }

    /// Every staff role: admin, contributor and client_manager
    pub fn portal_staff() -> Self {
        Self::new(Role::ALL.into_iter().filter(Role::is_portal_role))
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }
}

impl Default for RequiredRoles {
    fn default() -> Self {
        Self::portal_staff()
    }
}

impl FromIterator<Role> for RequiredRoles {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for RequiredRoles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Role::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
