use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// Roles allowed on the dashboard and orders views.
pub const MEMBER_ROLES: &[Role] = &[Role::Admin, Role::User];

/// Roles allowed on catalog and user management views.
pub const ADMIN_ROLES: &[Role] = &[Role::Admin];

impl Role {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Capability check performed before a guarded view is served.
    pub fn is_allowed(self, allowed: &[Role]) -> bool {
        allowed.contains(&self)
    }

    /// Parse a role filter from a query string. Absent, empty and `all` mean
    /// no filter.
    pub fn parse_filter(raw: Option<&str>) -> Result<Option<Self>, CoreError> {
        match raw.map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(other) => Self::parse(other).map(Some).ok_or_else(|| {
                CoreError::InvalidQuery("role must be one of: all, admin, user".into())
            }),
        }
    }
}
