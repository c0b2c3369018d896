use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// Authorization role carried in tokens and API responses.
///
/// Serialized with the `ROLE_` wire names downstream consumers expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "ROLE_USER")]
    User,

    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl UserRole {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "ROLE_USER",
            UserRole::Admin => "ROLE_ADMIN",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_USER" => Ok(UserRole::User),
            "ROLE_ADMIN" => Ok(UserRole::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Signed token payload.
///
/// Immutable once minted; both access and refresh tokens carry the full
/// set so a verified token identifies its subject without a lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject: user identifier
    pub sub: String,

    /// Login username
    pub username: String,

    /// Display name
    pub nickname: String,

    /// Authorization role
    #[serde(rename = "userRole")]
    pub user_role: UserRole,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}
