//! User roles for authorization.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a role string is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct RoleError(pub String);

/// A role tag attached to a user.
///
/// Stored in the database as the same strings used on the wire
/// (`user`, `admin`, `superUser`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Default role granted on registration.
    User,
    /// Can manage the catalog and run the seeder.
    Admin,
    /// Elevated operator role.
    SuperUser,
}

impl Role {
    /// Roles granted to a freshly registered user.
    pub const DEFAULT: &'static [Self] = &[Self::User];

    /// Wire/database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::SuperUser => "superUser",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "superUser" => Ok(Self::SuperUser),
            _ => Err(RoleError(s.to_owned())),
        }
    }
}
