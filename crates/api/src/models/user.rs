//! User domain types.

use serde::Serialize;

use catalog_core::{Email, Role, UserId};

/// A catalog user (domain type).
///
/// Never carries the password hash; the hash only exists inside the
/// repository method that verifies credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Normalized email address.
    pub email: Email,
    /// Display name.
    pub full_name: String,
    /// Inactive users cannot authenticate with a token.
    pub is_active: bool,
    /// Granted roles.
    pub roles: Vec<Role>,
}

impl User {
    /// Whether the user holds at least one of `roles`.
    #[must_use]
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.roles.contains(role))
    }
}

/// Data needed to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: String,
    pub full_name: String,
    pub roles: Vec<Role>,
}
