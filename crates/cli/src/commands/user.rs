//! User management commands.

use thiserror::Error;

use catalog_api::db::UserRepository;
use catalog_api::services::auth::{AuthError, create_user};
use catalog_core::{Role, RoleError};

use super::{CommandError, connect};

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: user, admin, superUser")]
    InvalidRole(#[from] RoleError),

    /// No role given.
    #[error("At least one role is required")]
    NoRoles,

    /// Validation or insert failed.
    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Parse a comma separated role list, ignoring blanks and duplicates.
fn parse_roles(roles: &str) -> Result<Vec<Role>, UserError> {
    let mut parsed = Vec::new();
    for role in roles.split(',').map(str::trim).filter(|r| !r.is_empty()) {
        let role: Role = role.parse()?;
        if !parsed.contains(&role) {
            parsed.push(role);
        }
    }

    if parsed.is_empty() {
        return Err(UserError::NoRoles);
    }
    Ok(parsed)
}

/// Create a new user.
///
/// # Errors
///
/// Returns `UserError` if the input is invalid, the email is taken or the
/// database is unreachable.
pub async fn create(email: &str, name: &str, password: &str, roles: &str) -> Result<(), UserError> {
    let roles = parse_roles(roles)?;
    let pool = connect().await?;

    let user = create_user(&UserRepository::new(&pool), email, password, name, &roles).await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}, Roles: {:?}",
        user.id,
        user.email,
        user.roles
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roles() {
        assert_eq!(
            parse_roles("admin, user,admin").unwrap(),
            vec![Role::Admin, Role::User]
        );
        assert_eq!(parse_roles("superUser").unwrap(), vec![Role::SuperUser]);
        assert!(matches!(parse_roles(" , "), Err(UserError::NoRoles)));
        assert!(matches!(parse_roles("root"), Err(UserError::InvalidRole(_))));
    }
}
