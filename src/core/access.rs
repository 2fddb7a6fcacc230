//! Staff roles and the permission checks applied by the back-office operations.

use crate::errors::{Error, Result};
use std::fmt;

/// Back-office role of a staff member. Ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Admin,
    SuperAdmin,
}

impl Role {
    #[must_use]
    pub const fn is_superadmin(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => f.write_str("admin"),
            Self::SuperAdmin => f.write_str("superadmin"),
        }
    }
}

/// Checks that `role` is at least `required`.
///
/// # Errors
/// Returns `Error::PermissionDenied` naming `action` when the caller has no staff
/// role or a lower one.
pub fn require_role(role: Option<Role>, required: Role, action: &str) -> Result<Role> {
    match role {
        Some(role) if role >= required => Ok(role),
        _ => Err(Error::PermissionDenied {
            action: action.to_string(),
            required: required.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superadmin_satisfies_admin() {
        assert_eq!(
            require_role(Some(Role::SuperAdmin), Role::Admin, "edit items").ok(),
            Some(Role::SuperAdmin)
        );
        assert!(require_role(Some(Role::Admin), Role::Admin, "edit items").is_ok());
    }

    #[test]
    fn test_admin_cannot_act_as_superadmin() {
        let result = require_role(Some(Role::Admin), Role::SuperAdmin, "delete customers");
        assert!(matches!(
            result,
            Err(Error::PermissionDenied { ref required, .. }) if required == "superadmin"
        ));
        assert!(require_role(None, Role::Admin, "edit items").is_err());
    }
}
