//! Staff role configuration loaded from environment variables.
//!
//! Discord user IDs listed in `SUPERADMIN_USER_IDS` and `ADMIN_USER_IDS`
//! (comma-separated) are granted the matching back-office role. Everyone else is
//! a guest and only sees the public menu and ordering commands.

use crate::core::access::Role;
use std::collections::HashSet;

/// Lookup table from Discord user ID to staff role.
#[derive(Debug, Clone, Default)]
pub struct StaffDirectory {
    superadmins: HashSet<u64>,
    admins: HashSet<u64>,
}

impl StaffDirectory {
    /// Builds the directory from two comma-separated ID lists.
    /// Entries that are not valid IDs are skipped with a warning.
    #[must_use]
    pub fn parse(superadmin_ids: &str, admin_ids: &str) -> Self {
        Self {
            superadmins: parse_ids(superadmin_ids),
            admins: parse_ids(admin_ids),
        }
    }

    /// Reads `SUPERADMIN_USER_IDS` and `ADMIN_USER_IDS` from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let superadmins = std::env::var("SUPERADMIN_USER_IDS").unwrap_or_default();
        let admins = std::env::var("ADMIN_USER_IDS").unwrap_or_default();
        Self::parse(&superadmins, &admins)
    }

    /// Returns the role of a user, superadmin taking precedence over admin.
    #[must_use]
    pub fn role_of(&self, user_id: u64) -> Option<Role> {
        if self.superadmins.contains(&user_id) {
            Some(Role::SuperAdmin)
        } else if self.admins.contains(&user_id) {
            Some(Role::Admin)
        } else {
            None
        }
    }

    /// Number of configured staff members
    #[must_use]
    pub fn len(&self) -> usize {
        self.superadmins.union(&self.admins).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_ids(list: &str) -> HashSet<u64> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<u64>() {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Ignoring invalid staff user id {:?}: {}", s, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_lookup() {
        let staff = StaffDirectory::parse("111, 222", "333,444");
        assert_eq!(staff.role_of(111), Some(Role::SuperAdmin));
        assert_eq!(staff.role_of(222), Some(Role::SuperAdmin));
        assert_eq!(staff.role_of(333), Some(Role::Admin));
        assert_eq!(staff.role_of(999), None);
        assert_eq!(staff.len(), 4);
    }

    #[test]
    fn test_superadmin_wins_over_admin() {
        let staff = StaffDirectory::parse("111", "111");
        assert_eq!(staff.role_of(111), Some(Role::SuperAdmin));
        assert_eq!(staff.len(), 1);
    }

    #[test]
    fn test_invalid_and_empty_entries_are_skipped() {
        let staff = StaffDirectory::parse("abc,,  ", "");
        assert!(staff.is_empty());
    }
}
