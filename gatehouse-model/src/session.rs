//! Read snapshot of the current authentication state.

use crate::permission::Permission;
use crate::role::Role;
use crate::user::User;

/// Session resolved against the store at the moment it was read.
///
/// Authentication is derived from the presence of `current_user`, so a
/// session can never claim to be authenticated without a user. `role` is the
/// current user's role when it still exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub current_user: Option<User>,
    pub role: Option<Role>,
}

impl Session {
    /// Anonymous session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Whether the current user's role grants `permission`. A dangling role
    /// grants nothing.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.role
            .as_ref()
            .is_some_and(|role| role.has_permission(permission))
    }
}
