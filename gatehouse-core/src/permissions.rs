//! Permission helpers for the signed-in user.
//!
//! Keeps permission checks in one place so the console does not spread
//! role lookups across its command handlers.

use gatehouse_model::{Permission, Session};

use crate::store::seed::ADMIN_ROLE_ID;

/// Permission checker for the current session.
#[derive(Debug, Clone, Copy)]
pub struct PermissionChecker<'a> {
    session: &'a Session,
}

impl<'a> PermissionChecker<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.session.has_permission(permission)
    }

    /// Whether the signed-in user holds the seeded administrator role.
    pub fn is_admin(&self) -> bool {
        self.session
            .user()
            .is_some_and(|user| user.role_id.as_str() == ADMIN_ROLE_ID)
    }

    pub fn can_view(&self) -> bool {
        self.has_permission(Permission::Read)
    }

    /// Create or edit users and roles.
    pub fn can_edit(&self) -> bool {
        self.has_permission(Permission::Write)
    }

    pub fn can_delete(&self) -> bool {
        self.has_permission(Permission::Delete)
    }
}

impl PermissionChecker<'_> {
    /// Short label for the broadest capability held: `full`, `edit`,
    /// `read-only` or `none`.
    pub fn access_level(&self) -> &'static str {
        if self.can_delete() && self.can_edit() {
            "full"
        } else if self.can_edit() {
            "edit"
        } else if self.can_view() {
            "read-only"
        } else {
            "none"
        }
    }
}
