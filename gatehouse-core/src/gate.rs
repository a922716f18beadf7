//! Route guards evaluated against the current session.
//!
//! The gate is a pure function of a [`Session`] snapshot and a [`Guard`]. It
//! holds no state, so callers evaluate it again on every navigation rather
//! than caching a decision.

use gatehouse_model::{Permission, RoleId, Session};

use crate::navigation::View;

/// Requirements a view declares before it can be shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Guard {
    /// Exact role the signed-in user must hold.
    pub required_role: Option<RoleId>,
    /// Permission the signed-in user's role must grant.
    pub required_permission: Option<Permission>,
}

impl Guard {
    /// Any signed-in user passes.
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn role(role_id: RoleId) -> Self {
        Self {
            required_role: Some(role_id),
            required_permission: None,
        }
    }

    pub fn permission(permission: Permission) -> Self {
        Self {
            required_role: None,
            required_permission: Some(permission),
        }
    }
}

/// Outcome of evaluating a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    /// No session; send the user to the login view.
    Unauthenticated,
    /// Signed in but the guard's requirement is not met; send the user to
    /// the default dashboard view.
    Forbidden,
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allowed)
    }

    /// View to redirect to, or `None` when access is allowed.
    pub fn redirect(&self) -> Option<View> {
        match self {
            Access::Allowed => None,
            Access::Unauthenticated => Some(View::Login),
            Access::Forbidden => Some(View::default_dashboard()),
        }
    }
}

/// Stateless authorization check.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionGate;

impl SessionGate {
    pub fn evaluate(session: &Session, guard: &Guard) -> Access {
        let Some(user) = session.user() else {
            return Access::Unauthenticated;
        };

        if let Some(required) = &guard.required_role
            && &user.role_id != required
        {
            return Access::Forbidden;
        }

        if let Some(permission) = guard.required_permission
            && !session.has_permission(permission)
        {
            return Access::Forbidden;
        }

        Access::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::DashboardTab;
    use gatehouse_model::{PermissionSet, Role, User, UserId};

    fn session_for(role_id: &'static str, role: Option<Role>) -> Session {
        Session {
            current_user: Some(User {
                id: UserId::from_static("u1"),
                name: "Amy".into(),
                email: "amy@example.com".into(),
                password: None,
                is_active: true,
                role_id: RoleId::from_static(role_id),
            }),
            role,
        }
    }

    fn reader_role() -> Role {
        Role {
            id: RoleId::from_static("user"),
            name: "User".into(),
            permissions: [Permission::Read].into(),
        }
    }

    #[test]
    fn anonymous_sessions_are_sent_to_login() {
        let access = SessionGate::evaluate(&Session::anonymous(), &Guard::authenticated());
        assert_eq!(access, Access::Unauthenticated);
        assert_eq!(access.redirect(), Some(View::Login));

        let access = SessionGate::evaluate(
            &Session::anonymous(),
            &Guard::role(RoleId::from_static("admin")),
        );
        assert_eq!(access, Access::Unauthenticated);
    }

    #[test]
    fn role_mismatch_is_forbidden() {
        let session = session_for("user", Some(reader_role()));
        let access =
            SessionGate::evaluate(&session, &Guard::role(RoleId::from_static("admin")));
        assert_eq!(access, Access::Forbidden);
        assert_eq!(
            access.redirect(),
            Some(View::Dashboard(DashboardTab::Users))
        );
    }

    #[test]
    fn matching_role_is_allowed() {
        let session = session_for("user", Some(reader_role()));
        assert!(SessionGate::evaluate(&session, &Guard::role(RoleId::from_static("user"))).is_allowed());
        assert!(SessionGate::evaluate(&session, &Guard::authenticated()).is_allowed());
        assert_eq!(Access::Allowed.redirect(), None);
    }

    #[test]
    fn permission_guard_uses_resolved_role() {
        let session = session_for("user", Some(reader_role()));
        assert!(SessionGate::evaluate(&session, &Guard::permission(Permission::Read)).is_allowed());
        assert_eq!(
            SessionGate::evaluate(&session, &Guard::permission(Permission::Write)),
            Access::Forbidden
        );

        let dangling = session_for("deleted", None);
        assert_eq!(
            SessionGate::evaluate(&dangling, &Guard::permission(Permission::Read)),
            Access::Forbidden
        );
        assert!(SessionGate::evaluate(&dangling, &Guard::authenticated()).is_allowed());

        let mut full = reader_role();
        full.permissions = PermissionSet::full();
        let admin = session_for("user", Some(full));
        assert!(SessionGate::evaluate(&admin, &Guard::permission(Permission::Delete)).is_allowed());
    }
}
