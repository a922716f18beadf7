//! View routing for the console.
//!
//! Views declare their guard; the [`Navigator`] checks it with the
//! [`SessionGate`] on every transition and follows the redirect when access
//! is denied. Signing in lands on the users tab, signing out returns to the
//! login view.

use gatehouse_model::Session;
use tracing::debug;

use crate::gate::{Access, Guard, SessionGate};

/// Tabs of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DashboardTab {
    #[default]
    Users,
    Roles,
}

impl DashboardTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardTab::Users => "users",
            DashboardTab::Roles => "roles",
        }
    }
}

impl std::str::FromStr for DashboardTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "users" => Ok(DashboardTab::Users),
            "roles" => Ok(DashboardTab::Roles),
            _ => Err(format!("Invalid dashboard tab: {}", s)),
        }
    }
}

/// Top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    Dashboard(DashboardTab),
}

impl View {
    /// Where authenticated users land by default.
    pub fn default_dashboard() -> Self {
        View::Dashboard(DashboardTab::default())
    }

    /// Guard protecting this view, `None` for public views.
    pub fn guard(&self) -> Option<Guard> {
        match self {
            View::Login => None,
            View::Dashboard(_) => Some(Guard::authenticated()),
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            View::Login => write!(f, "login"),
            View::Dashboard(tab) => write!(f, "dashboard/{}", tab.as_str()),
        }
    }
}

/// Tracks the current view and applies guards on every transition.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: View,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current: View::Login,
        }
    }

    pub fn current(&self) -> View {
        self.current
    }

    /// Move to `target`, or to the guard's redirect when access is denied.
    pub fn navigate(&mut self, target: View, session: &Session) -> View {
        let access = target
            .guard()
            .map(|guard| SessionGate::evaluate(session, &guard))
            .unwrap_or(Access::Allowed);

        let resolved = match access.redirect() {
            Some(redirect) => {
                debug!(%target, %redirect, ?access, "navigation redirected");
                redirect
            }
            None => target,
        };
        self.current = resolved;
        resolved
    }

    /// Re-check the current view, e.g. after the session changed.
    pub fn refresh(&mut self, session: &Session) -> View {
        self.navigate(self.current, session)
    }

    /// Result of a login attempt: success lands on the dashboard, failure
    /// stays put.
    pub fn on_login(&mut self, succeeded: bool, session: &Session) -> View {
        if succeeded {
            self.navigate(View::default_dashboard(), session)
        } else {
            self.current
        }
    }

    pub fn on_logout(&mut self) -> View {
        self.current = View::Login;
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_model::{RoleId, User, UserId};

    fn signed_in() -> Session {
        Session {
            current_user: Some(User {
                id: UserId::from_static("admin"),
                name: "Admin User".into(),
                email: "admin@example.com".into(),
                password: None,
                is_active: true,
                role_id: RoleId::from_static("admin"),
            }),
            role: None,
        }
    }

    #[test]
    fn starts_at_login() {
        assert_eq!(Navigator::new().current(), View::Login);
    }

    #[test]
    fn dashboard_requires_a_session() {
        let mut nav = Navigator::new();
        let view = nav.navigate(View::Dashboard(DashboardTab::Roles), &Session::anonymous());
        assert_eq!(view, View::Login);
    }

    #[test]
    fn login_and_logout_transitions() {
        let mut nav = Navigator::new();
        assert_eq!(nav.on_login(false, &Session::anonymous()), View::Login);
        assert_eq!(
            nav.on_login(true, &signed_in()),
            View::Dashboard(DashboardTab::Users)
        );
        assert_eq!(
            nav.navigate(View::Dashboard(DashboardTab::Roles), &signed_in()),
            View::Dashboard(DashboardTab::Roles)
        );
        assert_eq!(nav.on_logout(), View::Login);
    }

    #[test]
    fn refresh_drops_to_login_when_session_ends() {
        let mut nav = Navigator::new();
        nav.on_login(true, &signed_in());
        assert_eq!(nav.refresh(&Session::anonymous()), View::Login);
    }

    #[test]
    fn tab_names_round_trip() {
        assert_eq!("Roles".parse::<DashboardTab>().unwrap(), DashboardTab::Roles);
        assert!("settings".parse::<DashboardTab>().is_err());
        assert_eq!(View::Dashboard(DashboardTab::Users).to_string(), "dashboard/users");
    }
}
