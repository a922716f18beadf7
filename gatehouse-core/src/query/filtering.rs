//! Role name resolution and the row predicate of the user list.

use std::collections::HashMap;

use gatehouse_model::{Role, RoleId, User};

use super::types::UserQuery;

/// Display name used for users whose role no longer exists.
pub const UNKNOWN_ROLE: &str = "Unknown";

/// Lookup from role id to display name for one query run.
#[derive(Debug, Clone)]
pub struct RoleDirectory<'a> {
    names: HashMap<&'a RoleId, &'a str>,
}

impl<'a> RoleDirectory<'a> {
    /// Index the roles. When ids repeat, the first role wins.
    pub fn new(roles: &'a [Role]) -> Self {
        let mut names = HashMap::with_capacity(roles.len());
        for role in roles {
            names.entry(&role.id).or_insert(role.name.as_str());
        }
        Self { names }
    }

    pub fn display_name(&self, role_id: &RoleId) -> &'a str {
        self.names.get(role_id).copied().unwrap_or(UNKNOWN_ROLE)
    }
}

/// Case-insensitive substring match on name, email or role name. The term
/// must already be lowercased; an empty term matches everything.
pub fn matches_search(user: &User, role_name: &str, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    user.name.to_lowercase().contains(term)
        || user.email.to_lowercase().contains(term)
        || role_name.to_lowercase().contains(term)
}

/// All three predicates must hold.
pub fn matches_query(
    user: &User,
    role_name: &str,
    query: &UserQuery,
    term: &str,
) -> bool {
    matches_search(user, role_name, term)
        && query.status.matches(user.is_active)
        && query.role.matches(&user.role_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_model::{Permission, UserId};

    fn role(id: &'static str, name: &str) -> Role {
        Role {
            id: RoleId::from_static(id),
            name: name.to_string(),
            permissions: [Permission::Read].into(),
        }
    }

    #[test]
    fn unresolved_roles_use_sentinel() {
        let roles = vec![role("admin", "Administrator")];
        let directory = RoleDirectory::new(&roles);
        assert_eq!(directory.display_name(&RoleId::from_static("admin")), "Administrator");
        assert_eq!(directory.display_name(&RoleId::from_static("gone")), UNKNOWN_ROLE);
    }

    #[test]
    fn first_role_wins_on_duplicate_ids() {
        let roles = vec![role("r", "First"), role("r", "Second")];
        let directory = RoleDirectory::new(&roles);
        assert_eq!(directory.display_name(&RoleId::from_static("r")), "First");
    }

    #[test]
    fn search_covers_role_name() {
        let user = User {
            id: UserId::from_static("u"),
            name: "Amy".into(),
            email: "amy@example.com".into(),
            password: None,
            is_active: true,
            role_id: RoleId::from_static("admin"),
        };
        assert!(matches_search(&user, "Administrator", "admini"));
        assert!(matches_search(&user, "Administrator", "example"));
        assert!(matches_search(&user, "Administrator", ""));
        assert!(!matches_search(&user, "Administrator", "bob"));
    }
}
