//! Permission vocabulary granted to roles.
//!
//! The set of permissions is closed: `read`, `write` and `delete`. Roles hold
//! a [`PermissionSet`], which collapses duplicates and ignores insertion
//! order so two roles granting the same permissions compare equal.

use std::collections::BTreeSet;

use crate::error::ModelError;

/// A single grant that can be attached to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Permission {
    Read,
    Write,
    Delete,
}

impl Permission {
    /// Every permission in display order.
    pub fn all() -> &'static [Permission] {
        &[Permission::Read, Permission::Write, Permission::Delete]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "read" => Ok(Permission::Read),
            "write" => Ok(Permission::Write),
            "delete" => Ok(Permission::Delete),
            _ => Err(ModelError::InvalidPermission(s.to_string())),
        }
    }
}

/// Unordered, duplicate-free collection of permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every permission granted.
    pub fn full() -> Self {
        Permission::all().iter().copied().collect()
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// Returns `false` when the permission was already present.
    pub fn insert(&mut self, permission: Permission) -> bool {
        self.0.insert(permission)
    }

    pub fn remove(&mut self, permission: Permission) -> bool {
        self.0.remove(&permission)
    }

    /// Add the permission if absent, remove it otherwise.
    pub fn toggle(&mut self, permission: Permission) {
        if !self.0.remove(&permission) {
            self.0.insert(permission);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    /// Parse a comma separated list such as `read,write`.
    ///
    /// Blank segments are skipped so an empty string yields an empty set.
    pub fn parse_list(raw: &str) -> Result<Self, ModelError> {
        raw.split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::parse::<Permission>)
            .collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        PermissionSet(iter.into_iter().collect())
    }
}

impl IntoIterator for PermissionSet {
    type Item = Permission;
    type IntoIter = std::collections::btree_set::IntoIter<Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<const N: usize> From<[Permission; N]> for PermissionSet {
    fn from(value: [Permission; N]) -> Self {
        value.into_iter().collect()
    }
}

impl std::fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Permission::as_str).collect();
        f.write_str(&names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_conversion() {
        assert_eq!(Permission::Read.as_str(), "read");
        assert_eq!("WRITE".parse::<Permission>().unwrap(), Permission::Write);
        assert_eq!(" delete ".parse::<Permission>().unwrap(), Permission::Delete);
        assert!(matches!(
            "execute".parse::<Permission>(),
            Err(ModelError::InvalidPermission(_))
        ));
    }

    #[test]
    fn duplicates_and_order_are_irrelevant() {
        let a: PermissionSet =
            [Permission::Write, Permission::Read, Permission::Write].into();
        let b: PermissionSet = [Permission::Read, Permission::Write].into();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn parses_comma_separated_lists() {
        let set = PermissionSet::parse_list("read, delete,,").unwrap();
        assert!(set.contains(Permission::Read));
        assert!(set.contains(Permission::Delete));
        assert!(!set.contains(Permission::Write));
        assert!(PermissionSet::parse_list("").unwrap().is_empty());
        assert!(PermissionSet::parse_list("read,admin").is_err());
    }

    #[test]
    fn toggle_flips_membership() {
        let mut set = PermissionSet::new();
        set.toggle(Permission::Read);
        assert!(set.contains(Permission::Read));
        set.toggle(Permission::Read);
        assert!(set.is_empty());
    }
}
