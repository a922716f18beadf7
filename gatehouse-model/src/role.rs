use crate::ids::RoleId;
use crate::permission::{Permission, PermissionSet};

/// Named bundle of permissions assignable to users.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub permissions: PermissionSet,
}

impl Role {
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(permission)
    }
}

/// Partial replacement of role fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolePatch {
    pub name: Option<String>,
    pub permissions: Option<PermissionSet>,
}

impl RolePatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn permissions(mut self, permissions: PermissionSet) -> Self {
        self.permissions = Some(permissions);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.permissions.is_none()
    }

    pub fn apply_to(self, role: &mut Role) {
        if let Some(name) = self.name {
            role.name = name;
        }
        if let Some(permissions) = self.permissions {
            role.permissions = permissions;
        }
    }
}
