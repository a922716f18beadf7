//! User accounts managed through the console.
//!
//! A [`User`] never carries a plaintext password. The store hashes the
//! password supplied in [`NewUser`] before the user is created and keeps only
//! the resulting [`PasswordHash`]. Partial edits go through [`UserPatch`],
//! which deliberately has no password field: password changes have their own
//! hashing path in the store.

use zeroize::Zeroizing;

use crate::ids::{RoleId, UserId};

/// Stored, non-reversible representation of a credential (PHC string).
///
/// The value is never serialized and its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(encoded: impl Into<String>) -> Self {
        PasswordHash(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Registered console user.
///
/// # Fields
///
/// * `id` - Store-assigned identifier
/// * `name` - Display name
/// * `email` - Login key; not guaranteed unique
/// * `password` - Hashed credential, `None` until one is installed
/// * `is_active` - Account status flag shown in the user list
/// * `role_id` - Assigned role; may reference a role that no longer exists
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub password: Option<PasswordHash>,
    pub is_active: bool,
    pub role_id: RoleId,
}

impl User {
    /// Whether a credential has been installed for this account.
    pub fn has_credential(&self) -> bool {
        self.password.is_some()
    }
}

/// Input for creating a user. `password` is plaintext and is consumed by the
/// store's hashing step.
///
/// Not `Clone`, so the plaintext exists once and is wiped when dropped:
///
/// ```compile_fail
/// fn requires_clone<T: Clone>() {}
/// requires_clone::<gatehouse_model::NewUser>();
/// ```
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: Zeroizing<String>,
    pub role_id: RoleId,
    pub is_active: bool,
}

impl NewUser {
    /// New active user.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role_id: RoleId,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: Zeroizing::new(password.into()),
            role_id,
            is_active: true,
        }
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role_id", &self.role_id)
            .field("is_active", &self.is_active)
            .finish()
    }
}

/// Partial replacement of user fields. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<RoleId>,
    pub is_active: Option<bool>,
}

impl UserPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn role(mut self, role_id: RoleId) -> Self {
        self.role_id = Some(role_id);
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.role_id.is_none()
            && self.is_active.is_none()
    }

    /// Copy the supplied fields onto `user`.
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(role_id) = self.role_id {
            user.role_id = role_id;
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
    }
}
