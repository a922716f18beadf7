//! Start-up data and the credential installation barrier.
//!
//! Every store starts with two roles (`admin`, `user`) and one administrator
//! account. The administrator's password is hashed after the store exists,
//! by a [`SeedInstaller`]; until it finishes, logins against that account
//! fail. [`EntityStore::seeded`] resolves once installation has either
//! succeeded or failed.

use gatehouse_model::{Permission, PermissionSet, Role, RoleId, User, UserId};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::EntityStore;
use crate::error::Result;

/// Identifier of the seeded administrator role.
pub const ADMIN_ROLE_ID: &str = "admin";
/// Identifier of the seeded read-only role.
pub const USER_ROLE_ID: &str = "user";
/// Identifier of the seeded administrator account.
pub const ADMIN_USER_ID: &str = "admin";

/// Progress of the seed credential installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStatus {
    Pending,
    Installed,
    /// Hashing failed or the installer was dropped unused. The
    /// administrator has no credential and cannot log in.
    Failed,
}

impl SeedStatus {
    pub fn is_settled(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Credentials of the administrator account created at start-up.
#[derive(Clone)]
pub struct SeedAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Default for SeedAccount {
    fn default() -> Self {
        Self {
            name: "Admin User".to_string(),
            email: "admin@example.com".to_string(),
            password: "admin123".to_string(),
        }
    }
}

impl std::fmt::Debug for SeedAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAccount")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub(crate) fn seed_roles() -> Vec<Role> {
    vec![
        Role {
            id: RoleId::from_static(ADMIN_ROLE_ID),
            name: "Administrator".to_string(),
            permissions: PermissionSet::full(),
        },
        Role {
            id: RoleId::from_static(USER_ROLE_ID),
            name: "User".to_string(),
            permissions: [Permission::Read].into(),
        },
    ]
}

pub(crate) fn seed_admin(account: &SeedAccount) -> User {
    User {
        id: admin_user_id(),
        name: account.name.clone(),
        email: account.email.clone(),
        password: None,
        is_active: true,
        role_id: RoleId::from_static(ADMIN_ROLE_ID),
    }
}

pub(crate) fn admin_user_id() -> UserId {
    UserId::from_static(ADMIN_USER_ID)
}

/// Installs the seed administrator's credential into a fresh store.
///
/// Returned by [`EntityStore::new`]. Dropping it without calling
/// [`install`](Self::install) leaves the administrator unable to log in and
/// settles the barrier as [`SeedStatus::Failed`].
pub struct SeedInstaller {
    store: EntityStore,
    password: Zeroizing<String>,
}

impl std::fmt::Debug for SeedInstaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedInstaller")
            .field("store", &self.store.instance_id())
            .finish_non_exhaustive()
    }
}

impl SeedInstaller {
    pub(crate) fn new(store: EntityStore, password: String) -> Self {
        Self {
            store,
            password: Zeroizing::new(password),
        }
    }

    /// Hash the administrator password, store it, and settle the barrier.
    ///
    /// The barrier settles on both outcomes; a hashing failure is returned
    /// after waiters have been released.
    pub async fn install(self) -> Result<()> {
        let hashed = self.store.hash_plaintext(self.password.clone()).await;
        let hash = match hashed {
            Ok(hash) => hash,
            Err(err) => {
                warn!(error = %err, "seed administrator credential not installed");
                self.store.settle_seed(SeedStatus::Failed);
                return Err(err);
            }
        };

        if self.store.install_credential(&admin_user_id(), hash) {
            info!("seed administrator credential installed");
        } else {
            debug!("seed administrator removed before credential install");
        }
        self.store.settle_seed(SeedStatus::Installed);
        Ok(())
    }
}

impl Drop for SeedInstaller {
    fn drop(&mut self) {
        if self.store.settle_seed(SeedStatus::Failed) {
            warn!("seed installer dropped before installing the credential");
        }
    }
}
