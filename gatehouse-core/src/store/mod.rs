//! In-memory entity store
//!
//! [`EntityStore`] owns the user and role collections together with the
//! single session, and is the only place they are mutated. It is a cheap
//! handle: clone it to share the same store between consumers. Each process
//! constructs one store at start-up; tests construct as many isolated stores
//! as they need.
//!
//! ## Locking
//!
//! State sits behind a `parking_lot::RwLock` that is never held across an
//! `.await`. Hashing and verification run on the blocking thread pool with
//! no lock held, and their result is applied afterwards in one short write
//! section. Two concurrent logins therefore resolve in completion order: the
//! last one to finish decides the session.
//!
//! ## Revisions
//!
//! Every change to the user or role collections bumps a revision counter.
//! Derived views (see [`crate::query::UserListView`]) key their caches on it.
//! Session changes do not bump the revision.

pub mod seed;

use std::sync::Arc;

use gatehouse_model::{
    NewUser, PasswordHash, Permission, Role, RoleId, RolePatch, Session, User,
    UserId, UserPatch,
};
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::auth::CredentialHasher;
use crate::error::Result;

pub use seed::{SeedAccount, SeedInstaller, SeedStatus};

#[derive(Debug, Default)]
struct StoreState {
    users: Vec<User>,
    roles: Vec<Role>,
    session: Option<UserId>,
    revision: u64,
}

impl StoreState {
    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn user_mut(&mut self, id: &UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|user| &user.id == id)
    }

    fn role_mut(&mut self, id: &RoleId) -> Option<&mut Role> {
        self.roles.iter_mut().find(|role| &role.id == id)
    }
}

/// Consistent copy of both collections taken under one read lock.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub revision: u64,
    pub users: Vec<User>,
    pub roles: Vec<Role>,
}

struct StoreInner {
    instance_id: Uuid,
    state: RwLock<StoreState>,
    hasher: Arc<dyn CredentialHasher>,
    seeded: watch::Sender<SeedStatus>,
}

/// Authoritative in-memory store of users, roles and the session.
#[derive(Clone)]
pub struct EntityStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("EntityStore")
            .field("instance_id", &self.inner.instance_id)
            .field("users", &state.users.len())
            .field("roles", &state.roles.len())
            .field("authenticated", &state.session.is_some())
            .field("revision", &state.revision)
            .finish()
    }
}

impl EntityStore {
    /// Create a store holding the seed roles and administrator.
    ///
    /// The administrator has no credential yet; run the returned
    /// [`SeedInstaller`] to hash and install it. Logins against the
    /// administrator fail until then.
    pub fn new(
        hasher: Arc<dyn CredentialHasher>,
        seed: SeedAccount,
    ) -> (Self, SeedInstaller) {
        let state = StoreState {
            users: vec![seed::seed_admin(&seed)],
            roles: seed::seed_roles(),
            session: None,
            revision: 0,
        };
        let (seeded, _) = watch::channel(SeedStatus::Pending);

        let store = Self {
            inner: Arc::new(StoreInner {
                instance_id: Uuid::now_v7(),
                state: RwLock::new(state),
                hasher,
                seeded,
            }),
        };
        debug!(store = %store.inner.instance_id, "entity store created");

        let installer = SeedInstaller::new(store.clone(), seed.password);
        (store, installer)
    }

    /// Create a store and wait for the seed credential to be installed.
    pub async fn bootstrap(
        hasher: Arc<dyn CredentialHasher>,
        seed: SeedAccount,
    ) -> Result<Self> {
        let (store, installer) = Self::new(hasher, seed);
        installer.install().await?;
        Ok(store)
    }

    /// Identifier of this store instance, distinct for every store created.
    pub fn instance_id(&self) -> Uuid {
        self.inner.instance_id
    }

    /// Counter bumped on every user or role mutation.
    pub fn revision(&self) -> u64 {
        self.inner.state.read().revision
    }

    /// Users and roles at a single revision.
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.inner.state.read();
        StoreSnapshot {
            revision: state.revision,
            users: state.users.clone(),
            roles: state.roles.clone(),
        }
    }

    /// Whether the seed credential has been installed.
    pub fn is_seeded(&self) -> bool {
        *self.inner.seeded.borrow() == SeedStatus::Installed
    }

    pub fn seed_status(&self) -> SeedStatus {
        *self.inner.seeded.borrow()
    }

    /// Wait until seed installation has succeeded or failed.
    pub async fn seeded(&self) -> SeedStatus {
        let mut receiver = self.inner.seeded.subscribe();
        // The sender lives as long as `self`, so the wait cannot fail.
        match receiver.wait_for(|status| status.is_settled()).await {
            Ok(status) => *status,
            Err(_) => SeedStatus::Failed,
        }
    }

    /// Move the barrier out of `Pending`. Returns `false` if it had
    /// already settled.
    pub(crate) fn settle_seed(&self, status: SeedStatus) -> bool {
        self.inner.seeded.send_if_modified(|current| {
            if current.is_settled() {
                return false;
            }
            *current = status;
            true
        })
    }

    pub(crate) fn install_credential(
        &self,
        id: &UserId,
        hash: PasswordHash,
    ) -> bool {
        let mut state = self.inner.state.write();
        let Some(user) = state.user_mut(id) else {
            return false;
        };
        user.password = Some(hash);
        state.bump();
        true
    }

    pub(crate) async fn hash_plaintext(
        &self,
        plaintext: Zeroizing<String>,
    ) -> Result<PasswordHash> {
        let hasher = Arc::clone(&self.inner.hasher);
        let hash =
            tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
                .await??;
        Ok(hash)
    }

    async fn verify_plaintext(
        &self,
        plaintext: Zeroizing<String>,
        stored: PasswordHash,
    ) -> Result<bool> {
        let hasher = Arc::clone(&self.inner.hasher);
        let verified = tokio::task::spawn_blocking(move || {
            hasher.verify(&plaintext, &stored)
        })
        .await??;
        Ok(verified)
    }

    // Users

    /// All users in insertion order.
    pub fn users(&self) -> Vec<User> {
        self.inner.state.read().users.clone()
    }

    pub fn user(&self, id: &UserId) -> Option<User> {
        self.inner
            .state
            .read()
            .users
            .iter()
            .find(|user| &user.id == id)
            .cloned()
    }

    /// Hash the password and append a new user. Returns the assigned id.
    ///
    /// The plaintext is zeroed and dropped before this returns. Email
    /// uniqueness is not checked.
    pub async fn add_user(&self, new_user: NewUser) -> Result<UserId> {
        let NewUser {
            name,
            email,
            password,
            role_id,
            is_active,
        } = new_user;
        let password = self.hash_plaintext(password).await?;

        let user = User {
            id: UserId::generate(),
            name,
            email,
            password: Some(password),
            is_active,
            role_id,
        };
        let id = user.id.clone();

        {
            let mut state = self.inner.state.write();
            state.users.push(user);
            state.bump();
        }
        info!(user_id = %id, "user created");
        Ok(id)
    }

    /// Replace the supplied fields of a user. Returns `false` when no user
    /// has this id.
    pub fn update_user(&self, id: &UserId, patch: UserPatch) -> bool {
        let mut state = self.inner.state.write();
        let Some(user) = state.user_mut(id) else {
            debug!(user_id = %id, "update skipped, user not found");
            return false;
        };
        if patch.is_empty() {
            return true;
        }
        patch.apply_to(user);
        state.bump();
        info!(user_id = %id, "user updated");
        true
    }

    /// Hash and install a new password for a user. Returns `Ok(false)` when
    /// no user has this id.
    pub async fn set_password(
        &self,
        id: &UserId,
        password: impl Into<String>,
    ) -> Result<bool> {
        if self.user(id).is_none() {
            debug!(user_id = %id, "password change skipped, user not found");
            return Ok(false);
        }
        let hash = self
            .hash_plaintext(Zeroizing::new(password.into()))
            .await?;

        let installed = self.install_credential(id, hash);
        if installed {
            info!(user_id = %id, "password changed");
        }
        Ok(installed)
    }

    /// Remove a user. Deleting the signed-in user also ends the session.
    /// Returns `false` when no user has this id.
    pub fn delete_user(&self, id: &UserId) -> bool {
        let mut state = self.inner.state.write();
        let before = state.users.len();
        state.users.retain(|user| &user.id != id);
        if state.users.len() == before {
            debug!(user_id = %id, "delete skipped, user not found");
            return false;
        }

        if state.session.as_ref() == Some(id) {
            state.session = None;
            info!(user_id = %id, "session ended, signed-in user deleted");
        }
        state.bump();
        info!(user_id = %id, "user deleted");
        true
    }

    // Roles

    /// All roles in insertion order.
    pub fn roles(&self) -> Vec<Role> {
        self.inner.state.read().roles.clone()
    }

    pub fn role(&self, id: &RoleId) -> Option<Role> {
        self.inner
            .state
            .read()
            .roles
            .iter()
            .find(|role| &role.id == id)
            .cloned()
    }

    /// Append a role. Neither the name nor the permission set is validated.
    pub fn add_role(
        &self,
        name: impl Into<String>,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> RoleId {
        let role = Role {
            id: RoleId::generate(),
            name: name.into(),
            permissions: permissions.into_iter().collect(),
        };
        let id = role.id.clone();

        let mut state = self.inner.state.write();
        state.roles.push(role);
        state.bump();
        info!(role_id = %id, "role created");
        id
    }

    /// Replace the supplied fields of a role. Returns `false` when no role
    /// has this id.
    pub fn update_role(&self, id: &RoleId, patch: RolePatch) -> bool {
        let mut state = self.inner.state.write();
        let Some(role) = state.role_mut(id) else {
            debug!(role_id = %id, "update skipped, role not found");
            return false;
        };
        if patch.is_empty() {
            return true;
        }
        patch.apply_to(role);
        state.bump();
        info!(role_id = %id, "role updated");
        true
    }

    /// Remove a role. Users assigned to it keep the now dangling id.
    /// Returns `false` when no role has this id.
    pub fn delete_role(&self, id: &RoleId) -> bool {
        let mut state = self.inner.state.write();
        let before = state.roles.len();
        state.roles.retain(|role| &role.id != id);
        if state.roles.len() == before {
            debug!(role_id = %id, "delete skipped, role not found");
            return false;
        }

        let orphaned = state
            .users
            .iter()
            .filter(|user| &user.role_id == id)
            .count();
        state.bump();
        info!(role_id = %id, orphaned, "role deleted");
        true
    }

    // Session

    /// Snapshot of the session resolved against the current collections.
    pub fn session(&self) -> Session {
        let state = self.inner.state.read();
        let Some(user_id) = &state.session else {
            return Session::anonymous();
        };

        let current_user =
            state.users.iter().find(|user| &user.id == user_id).cloned();
        let role = current_user.as_ref().and_then(|user| {
            state
                .roles
                .iter()
                .find(|role| role.id == user.role_id)
                .cloned()
        });

        Session { current_user, role }
    }

    /// Authenticate by email and password.
    ///
    /// The first user whose email matches exactly (case-sensitive) is
    /// checked. On success the session switches to that user and `Ok(true)`
    /// is returned; on any mismatch the prior session is left as it was and
    /// `Ok(false)` is returned. Only a broken credential path is an error.
    ///
    /// A password change or deletion that lands while the password is being
    /// verified wins: the login is rejected.
    pub async fn login(&self, email: &str, password: &str) -> Result<bool> {
        let candidate = {
            let state = self.inner.state.read();
            state
                .users
                .iter()
                .find(|user| user.email == email)
                .map(|user| (user.id.clone(), user.password.clone()))
        };

        let Some((user_id, stored)) = candidate else {
            warn!("login rejected");
            return Ok(false);
        };
        let Some(stored) = stored else {
            warn!(user_id = %user_id, "login rejected, no credential installed");
            return Ok(false);
        };

        let verified = self
            .verify_plaintext(Zeroizing::new(password.to_owned()), stored.clone())
            .await?;
        if !verified {
            warn!(user_id = %user_id, "login rejected");
            return Ok(false);
        }

        // The verified hash must still be the user's credential.
        let mut state = self.inner.state.write();
        let current = state.users.iter().find(|user| user.id == user_id);
        let Some(current) = current else {
            warn!(user_id = %user_id, "login rejected, user deleted during verification");
            return Ok(false);
        };
        if current.password.as_ref() != Some(&stored) {
            warn!(user_id = %user_id, "login rejected, password changed during verification");
            return Ok(false);
        }
        state.session = Some(user_id.clone());
        info!(user_id = %user_id, "user signed in");
        Ok(true)
    }

    /// End the session.
    pub fn logout(&self) {
        let mut state = self.inner.state.write();
        if let Some(user_id) = state.session.take() {
            info!(user_id = %user_id, "user signed out");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthCryptoError, MockCredentialHasher};
    use crate::error::StoreError;
    use gatehouse_model::PasswordHash;

    fn plain_hasher() -> MockCredentialHasher {
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .returning(|plain| Ok(PasswordHash::new(format!("hashed:{plain}"))));
        hasher.expect_verify().returning(|plain, stored| {
            Ok(stored.as_str() == format!("hashed:{plain}"))
        });
        hasher
    }

    #[tokio::test]
    async fn hashing_failure_propagates_from_add_user() {
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_hash().returning(|_| {
            Err(AuthCryptoError::Hashing("rng unavailable".into()))
        });
        let (store, _installer) =
            EntityStore::new(Arc::new(hasher), SeedAccount::default());

        let result = store
            .add_user(NewUser::new(
                "Bob",
                "bob@example.com",
                "pw",
                RoleId::from_static("user"),
            ))
            .await;

        assert!(matches!(result, Err(StoreError::Credential(_))));
        assert_eq!(store.users().len(), 1);
    }

    #[tokio::test]
    async fn verification_failure_propagates_from_login() {
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Ok(PasswordHash::new("corrupt")));
        hasher.expect_verify().returning(|_, _| {
            Err(AuthCryptoError::MalformedHash("unparseable hash".into()))
        });
        let store = EntityStore::bootstrap(Arc::new(hasher), SeedAccount::default())
            .await
            .unwrap();

        let result = store.login("admin@example.com", "admin123").await;
        assert!(matches!(result, Err(StoreError::Credential(_))));
        assert!(!store.session().is_authenticated());
    }

    #[tokio::test]
    async fn failed_seed_install_still_releases_waiters() {
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_hash().returning(|_| {
            Err(AuthCryptoError::Hashing("rng unavailable".into()))
        });
        let (store, installer) =
            EntityStore::new(Arc::new(hasher), SeedAccount::default());
        let waiter = {
            let store = store.clone();
            tokio::spawn(async move { store.seeded().await })
        };

        assert!(matches!(
            installer.install().await,
            Err(StoreError::Credential(_))
        ));
        assert_eq!(waiter.await.unwrap(), SeedStatus::Failed);
        assert!(!store.is_seeded());
        assert!(!store.login("admin@example.com", "admin123").await.unwrap());
    }

    #[tokio::test]
    async fn dropped_installer_settles_barrier_as_failed() {
        let (store, installer) =
            EntityStore::new(Arc::new(plain_hasher()), SeedAccount::default());
        assert_eq!(store.seed_status(), SeedStatus::Pending);

        drop(installer);
        assert_eq!(store.seeded().await, SeedStatus::Failed);
    }

    #[tokio::test]
    async fn password_change_during_verification_rejects_login() {
        let (entered_tx, entered_rx) = std::sync::mpsc::channel::<()>();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .returning(|plain| Ok(PasswordHash::new(format!("hashed:{plain}"))));
        hasher.expect_verify().returning(move |plain, stored| {
            entered_tx.send(()).unwrap();
            release_rx.recv().unwrap();
            Ok(stored.as_str() == format!("hashed:{plain}"))
        });
        let store = EntityStore::bootstrap(Arc::new(hasher), SeedAccount::default())
            .await
            .unwrap();

        let login = {
            let store = store.clone();
            tokio::spawn(async move {
                store.login("admin@example.com", "admin123").await
            })
        };
        tokio::task::spawn_blocking(move || entered_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(
            store
                .set_password(&seed::admin_user_id(), "rotated")
                .await
                .unwrap()
        );
        release_tx.send(()).unwrap();

        assert!(!login.await.unwrap().unwrap());
        assert!(!store.session().is_authenticated());
    }

    #[tokio::test]
    async fn stored_password_is_the_hasher_output() {
        let (store, installer) =
            EntityStore::new(Arc::new(plain_hasher()), SeedAccount::default());
        installer.install().await.unwrap();

        let id = store
            .add_user(NewUser::new(
                "Bob",
                "bob@example.com",
                "pw",
                RoleId::from_static("user"),
            ))
            .await
            .unwrap();

        let user = store.user(&id).unwrap();
        assert_eq!(user.password, Some(PasswordHash::new("hashed:pw")));
    }

    #[tokio::test]
    async fn revision_tracks_collection_changes_only() {
        let store = EntityStore::bootstrap(
            Arc::new(plain_hasher()),
            SeedAccount::default(),
        )
        .await
        .unwrap();
        let start = store.revision();

        assert!(store.login("admin@example.com", "admin123").await.unwrap());
        store.logout();
        assert_eq!(store.revision(), start);

        store.add_role("Auditor", [Permission::Read]);
        assert_eq!(store.revision(), start + 1);

        assert!(!store.delete_role(&RoleId::from_static("missing")));
        assert_eq!(store.revision(), start + 1);
    }

    #[test]
    fn debug_output_summarizes_state() {
        let (store, _installer) =
            EntityStore::new(Arc::new(plain_hasher()), SeedAccount::default());
        let rendered = format!("{store:?}");
        assert!(rendered.contains("users: 1"));
        assert!(rendered.contains("roles: 2"));
    }
}
