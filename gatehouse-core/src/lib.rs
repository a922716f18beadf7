//! # Gatehouse Core
//!
//! Core library for the Gatehouse admin console: the in-memory entity store
//! for users and roles, credential hashing, the session gate guarding the
//! dashboard, and the user list query engine.
//!
//! ## Overview
//!
//! - **Entity Store**: [`EntityStore`] owns users, roles and the single
//!   session. Passwords are hashed with Argon2id before they are stored.
//! - **Seed data**: every store starts with the `admin` and `user` roles and
//!   one administrator whose credential is installed asynchronously by a
//!   [`SeedInstaller`].
//! - **Session Gate**: [`SessionGate`] classifies a session against a
//!   [`Guard`] as allowed, unauthenticated or forbidden.
//! - **Query Engine**: [`query::run_user_query`] filters and sorts users;
//!   [`UserListView`] memoizes the result per store revision.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use gatehouse_core::{AuthCrypto, EntityStore, SeedAccount};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let hasher = Arc::new(AuthCrypto::new("a-long-random-pepper")?);
//! let store = EntityStore::bootstrap(hasher, SeedAccount::default()).await?;
//! assert!(store.login("admin@example.com", "admin123").await?);
//! # Ok(())
//! # }
//! ```
#![allow(missing_docs)]

pub mod auth;
pub mod error;
pub mod gate;
pub mod navigation;
pub mod permissions;
pub mod query;
pub mod store;

pub use auth::{AuthCrypto, AuthCryptoError, CredentialHasher};
pub use error::{Result, StoreError};
pub use gate::{Access, Guard, SessionGate};
pub use navigation::{DashboardTab, Navigator, View};
pub use permissions::PermissionChecker;
pub use query::{
    RoleFilter, SortCriteria, SortDirection, SortField, StatusFilter,
    UserListView, UserQuery, UserRow,
};
pub use store::seed::{ADMIN_ROLE_ID, ADMIN_USER_ID, USER_ROLE_ID};
pub use store::{
    EntityStore, SeedAccount, SeedInstaller, SeedStatus, StoreSnapshot,
};

pub use gatehouse_model as model;
