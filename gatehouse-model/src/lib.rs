//! Entity model shared across Gatehouse crates.
//!
//! Users, roles and the permission vocabulary live here together with the
//! session snapshot handed out by the entity store. Nothing in this crate
//! mutates state; ownership of the collections belongs to `gatehouse-core`.
#![allow(missing_docs)]

pub mod error;
pub mod ids;
pub mod permission;
pub mod prelude;
pub mod role;
pub mod session;
pub mod user;

pub use error::{ModelError, Result as ModelResult};
pub use ids::{RoleId, UserId};
pub use permission::{Permission, PermissionSet};
pub use role::{Role, RolePatch};
pub use session::Session;
pub use user::{NewUser, PasswordHash, User, UserPatch};
