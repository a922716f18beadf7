//! Console focused snapshot of the model surface.
//! Prefer importing from this module in presentation layers.

pub use super::ids::{RoleId, UserId};
pub use super::permission::{Permission, PermissionSet};
pub use super::role::{Role, RolePatch};
pub use super::session::Session;
pub use super::user::{NewUser, PasswordHash, User, UserPatch};
