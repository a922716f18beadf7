//! Credential hashing.
//!
//! [`AuthCrypto`] is the production Argon2id implementation;
//! [`CredentialHasher`] is the seam the entity store depends on.

pub mod crypto;
pub mod hasher;

pub use crypto::{AuthCrypto, AuthCryptoError};
pub use hasher::CredentialHasher;
#[cfg(test)]
pub use hasher::MockCredentialHasher;
