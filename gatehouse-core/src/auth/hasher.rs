use gatehouse_model::PasswordHash;

use super::crypto::{AuthCrypto, AuthCryptoError};

/// One-way credential transform used by the entity store.
///
/// Implementations must be safe to call from the blocking thread pool. `hash`
/// may embed a random salt; `verify` answers `Ok(false)` for a wrong
/// password and reserves `Err` for failures that make the stored value
/// unusable.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, AuthCryptoError>;

    fn verify(
        &self,
        plaintext: &str,
        stored: &PasswordHash,
    ) -> Result<bool, AuthCryptoError>;
}

impl CredentialHasher for AuthCrypto {
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, AuthCryptoError> {
        self.hash_password(plaintext)
    }

    fn verify(
        &self,
        plaintext: &str,
        stored: &PasswordHash,
    ) -> Result<bool, AuthCryptoError> {
        self.verify_password(plaintext, stored)
    }
}
