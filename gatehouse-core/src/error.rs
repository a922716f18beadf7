use thiserror::Error;

use crate::auth::AuthCryptoError;

/// Failures surfaced by the entity store.
///
/// Both variants are fatal: they mean the credential path itself broke, not
/// that a caller supplied a wrong password.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("credential hashing failed: {0}")]
    Credential(#[from] AuthCryptoError),

    #[error("credential hashing task failed: {0}")]
    HashingTask(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
