use argon2::{
    Algorithm, Argon2, Params, ParamsBuilder, Version,
    password_hash::{
        PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString,
    },
};
use gatehouse_model::PasswordHash;
use password_hash::{Error as PhcError, Salt};
use rand::{TryRngCore, rngs::OsRng};
use thiserror::Error;
use zeroize::Zeroizing;

/// Console credential hasher: Argon2id over `password || pepper`.
///
/// The stored PHC string carries the algorithm, cost and salt, never the
/// pepper. Salts come from the OS generator, so two hashes of one password
/// differ and both verify.
#[derive(Debug)]
pub struct AuthCrypto {
    argon2: Argon2<'static>,
    pepper: Zeroizing<Vec<u8>>,
}

#[derive(Debug, Error)]
pub enum AuthCryptoError {
    #[error("password pepper must not be empty")]
    EmptyPepper,
    #[error("Argon2 cost settings rejected: {0}")]
    InvalidCost(String),
    #[error("could not hash credential: {0}")]
    Hashing(String),
    #[error("stored credential is not a PHC string: {0}")]
    MalformedHash(String),
}

impl AuthCrypto {
    /// Memory cost in KiB used when configuration does not override it.
    pub const DEFAULT_MEMORY_KIB: u32 = 64 * 1024;
    pub const DEFAULT_ITERATIONS: u32 = 3;
    pub const DEFAULT_PARALLELISM: u32 = 1;
    const HASH_BYTES: usize = 32;

    pub fn new(pepper: impl AsRef<[u8]>) -> Result<Self, AuthCryptoError> {
        Self::with_cost(
            pepper,
            Self::DEFAULT_MEMORY_KIB,
            Self::DEFAULT_ITERATIONS,
            Self::DEFAULT_PARALLELISM,
        )
    }

    /// Hasher for the `[auth.argon2]` settings: memory in KiB, passes, lanes.
    pub fn with_cost(
        pepper: impl AsRef<[u8]>,
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, AuthCryptoError> {
        let params = ParamsBuilder::new()
            .m_cost(memory_kib)
            .t_cost(iterations)
            .p_cost(parallelism)
            .output_len(Self::HASH_BYTES)
            .build()
            .map_err(|err| AuthCryptoError::InvalidCost(err.to_string()))?;
        Self::with_params(pepper, params)
    }

    pub fn with_params(
        pepper: impl AsRef<[u8]>,
        params: Params,
    ) -> Result<Self, AuthCryptoError> {
        let pepper = pepper.as_ref();
        if pepper.is_empty() {
            return Err(AuthCryptoError::EmptyPepper);
        }

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            pepper: Zeroizing::new(pepper.to_vec()),
        })
    }

    fn material(&self, password: &str) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(Vec::with_capacity(
            password.len() + self.pepper.len(),
        ));
        bytes.extend_from_slice(password.as_bytes());
        bytes.extend_from_slice(&self.pepper);
        bytes
    }

    fn fresh_salt() -> Result<SaltString, AuthCryptoError> {
        let mut raw = [0u8; Salt::RECOMMENDED_LENGTH];
        OsRng
            .try_fill_bytes(&mut raw)
            .map_err(|err| AuthCryptoError::Hashing(err.to_string()))?;
        SaltString::encode_b64(&raw).map_err(hashing)
    }

    pub fn hash_password(
        &self,
        password: &str,
    ) -> Result<PasswordHash, AuthCryptoError> {
        let salt = Self::fresh_salt()?;
        let phc = self
            .argon2
            .hash_password(&self.material(password), &salt)
            .map_err(hashing)?;
        Ok(PasswordHash::new(phc.to_string()))
    }

    /// `Ok(false)` for a wrong password. Errors only when `stored` cannot
    /// be parsed.
    pub fn verify_password(
        &self,
        password: &str,
        stored: &PasswordHash,
    ) -> Result<bool, AuthCryptoError> {
        let parsed = PhcHash::new(stored.as_str())
            .map_err(|err| AuthCryptoError::MalformedHash(err.to_string()))?;
        let matched = self
            .argon2
            .verify_password(&self.material(password), &parsed)
            .is_ok();
        Ok(matched)
    }

    #[cfg(test)]
    fn pepper(&self) -> &[u8] {
        &self.pepper
    }
}

fn hashing(err: PhcError) -> AuthCryptoError {
    AuthCryptoError::Hashing(err.to_string())
}
