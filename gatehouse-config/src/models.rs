use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_ARGON2_ITERATIONS, DEFAULT_ARGON2_MEMORY_KIB,
    DEFAULT_ARGON2_PARALLELISM, DEFAULT_PASSWORD_PEPPER, DEFAULT_SEED_EMAIL,
    DEFAULT_SEED_NAME, DEFAULT_SEED_PASSWORD,
};

/// Fully resolved console configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub auth: AuthConfig,
    pub seed: SeedConfig,
    pub preferences: PreferencesConfig,
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub password_pepper: String,
    pub argon2: Argon2Settings,
}

impl AuthConfig {
    pub fn is_default_pepper(&self) -> bool {
        self.password_pepper == DEFAULT_PASSWORD_PEPPER
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_pepper: DEFAULT_PASSWORD_PEPPER.to_string(),
            argon2: Argon2Settings::default(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("password_pepper", &"<redacted>")
            .field("argon2", &self.argon2)
            .finish()
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Settings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for Argon2Settings {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_ARGON2_MEMORY_KIB,
            iterations: DEFAULT_ARGON2_ITERATIONS,
            parallelism: DEFAULT_ARGON2_PARALLELISM,
        }
    }
}

/// Administrator account created at start-up.
#[derive(Clone)]
pub struct SeedConfig {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SeedConfig {
    pub fn is_default_password(&self) -> bool {
        self.password == DEFAULT_SEED_PASSWORD
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SEED_NAME.to_string(),
            email: DEFAULT_SEED_EMAIL.to_string(),
            password: DEFAULT_SEED_PASSWORD.to_string(),
        }
    }
}

impl std::fmt::Debug for SeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedConfig")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferencesConfig {
    /// Directory holding the persisted display preference file.
    pub dir: PathBuf,
}

impl PreferencesConfig {
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Where the resolved values came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
