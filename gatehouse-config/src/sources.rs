use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::env;
use crate::error::ConfigLoadError;
use crate::util::{non_blank, parse_bool};

/// Raw configuration as defined in a TOML or JSON file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub auth: FileAuthConfig,
    #[serde(default)]
    pub seed: FileSeedConfig,
    #[serde(default)]
    pub preferences: FilePreferencesConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_pepper: Option<String>,
    #[serde(default)]
    pub argon2: FileArgon2Config,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileArgon2Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_kib: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileSeedConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FilePreferencesConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub password_pepper: Option<String>,
    pub argon2_memory_kib: Option<u32>,
    pub argon2_iterations: Option<u32>,
    pub argon2_parallelism: Option<u32>,
    pub seed_name: Option<String>,
    pub seed_email: Option<String>,
    pub seed_password: Option<String>,
    pub preferences_dir: Option<PathBuf>,
    pub dev_mode: Option<bool>,
    pub config_path: Option<PathBuf>,
}

impl EnvConfig {
    /// Read every recognised key through `lookup`. Blank values count as
    /// unset; malformed numbers and booleans are rejected.
    pub fn gather(
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigLoadError> {
        let var = |key: &str| non_blank(lookup(key));

        Ok(Self {
            password_pepper: var(env::PASSWORD_PEPPER),
            argon2_memory_kib: parse_u32(env::ARGON2_MEMORY_KIB, var(env::ARGON2_MEMORY_KIB))?,
            argon2_iterations: parse_u32(env::ARGON2_ITERATIONS, var(env::ARGON2_ITERATIONS))?,
            argon2_parallelism: parse_u32(
                env::ARGON2_PARALLELISM,
                var(env::ARGON2_PARALLELISM),
            )?,
            seed_name: var(env::SEED_NAME),
            seed_email: var(env::SEED_EMAIL),
            seed_password: var(env::SEED_PASSWORD),
            preferences_dir: var(env::PREFERENCES_DIR).map(PathBuf::from),
            dev_mode: var(env::DEV_MODE)
                .map(|raw| {
                    parse_bool(&raw).ok_or(ConfigLoadError::InvalidValue {
                        key: env::DEV_MODE,
                        value: raw,
                    })
                })
                .transpose()?,
            config_path: var(env::CONFIG_PATH).map(PathBuf::from),
        })
    }
}

fn parse_u32(
    key: &'static str,
    raw: Option<String>,
) -> Result<Option<u32>, ConfigLoadError> {
    raw.map(|value| {
        value
            .trim()
            .parse()
            .map_err(|_| ConfigLoadError::InvalidValue { key, value })
    })
    .transpose()
}
