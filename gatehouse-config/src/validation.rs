use thiserror::Error;

use crate::constants::env;
use crate::models::{Argon2Settings, AuthConfig, ConsoleConfig};

/// Minimum Argon2 memory per lane, in KiB.
const MIN_MEMORY_KIB_PER_LANE: u32 = 8;
const MIN_SECRET_LENGTH: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("authentication secret {field} {reason}")]
    WeakSecret { field: &'static str, reason: String },
    #[error("invalid Argon2 parameters: {reason}")]
    InvalidArgon2 { reason: String },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.hint {
            Some(hint) => write!(f, "{} (hint: {hint})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

pub fn apply_guard_rails(
    config: &ConsoleConfig,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    validate_argon2(&config.auth.argon2)?;

    if config.dev_mode {
        if config.auth.is_default_pepper() {
            warnings.push_with_hint(
                "Using the placeholder password pepper",
                format!("Set {} before leaving dev mode", env::PASSWORD_PEPPER),
            );
        }
    } else {
        enforce_secret(&config.auth)?;
    }

    if config.seed.is_default_password() {
        warnings.push_with_hint(
            "Seed administrator uses the well-known default password",
            format!("Set {} to a private value", env::SEED_PASSWORD),
        );
    }

    Ok(warnings)
}

fn enforce_secret(auth: &AuthConfig) -> Result<(), ConfigGuardRailError> {
    if auth.is_default_pepper() {
        return Err(ConfigGuardRailError::WeakSecret {
            field: env::PASSWORD_PEPPER,
            reason: "uses the default placeholder value".into(),
        });
    }

    if auth.password_pepper.chars().count() < MIN_SECRET_LENGTH {
        return Err(ConfigGuardRailError::WeakSecret {
            field: env::PASSWORD_PEPPER,
            reason: format!("must be at least {MIN_SECRET_LENGTH} characters"),
        });
    }

    Ok(())
}

fn validate_argon2(
    settings: &Argon2Settings,
) -> Result<(), ConfigGuardRailError> {
    if settings.iterations == 0 {
        return Err(ConfigGuardRailError::InvalidArgon2 {
            reason: "iterations must be at least 1".into(),
        });
    }
    if settings.parallelism == 0 {
        return Err(ConfigGuardRailError::InvalidArgon2 {
            reason: "parallelism must be at least 1".into(),
        });
    }

    let minimum = settings.parallelism.saturating_mul(MIN_MEMORY_KIB_PER_LANE);
    if settings.memory_kib < minimum {
        return Err(ConfigGuardRailError::InvalidArgon2 {
            reason: format!(
                "memory_kib {} is below {minimum} KiB for {} lane(s)",
                settings.memory_kib, settings.parallelism
            ),
        });
    }

    Ok(())
}
