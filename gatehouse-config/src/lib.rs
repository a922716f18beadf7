//! Configuration library for Gatehouse.
//!
//! Loads the console configuration from defaults, an optional TOML or JSON
//! file, an optional `.env` file and the process environment, applies guard
//! rails, and persists the display preference flag between runs.
#![allow(missing_docs)]

pub mod constants;
pub mod error;
pub mod loader;
pub mod models;
pub mod preferences;
pub mod sources;
pub mod util;
pub mod validation;

pub use error::ConfigLoadError;
pub use loader::{ConfigLoad, ConfigLoader, ConfigLoaderOptions};
pub use models::{
    Argon2Settings, AuthConfig, ConfigMetadata, ConsoleConfig,
    PreferencesConfig, SeedConfig,
};
pub use preferences::{DisplayPreferences, PreferenceStore, PreferencesError};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
