use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use tracing::debug;

use crate::constants::DEFAULT_CONFIG_LOCATIONS;
use crate::error::ConfigLoadError;
use crate::models::{
    Argon2Settings, AuthConfig, ConfigMetadata, ConsoleConfig,
    PreferencesConfig, SeedConfig,
};
use crate::sources::{EnvConfig, FileConfig};
use crate::validation::{self, ConfigWarnings};

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    /// Do not look for a `.env` file when none is given explicitly.
    pub skip_dotenv: bool,
    /// Forces dev mode on or off regardless of file and environment.
    pub dev_mode: Option<bool>,
}

/// Resolves a [`ConsoleConfig`] from defaults, a config file, a `.env` file
/// and the environment, in increasing order of precedence.
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
    lookup: Lookup,
}

impl std::fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolved configuration plus the non-fatal findings of the guard rails.
#[derive(Debug)]
pub struct ConfigLoad {
    pub config: ConsoleConfig,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    /// Loader reading the process environment.
    pub fn new() -> Self {
        Self {
            options: ConfigLoaderOptions::default(),
            lookup: Box::new(|key| std::env::var(key).ok()),
        }
    }

    pub fn with_options(mut self, options: ConfigLoaderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn without_dotenv(mut self) -> Self {
        self.options.skip_dotenv = true;
        self
    }

    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.options.dev_mode = Some(dev_mode);
        self
    }

    /// Replace the process environment with `lookup`.
    pub fn with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.lookup = Box::new(lookup);
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (env_file_vars, env_file_loaded) = self.read_env_file()?;
        let lookup = |key: &str| {
            (self.lookup)(key).or_else(|| env_file_vars.get(key).cloned())
        };
        let env = EnvConfig::gather(&lookup)?;

        let (file, config_path) = self.load_file_config(&env)?;
        let config = self.compose_config(
            file.unwrap_or_default(),
            env,
            ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        )?;

        let warnings = validation::apply_guard_rails(&config)?;
        Ok(ConfigLoad { config, warnings })
    }

    fn read_env_file(
        &self,
    ) -> Result<(HashMap<String, String>, bool), ConfigLoadError> {
        let iter = match &self.options.env_file {
            Some(path) => dotenvy::from_path_iter(path),
            None if self.options.skip_dotenv => return Ok((HashMap::new(), false)),
            None => dotenvy::from_filename_iter(".env"),
        };
        let iter = match iter {
            Ok(iter) => iter,
            Err(dotenvy::Error::Io(err)) => {
                debug!(error = %err, "no .env file loaded");
                return Ok((HashMap::new(), false));
            }
            Err(err) => return Err(err.into()),
        };

        let vars = iter.collect::<Result<HashMap<_, _>, _>>()?;
        debug!(keys = vars.len(), ".env file loaded");
        Ok((vars, true))
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let requested = self
            .options
            .config_path
            .clone()
            .or_else(|| env.config_path.clone());

        let path = match requested {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(path) => path,
                None => {
                    debug!("no config file found, using environment and defaults");
                    return Ok((None, None));
                }
            },
        };

        let contents = fs::read_to_string(&path).map_err(|source| {
            ConfigLoadError::Io {
                path: path.clone(),
                source,
            }
        })?;
        let file = parse_file_config(&path, &contents).map_err(|source| {
            ConfigLoadError::Parse {
                path: path.clone(),
                source,
            }
        })?;
        debug!(path = %path.display(), "config file loaded");
        Ok((Some(file), Some(path)))
    }

    fn compose_config(
        &self,
        file: FileConfig,
        env: EnvConfig,
        metadata: ConfigMetadata,
    ) -> Result<ConsoleConfig, ConfigLoadError> {
        let defaults = AuthConfig::default();
        let argon2 = Argon2Settings {
            memory_kib: env
                .argon2_memory_kib
                .or(file.auth.argon2.memory_kib)
                .unwrap_or(defaults.argon2.memory_kib),
            iterations: env
                .argon2_iterations
                .or(file.auth.argon2.iterations)
                .unwrap_or(defaults.argon2.iterations),
            parallelism: env
                .argon2_parallelism
                .or(file.auth.argon2.parallelism)
                .unwrap_or(defaults.argon2.parallelism),
        };
        let auth = AuthConfig {
            password_pepper: env
                .password_pepper
                .or(file.auth.password_pepper)
                .unwrap_or(defaults.password_pepper),
            argon2,
        };

        let seed_defaults = SeedConfig::default();
        let seed = SeedConfig {
            name: env
                .seed_name
                .or(file.seed.name)
                .unwrap_or(seed_defaults.name),
            email: env
                .seed_email
                .or(file.seed.email)
                .unwrap_or(seed_defaults.email),
            password: env
                .seed_password
                .or(file.seed.password)
                .unwrap_or(seed_defaults.password),
        };

        let dir = match env.preferences_dir.or(file.preferences.dir) {
            Some(dir) => dir,
            None => default_preferences_dir()
                .ok_or(ConfigLoadError::NoPreferencesDir)?,
        };

        let dev_mode = self
            .options
            .dev_mode
            .or(env.dev_mode)
            .or(file.dev_mode)
            .unwrap_or(false);

        Ok(ConsoleConfig {
            auth,
            seed,
            preferences: PreferencesConfig { dir },
            dev_mode,
            metadata,
        })
    }
}

fn parse_file_config(path: &Path, contents: &str) -> anyhow::Result<FileConfig> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(contents).context("invalid JSON configuration")
    } else {
        toml::from_str(contents).context("invalid TOML configuration")
    }
}

fn default_preferences_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "gatehouse", "console")
        .map(|dirs| dirs.config_dir().to_path_buf())
}
