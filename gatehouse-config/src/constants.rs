/// Placeholder pepper accepted only in dev mode.
pub const DEFAULT_PASSWORD_PEPPER: &str = "gatehouse-dev-pepper-change-me";

pub const DEFAULT_ARGON2_MEMORY_KIB: u32 = 64 * 1024;
pub const DEFAULT_ARGON2_ITERATIONS: u32 = 3;
pub const DEFAULT_ARGON2_PARALLELISM: u32 = 1;

pub const DEFAULT_SEED_NAME: &str = "Admin User";
pub const DEFAULT_SEED_EMAIL: &str = "admin@example.com";
pub const DEFAULT_SEED_PASSWORD: &str = "admin123";

/// Files probed, in order, when no config path is given.
pub const DEFAULT_CONFIG_LOCATIONS: &[&str] =
    &["gatehouse.toml", "config/gatehouse.toml"];

pub mod env {
    pub const PASSWORD_PEPPER: &str = "GATEHOUSE_PASSWORD_PEPPER";
    pub const ARGON2_MEMORY_KIB: &str = "GATEHOUSE_ARGON2_MEMORY_KIB";
    pub const ARGON2_ITERATIONS: &str = "GATEHOUSE_ARGON2_ITERATIONS";
    pub const ARGON2_PARALLELISM: &str = "GATEHOUSE_ARGON2_PARALLELISM";
    pub const SEED_NAME: &str = "GATEHOUSE_SEED_NAME";
    pub const SEED_EMAIL: &str = "GATEHOUSE_SEED_EMAIL";
    pub const SEED_PASSWORD: &str = "GATEHOUSE_SEED_PASSWORD";
    pub const PREFERENCES_DIR: &str = "GATEHOUSE_PREFERENCES_DIR";
    pub const DEV_MODE: &str = "GATEHOUSE_DEV_MODE";
    pub const CONFIG_PATH: &str = "GATEHOUSE_CONFIG_PATH";
}
