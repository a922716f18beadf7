use std::collections::HashMap;
use std::fs;

use gatehouse_config::{ConfigGuardRailError, ConfigLoadError, ConfigLoader};
use tempfile::tempdir;

const STRONG_PEPPER: &str = "0123456789abcdef0123456789abcdef";

fn loader_with(vars: &[(&str, &str)]) -> ConfigLoader {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ConfigLoader::new()
        .without_dotenv()
        .with_lookup(move |key| vars.get(key).cloned())
}

#[test]
fn defaults_are_rejected_outside_dev_mode() {
    let dir = tempdir().unwrap();
    let prefs = dir.path().to_string_lossy().to_string();
    let err = loader_with(&[("GATEHOUSE_PREFERENCES_DIR", prefs.as_str())])
        .load()
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::WeakSecret { .. })
    ));
}

#[test]
fn dev_mode_accepts_defaults_with_warnings() {
    let dir = tempdir().unwrap();
    let prefs = dir.path().to_string_lossy().to_string();
    let load = loader_with(&[
        ("GATEHOUSE_PREFERENCES_DIR", prefs.as_str()),
        ("GATEHOUSE_DEV_MODE", "true"),
    ])
    .load()
    .unwrap();

    assert!(load.config.dev_mode);
    assert_eq!(load.config.seed.email, "admin@example.com");
    assert_eq!(load.config.auth.argon2.memory_kib, 64 * 1024);
    assert_eq!(load.warnings.items.len(), 2);
}

#[test]
fn environment_overrides_file_and_file_overrides_defaults() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("gatehouse.toml");
    fs::write(
        &config_path,
        format!(
            r#"
dev_mode = false

[auth]
password_pepper = "{STRONG_PEPPER}"

[auth.argon2]
memory_kib = 2048
iterations = 2

[seed]
email = "root@corp.test"
password = "from-file"

[preferences]
dir = "{}"
"#,
            dir.path().join("prefs").display()
        ),
    )
    .unwrap();

    let load = loader_with(&[
        ("GATEHOUSE_ARGON2_ITERATIONS", "4"),
        ("GATEHOUSE_SEED_PASSWORD", "from-env"),
    ])
    .with_config_path(&config_path)
    .load()
    .unwrap();

    let config = load.config;
    assert_eq!(config.auth.argon2.memory_kib, 2048);
    assert_eq!(config.auth.argon2.iterations, 4);
    assert_eq!(config.auth.argon2.parallelism, 1);
    assert_eq!(config.seed.email, "root@corp.test");
    assert_eq!(config.seed.name, "Admin User");
    assert_eq!(config.seed.password, "from-env");
    assert_eq!(config.preferences.dir, dir.path().join("prefs"));
    assert_eq!(config.metadata.config_path.as_deref(), Some(config_path.as_path()));
    assert!(load.warnings.is_empty());
}

#[test]
fn json_config_files_are_supported() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("gatehouse.json");
    let body = serde_json::json!({
        "dev_mode": true,
        "preferences": { "dir": dir.path() },
        "seed": { "name": "Root" }
    });
    fs::write(&config_path, body.to_string()).unwrap();

    let load = loader_with(&[]).with_config_path(&config_path).load().unwrap();
    assert!(load.config.dev_mode);
    assert_eq!(load.config.seed.name, "Root");
}

#[test]
fn env_file_sits_between_file_and_process_env() {
    let dir = tempdir().unwrap();
    let env_path = dir.path().join("console.env");
    fs::write(
        &env_path,
        format!(
            "GATEHOUSE_DEV_MODE=true\nGATEHOUSE_SEED_NAME=FromDotenv\nGATEHOUSE_SEED_EMAIL=dotenv@corp.test\nGATEHOUSE_PREFERENCES_DIR={}\n",
            dir.path().display()
        ),
    )
    .unwrap();

    let load = loader_with(&[("GATEHOUSE_SEED_EMAIL", "process@corp.test")])
        .with_env_file(&env_path)
        .load()
        .unwrap();
    assert!(load.config.metadata.env_file_loaded);
    assert_eq!(load.config.seed.name, "FromDotenv");
    assert_eq!(load.config.seed.email, "process@corp.test");
}

#[test]
fn explicit_missing_config_is_an_error() {
    let dir = tempdir().unwrap();
    let err = loader_with(&[])
        .with_config_path(dir.path().join("absent.toml"))
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
}

#[test]
fn malformed_values_are_reported() {
    let err = loader_with(&[("GATEHOUSE_ARGON2_MEMORY_KIB", "lots")])
        .load()
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::InvalidValue { key: "GATEHOUSE_ARGON2_MEMORY_KIB", .. }
    ));

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("gatehouse.toml");
    fs::write(&config_path, "[auth\npassword_pepper = 1").unwrap();
    let err = loader_with(&[]).with_config_path(&config_path).load().unwrap_err();
    assert!(matches!(err, ConfigLoadError::Parse { .. }));
}

#[test]
fn dev_flag_overrides_environment() {
    let dir = tempdir().unwrap();
    let prefs = dir.path().to_string_lossy().to_string();
    let load = loader_with(&[
        ("GATEHOUSE_PREFERENCES_DIR", prefs.as_str()),
        ("GATEHOUSE_DEV_MODE", "false"),
    ])
    .with_dev_mode(true)
    .load()
    .unwrap();
    assert!(load.config.dev_mode);
}
