use gatehouse_config::preferences::STORAGE_KEY;
use gatehouse_config::{DisplayPreferences, PreferenceStore};
use tempfile::tempdir;

#[test]
fn missing_file_loads_light_theme() {
    let dir = tempdir().unwrap();
    let store = PreferenceStore::new(dir.path().join("nested"));
    assert_eq!(store.load(), DisplayPreferences::default());
    assert!(!store.load().is_dark);
}

#[test]
fn toggle_persists_across_instances() {
    let dir = tempdir().unwrap();
    let store = PreferenceStore::new(dir.path());
    assert!(store.toggle_theme().unwrap().is_dark);

    let reopened = PreferenceStore::new(dir.path());
    assert!(reopened.load().is_dark);
    assert!(!reopened.toggle_theme().unwrap().is_dark);
    assert!(!PreferenceStore::new(dir.path()).load().is_dark);
}

#[test]
fn file_uses_storage_key_and_shape() {
    let dir = tempdir().unwrap();
    let store = PreferenceStore::new(dir.path());
    store.save(DisplayPreferences { is_dark: true }).unwrap();

    let path = dir.path().join(format!("{STORAGE_KEY}.json"));
    assert_eq!(store.path(), path);
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(raw, serde_json::json!({"state": {"isDark": true}, "version": 0}));
}

#[test]
fn corrupt_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let store = PreferenceStore::new(dir.path());
    std::fs::write(store.path(), "{not json").unwrap();
    assert_eq!(store.load(), DisplayPreferences::default());

    store.save(DisplayPreferences { is_dark: true }).unwrap();
    assert!(store.load().is_dark);
}
