use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn help_lists_options() {
    let mut cmd = cargo_bin_cmd!("gatehouse");
    let output = cmd
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);
    for flag in ["--config", "--env-file", "--log-level", "--dev"] {
        assert!(text.contains(flag), "help missing {flag}");
    }
}

#[test]
fn weak_pepper_outside_dev_mode_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("gatehouse");
    cmd.current_dir(dir.path())
        .env_remove("GATEHOUSE_DEV_MODE")
        .env("GATEHOUSE_PASSWORD_PEPPER", "short")
        .env("GATEHOUSE_PREFERENCES_DIR", dir.path())
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GATEHOUSE_PASSWORD_PEPPER"));
}
