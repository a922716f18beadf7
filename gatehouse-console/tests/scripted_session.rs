use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn console(dir: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("gatehouse");
    cmd.current_dir(dir)
        .arg("--dev")
        .arg("--log-level")
        .arg("warn")
        .env("GATEHOUSE_ARGON2_MEMORY_KIB", "1024")
        .env("GATEHOUSE_ARGON2_ITERATIONS", "1")
        .env("GATEHOUSE_ARGON2_PARALLELISM", "1")
        .env("GATEHOUSE_PREFERENCES_DIR", dir);
    cmd
}

#[test]
fn seed_admin_signs_in_and_lists_users() {
    let dir = tempfile::tempdir().unwrap();
    console(dir.path())
        .write_stdin(
            "login admin@example.com nope\n\
             login admin@example.com admin123\n\
             add-role Auditor read\n\
             sort name\n\
             quit\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid email or password"))
        .stdout(predicate::str::contains("Signed in as Admin User"))
        .stdout(predicate::str::contains("Created role"))
        .stdout(predicate::str::contains("sort: name desc"));
}

#[test]
fn theme_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    console(dir.path())
        .write_stdin("theme\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: dark"));

    console(dir.path())
        .write_stdin("quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("(dark theme)"));

    assert!(dir.path().join("theme-storage.json").exists());
}

#[test]
fn piped_login_without_password_does_not_block() {
    let dir = tempfile::tempdir().unwrap();
    console(dir.path())
        .write_stdin("login admin@example.com\nwhoami\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("error: password required"))
        .stdout(predicate::str::contains("Not signed in"))
        .stdout(predicate::str::contains("Signed in as").not());
}
