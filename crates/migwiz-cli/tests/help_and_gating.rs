mod support;

use predicates::prelude::*;
use std::fs;

use support::{
    assert_timestamp_log_names, new_command_with_temp_home, write_archive, write_valid_config,
};

#[test]
fn root_help_runs_without_config() {
    let (mut command, _temp_home) = new_command_with_temp_home();
    command
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: migwiz"))
        .stdout(predicate::str::contains("--diagnostics"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("doctor"));
}

#[test]
fn run_help_documents_the_headless_flags() {
    let (mut command, _temp_home) = new_command_with_temp_home();
    command
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Run the whole migration non-interactively",
        ))
        .stdout(predicate::str::contains("--archive"))
        .stdout(predicate::str::contains("--verify"))
        .stdout(predicate::str::contains("--keep-going"));
}

#[test]
fn doctor_help_runs_without_config() {
    let (mut command, _temp_home) = new_command_with_temp_home();
    command
        .args(["doctor", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Run environment and configuration checks",
        ));
}

#[test]
fn doctor_runs_without_config() {
    let (mut command, _temp_home) = new_command_with_temp_home();
    command
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("config file exists"))
        .stdout(predicate::str::contains(".config/migwiz/config.toml"))
        .stdout(predicate::str::contains("0 failed"));
}

#[test]
fn doctor_fails_when_the_staging_directory_is_missing() {
    let (mut command, temp_home) = new_command_with_temp_home();
    let config_dir = temp_home.path().join(".config").join("migwiz");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(
        config_dir.join("config.toml"),
        r#"
version = 1

[archive]
max_size_mb = 100
staging_dir = "/nonexistent/migwiz-staging"
"#,
    )
    .expect("write config");

    command
        .arg("doctor")
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAIL"))
        .stdout(predicate::str::contains("staging directory usable"))
        .stderr(predicate::str::contains("doctor found failing checks"));
}

#[test]
fn run_migrates_a_staged_archive_end_to_end() {
    let (mut command, temp_home) = new_command_with_temp_home();
    write_valid_config(temp_home.path());
    let archive = write_archive(temp_home.path(), "export.zip");

    // The simulated extraction stages into a directory named after the
    // archive; pre-seeding it gives the migration entries to walk.
    let staging = temp_home.path().join("export");
    fs::create_dir_all(&staging).expect("create staging dir");
    fs::write(staging.join("notes.txt"), b"hello").expect("write entry");

    command
        .args([
            "run",
            "--archive",
            archive.to_str().expect("utf8 path"),
            "--username",
            "admin",
            "--password",
            "changeme1",
            "--verify",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries migrated"))
        .stdout(predicate::str::contains("Migration complete."));
}

#[test]
fn run_rejects_wrong_credentials_before_migrating() {
    let (mut command, temp_home) = new_command_with_temp_home();
    write_valid_config(temp_home.path());
    let archive = write_archive(temp_home.path(), "export.zip");

    command
        .args([
            "run",
            "--archive",
            archive.to_str().expect("utf8 path"),
            "--username",
            "admin",
            "--password",
            "nope12345",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid username or password"))
        .stderr(predicate::str::contains("stopped at the auth step"));
}

#[test]
fn run_sends_an_unsupported_archive_back_to_upload() {
    let (mut command, temp_home) = new_command_with_temp_home();
    write_valid_config(temp_home.path());
    let archive = write_archive(temp_home.path(), "export.txt");

    command
        .args([
            "run",
            "--archive",
            archive.to_str().expect("utf8 path"),
            "--username",
            "admin",
            "--password",
            "changeme1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid file format"))
        .stderr(predicate::str::contains("stopped at the upload step"));
}

#[test]
fn run_rejects_an_invalid_config_before_any_work() {
    let (mut command, temp_home) = new_command_with_temp_home();
    let config_dir = temp_home.path().join(".config").join("migwiz");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(config_dir.join("config.toml"), "version = 2\n").expect("write config");
    let archive = write_archive(temp_home.path(), "export.zip");

    command
        .args([
            "run",
            "--archive",
            archive.to_str().expect("utf8 path"),
            "--username",
            "admin",
            "--password",
            "changeme1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("version must be 1"));
}

#[test]
fn diagnostics_log_never_contains_run_credentials() {
    let (mut command, temp_home) = new_command_with_temp_home();
    write_valid_config(temp_home.path());
    let archive = write_archive(temp_home.path(), "export.zip");

    command
        .args([
            "--diagnostics",
            "run",
            "--archive",
            archive.to_str().expect("utf8 path"),
            "--username",
            "admin",
            "--password",
            "changeme1",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Diagnostics enabled:"));

    let diagnostics_dir = temp_home.path().join(".config/migwiz/diagnostics");
    let mut saw_dispatch = false;
    for entry in fs::read_dir(&diagnostics_dir).expect("diagnostics dir") {
        let entry = entry.expect("diagnostics entry");
        let contents = fs::read_to_string(entry.path()).expect("read diagnostics log");
        assert!(
            !contents.contains("changeme1"),
            "diagnostics log leaked the password"
        );
        assert!(!contents.contains("--password"));
        saw_dispatch |= contents.contains("dispatch command=run");
    }
    assert!(saw_dispatch, "expected the command name in the log");
}

#[test]
fn doctor_with_diagnostics_creates_log_file() {
    let (mut command, temp_home) = new_command_with_temp_home();
    command
        .args(["--diagnostics", "doctor"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Diagnostics enabled:"));

    let diagnostics_dir = temp_home.path().join(".config/migwiz/diagnostics");
    let logs: Vec<_> = fs::read_dir(&diagnostics_dir)
        .expect("diagnostics dir")
        .filter_map(Result::ok)
        .collect();
    assert_timestamp_log_names(&logs);
}
