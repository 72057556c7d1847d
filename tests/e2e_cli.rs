//! CLI end-to-end tests
//!
//! Tests for the ripsort command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

const MB: u64 = 1024 * 1024;

/// Get a command for the ripsort binary
#[allow(deprecated)]
fn ripsort_cmd() -> Command {
    Command::cargo_bin("ripsort").unwrap()
}

fn rip(dir: &Path, name: &str, size: u64) {
    File::create(dir.join(name)).unwrap().set_len(size).unwrap();
}

fn staged_disc(dir: &Path) {
    rip(dir, "title_t00.mkv", 2000 * MB);
    rip(dir, "title_t01.mkv", 2050 * MB);
    rip(dir, "title_t02.mkv", 50 * MB);
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = ripsort_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = ripsort_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ripsort"))
        .stdout(predicate::str::contains("organize"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = ripsort_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ripsort"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = ripsort_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_check_tools_command() {
    let mut cmd = ripsort_cmd();
    // Missing tools are reported, not treated as a failure
    cmd.arg("check-tools").assert().success().stdout(
        predicate::str::contains("makemkvcon").and(predicate::str::contains("HandBrakeCLI")),
    );
}

#[test]
fn test_cli_organize_command() {
    let staging = tempdir().unwrap();
    let library = tempdir().unwrap();
    staged_disc(staging.path());

    let mut cmd = ripsort_cmd();
    cmd.arg("organize")
        .arg(staging.path())
        .arg("--library")
        .arg(library.path())
        .args(["--title", "Heat", "--year", "1995"])
        .assert()
        .success()
        .stdout(predicate::str::contains("title_t01.mkv"))
        .stdout(predicate::str::contains("Status: completed"));

    let movie_dir = library.path().join("Heat (1995)");
    assert!(movie_dir.join("Heat (1995).mkv").exists());
    assert!(movie_dir
        .join("Behind the Scenes")
        .join("title_t02.mkv")
        .exists());
    assert!(!staging.path().join("title_t00.mkv").exists());
}

#[test]
fn test_cli_organize_json() {
    let staging = tempdir().unwrap();
    let library = tempdir().unwrap();
    staged_disc(staging.path());

    let output = ripsort_cmd()
        .arg("organize")
        .arg(staging.path())
        .arg("-l")
        .arg(library.path())
        .args(["-t", "Heat", "-y", "1995", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "completed");
    assert_eq!(json["deleted"].as_array().unwrap().len(), 1);
    assert_eq!(json["extras"][0]["action"], "extra");
    assert_eq!(json["principal"]["size"], 2050 * MB);
}

#[test]
fn test_cli_organize_dry_run() {
    let staging = tempdir().unwrap();
    let library = tempdir().unwrap();
    staged_disc(staging.path());

    let mut cmd = ripsort_cmd();
    cmd.arg("organize")
        .arg(staging.path())
        .arg("-l")
        .arg(library.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("would be"));

    assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 3);
    assert_eq!(fs::read_dir(library.path()).unwrap().count(), 0);
}

#[test]
fn test_cli_organize_partial_failure_exit_code() {
    let staging = tempdir().unwrap();
    let library = tempdir().unwrap();
    staged_disc(staging.path());

    let movie_dir = library.path().join("Heat (1995)");
    fs::create_dir_all(&movie_dir).unwrap();
    fs::write(movie_dir.join("Behind the Scenes"), b"").unwrap();

    let mut cmd = ripsort_cmd();
    cmd.arg("organize")
        .arg(staging.path())
        .arg("-l")
        .arg(library.path())
        .args(["-t", "Heat", "-y", "1995"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("completed with errors"));

    assert!(movie_dir.join("Heat (1995).mkv").exists());
}

#[test]
fn test_cli_organize_empty_directory() {
    let staging = tempdir().unwrap();
    let library = tempdir().unwrap();

    let mut cmd = ripsort_cmd();
    cmd.arg("organize")
        .arg(staging.path())
        .arg("-l")
        .arg(library.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to organize"));
}

#[test]
fn test_cli_organize_missing_directory() {
    let staging = tempdir().unwrap();
    let library = tempdir().unwrap();

    let mut cmd = ripsort_cmd();
    cmd.arg("organize")
        .arg(staging.path().join("missing"))
        .arg("-l")
        .arg(library.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Organizing failed"));
}

#[test]
fn test_cli_organize_invalid_tolerance() {
    let staging = tempdir().unwrap();
    let library = tempdir().unwrap();
    staged_disc(staging.path());

    let mut cmd = ripsort_cmd();
    cmd.arg("organize")
        .arg(staging.path())
        .arg("-l")
        .arg(library.path())
        .args(["--tolerance", "2"])
        .assert()
        .failure();

    assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 3);
}

#[test]
fn test_cli_organize_requires_source() {
    let mut cmd = ripsort_cmd();
    cmd.arg("organize")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_cli_validate_config() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    fs::write(
        &config_path,
        r#"
[paths]
staging_dir = "/tmp/rips"
library_dir = "/tmp/movies"

[organize]
tolerance = 0.1
extras_dir_name = "Featurettes"

[transcode]
preset = "HQ 1080p30 Surround"
"#,
    )
    .unwrap();

    let mut cmd = ripsort_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"))
        .stdout(predicate::str::contains("Featurettes"));
}

#[test]
fn test_cli_validate_rejects_bad_tolerance() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[organize]\ntolerance = 1.0\n").unwrap();

    let mut cmd = ripsort_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("olerance"));
}

#[test]
fn test_cli_validate_missing_file() {
    let mut cmd = ripsort_cmd();
    cmd.arg("validate")
        .arg("/nonexistent/config.toml")
        .assert()
        .failure();
}

#[test]
fn test_cli_transcode_missing_input() {
    let temp_dir = tempdir().unwrap();

    let mut cmd = ripsort_cmd();
    cmd.arg("transcode")
        .arg(temp_dir.path().join("missing.mkv"))
        .assert()
        .failure();
}
