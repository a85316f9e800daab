//! Integration tests for the mlenv binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn mlenv(project: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("mlenv"));
    cmd.current_dir(project.path())
        .env("PYENV_ROOT", project.path().join("no-pyenv"))
        .env_remove("MLENV_PYTHON")
        .env_remove("MLENV_ENV_NAME");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("mlenv"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pyenv"))
        .stdout(predicate::str::contains("completions"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("mlenv"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn config_prints_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    mlenv(&temp)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("# built-in defaults"))
        .stdout(predicate::str::contains("env_name: ml-env"))
        .stdout(predicate::str::contains("opencv-python-headless"));
    Ok(())
}

#[test]
fn config_json_reads_project_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join("mlenv.yml"), "env_name: vision\n")?;
    mlenv(&temp)
        .args(["config", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"env_name\": \"vision\""))
        .stdout(predicate::str::contains("\"onnxruntime-gpu\""));
    Ok(())
}

#[test]
fn invalid_config_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(
        temp.path().join("mlenv.yml"),
        "gated:\n  - name: opencv\n    candidates: []\n",
    )?;
    mlenv(&temp)
        .arg("config")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration"));
    Ok(())
}

#[test]
fn missing_explicit_config_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    mlenv(&temp)
        .args(["--config", "absent.yml", "run"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration not found"));
    Ok(())
}

#[test]
fn global_flags_precede_config_command() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    mlenv(&temp)
        .env("MLENV_ENV_NAME", "detector")
        .args(["-q", "--no-color", "config", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"env_name\": \"detector\""));
    Ok(())
}

#[test]
fn run_without_pyenv_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let empty_bin = temp.path().join("bin");
    fs::create_dir_all(&empty_bin)?;

    mlenv(&temp)
        .env("PATH", &empty_bin)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("FATAL"))
        .stderr(predicate::str::contains("See log file"));

    let logs: Vec<_> = fs::read_dir(temp.path().join("logs"))?.collect();
    assert_eq!(logs.len(), 1);
    let log = fs::read_to_string(logs[0].as_ref().unwrap().path())?;
    assert!(log.contains("[ERROR] FATAL: Required tool 'pyenv' not found"));
    Ok(())
}

#[test]
fn log_dir_flag_moves_logs() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let empty_bin = temp.path().join("bin");
    fs::create_dir_all(&empty_bin)?;

    mlenv(&temp)
        .env("PATH", &empty_bin)
        .args(["run", "--log-dir", "run-logs"])
        .assert()
        .code(1);

    assert!(temp.path().join("run-logs").is_dir());
    assert!(!temp.path().join("logs").exists());
    Ok(())
}

#[test]
fn completions_generate_for_bash() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("mlenv"));
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("mlenv"));
    Ok(())
}
