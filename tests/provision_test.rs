//! End-to-end provisioning runs against a scripted command runner.

use mlenv::config::{ProvisionConfig, Settings};
use mlenv::provision::pip::probe_args;
use mlenv::provision::{FallbackOutcome, OverallStatus, Provisioner};
use mlenv::shell::{MockResponse, MockRunner};
use mlenv::ui::MockUI;
use mlenv::ProvisionError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_executable(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "#!/bin/sh\n").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}

/// A project dir with a fake pyenv root and environment interpreter.
fn host(with_pyenv: bool) -> (TempDir, Settings) {
    let temp = TempDir::new().unwrap();
    if with_pyenv {
        write_executable(&temp.path().join("pyenv/bin/pyenv"));
        write_executable(&temp.path().join("pyenv/versions/ml-env/bin/python"));
    }
    let config = ProvisionConfig {
        pyenv_root: Some(temp.path().join("pyenv")),
        ..Default::default()
    };
    let settings = Settings::resolve_with_env(config, temp.path(), |_| {
        Err(std::env::VarError::NotPresent)
    })
    .unwrap();
    (temp, settings)
}

fn scripted(temp: &TempDir) -> MockRunner {
    let mut runner = MockRunner::new();
    runner.respond(
        "prefix ml-env",
        MockResponse::ok(&temp.path().join("pyenv/versions/ml-env").to_string_lossy()),
    );
    runner
}

#[test]
fn fresh_host_falls_back_to_cpu_runtime() {
    let (temp, settings) = host(true);
    let mut runner = scripted(&temp);
    runner.respond("versions --bare", MockResponse::ok("system\n"));
    runner.respond(
        "-m pip install onnxruntime-gpu",
        MockResponse::fail_with(1, "ERROR: No matching distribution found for onnxruntime-gpu"),
    );
    runner.respond(
        &probe_args("onnxruntime").join(" "),
        MockResponse::ok("1.16.3\n"),
    );
    let mut ui = MockUI::new();

    let report = Provisioner::new(&settings, &mut runner, &mut ui)
        .with_search_path(vec![])
        .run()
        .unwrap();

    assert!(runner.was_run("install -s 3.10.13"));
    assert!(runner.was_run("virtualenv 3.10.13 ml-env"));
    assert!(runner.was_run("-m pip install numpy==1.24.4"));
    match &report.gated[1].outcome {
        FallbackOutcome::Installed { candidate, version } => {
            assert_eq!(candidate.spec, "onnxruntime");
            assert_eq!(version, "1.16.3");
        }
        FallbackOutcome::Exhausted => panic!("Expected the CPU runtime to be chosen"),
    }
    assert_eq!(report.status(), OverallStatus::Success);
    assert!(ui.has_warning("onnxruntime-gpu install failed"));
}

#[test]
fn host_without_pyenv_fails_before_installing() {
    let (_temp, settings) = host(false);
    let mut runner = MockRunner::new();
    let mut ui = MockUI::new();

    let err = Provisioner::new(&settings, &mut runner, &mut ui)
        .with_search_path(vec![])
        .run()
        .unwrap_err();

    assert!(matches!(err, ProvisionError::ToolMissing { ref tool, .. } if tool == "pyenv"));
    assert_eq!(runner.count_containing("pip"), 0);
}

#[test]
fn unavailable_runtime_ends_with_warning() {
    let (temp, settings) = host(true);
    let mut runner = scripted(&temp);
    for spec in [
        "onnxruntime-gpu",
        "onnxruntime",
        "onnxruntime==1.16.3",
        "onnxruntime==1.15.1",
        "onnxruntime==1.14.1",
    ] {
        runner.respond(&format!("-m pip install {}", spec), MockResponse::fail(1));
    }
    runner.respond(
        &probe_args("onnxruntime").join(" "),
        MockResponse::fail_with(1, "ModuleNotFoundError: No module named 'onnxruntime'"),
    );
    runner.respond("-c import numpy, cv2, onnxruntime", MockResponse::fail(1));
    runner.respond("-m pip freeze", MockResponse::ok("numpy==1.24.4\n"));
    let mut ui = MockUI::new();

    let report = Provisioner::new(&settings, &mut runner, &mut ui)
        .with_search_path(vec![])
        .run()
        .unwrap();

    assert_eq!(report.gated[1].outcome, FallbackOutcome::Exhausted);
    assert_eq!(report.status(), OverallStatus::Warning);
    assert_eq!(
        fs::read_to_string(temp.path().join("requirements-frozen.txt")).unwrap(),
        "numpy==1.24.4\n"
    );
}

#[test]
fn existing_environment_is_recreated() {
    let (temp, settings) = host(true);
    let mut runner = scripted(&temp);
    runner.respond(
        "versions --bare",
        MockResponse::ok("3.10.13\n3.10.13/envs/ml-env\nml-env\n"),
    );
    let mut ui = MockUI::new();

    Provisioner::new(&settings, &mut runner, &mut ui)
        .with_search_path(vec![])
        .run()
        .unwrap();

    assert!(!runner.was_run("install -s 3.10.13"));
    let delete = runner.position("virtualenv-delete -f ml-env").unwrap();
    let create = runner.position("virtualenv 3.10.13 ml-env").unwrap();
    assert!(delete < create);
}
