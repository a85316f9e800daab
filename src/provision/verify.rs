//! Final stage: freeze the installed set and verify critical imports.

use super::context::{failure_detail, StageContext};
use super::pip::{self, ProbeResult};
use super::pyenv::ActiveEnvironment;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Overall result of a run that reached verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallStatus {
    /// Every critical module imports.
    Success,
    /// At least one critical module does not import.
    Warning,
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Warning => write!(f, "WARNING"),
        }
    }
}

/// What the frozen manifest ended up as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestOutcome {
    Written { path: PathBuf, entries: usize },
    Failed { reason: String },
}

/// Result of [`finalize_and_verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub manifest: ManifestOutcome,
    /// One probe per critical module, in configured order.
    pub probes: Vec<ProbeResult>,
    pub status: OverallStatus,
}

/// Non-empty, non-comment lines of `pip freeze` output.
pub fn freeze_entries(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Overwrite `path` with one entry per line.
pub fn write_manifest(path: &Path, entries: &[String]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut content = entries.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    fs::write(path, content)
}

fn freeze_to(
    ctx: &mut StageContext<'_>,
    env: &ActiveEnvironment,
    manifest_path: &Path,
) -> ManifestOutcome {
    let result = match pip::freeze(ctx, env) {
        Ok(result) if result.success => result,
        Ok(result) => {
            return ManifestOutcome::Failed {
                reason: failure_detail(&result),
            }
        }
        Err(e) => {
            return ManifestOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    let entries = freeze_entries(&result.stdout);
    match write_manifest(manifest_path, &entries) {
        Ok(()) => ManifestOutcome::Written {
            path: manifest_path.to_path_buf(),
            entries: entries.len(),
        },
        Err(e) => ManifestOutcome::Failed {
            reason: format!("cannot write {}: {}", manifest_path.display(), e),
        },
    }
}

/// Freeze the environment into `manifest_path` and probe `critical`.
///
/// Never fails. A missing manifest or a failed probe is logged as a
/// warning; only the combined import decides the overall status.
pub fn finalize_and_verify(
    ctx: &mut StageContext<'_>,
    env: &ActiveEnvironment,
    manifest_path: &Path,
    critical: &[String],
) -> VerificationReport {
    let manifest = freeze_to(ctx, env, manifest_path);
    match &manifest {
        ManifestOutcome::Written { path, entries } => ctx.ui.success(&format!(
            "Wrote {} packages to {}",
            entries,
            path.display()
        )),
        ManifestOutcome::Failed { reason } => {
            ctx.ui.warning(&format!("Could not freeze packages: {}", reason))
        }
    }

    let mut probes = Vec::with_capacity(critical.len());
    for name in critical {
        let probe = pip::probe_import(ctx, env, name);
        match &probe {
            ProbeResult::Importable { version, .. } => {
                ctx.ui.success(&format!("{} {}", name, version))
            }
            ProbeResult::Failed { reason, .. } => {
                ctx.ui.warning(&format!("{} not importable: {}", name, reason))
            }
        }
        probes.push(probe);
    }

    let status = if pip::probe_all(ctx, env, critical) {
        OverallStatus::Success
    } else {
        OverallStatus::Warning
    };

    VerificationReport {
        manifest,
        probes,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{MockResponse, MockRunner};
    use crate::ui::MockUI;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn env() -> ActiveEnvironment {
        ActiveEnvironment {
            name: "ml-env".to_string(),
            prefix: PathBuf::from("/envs/ml-env"),
            python: PathBuf::from("/envs/ml-env/bin/python"),
            env: BTreeMap::new(),
        }
    }

    fn critical() -> Vec<String> {
        vec!["numpy".to_string(), "cv2".to_string()]
    }

    #[test]
    fn freeze_entries_skip_blanks_and_comments() {
        let output = "numpy==1.24.4\n\n# editable\nopencv-python==4.8.1.78\n";
        assert_eq!(
            freeze_entries(output),
            vec!["numpy==1.24.4", "opencv-python==4.8.1.78"]
        );
    }

    #[test]
    fn manifest_is_overwritten() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out/requirements-frozen.txt");

        write_manifest(&path, &["old==1.0".to_string(), "stale==2.0".to_string()]).unwrap();
        write_manifest(&path, &["numpy==1.24.4".to_string()]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "numpy==1.24.4\n");
    }

    #[test]
    fn success_when_all_critical_import() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("requirements-frozen.txt");
        let mut runner = MockRunner::new();
        runner.respond(
            "-m pip freeze",
            MockResponse::ok("numpy==1.24.4\nopencv-python==4.8.1.78\n"),
        );
        runner.respond(
            &pip::probe_args("numpy").join(" "),
            MockResponse::ok("1.24.4\n"),
        );
        let mut ui = MockUI::new();
        let mut ctx = StageContext::new(&mut runner, &mut ui);

        let report = finalize_and_verify(&mut ctx, &env(), &manifest, &critical());

        assert_eq!(report.status, OverallStatus::Success);
        assert_eq!(
            report.manifest,
            ManifestOutcome::Written {
                path: manifest.clone(),
                entries: 2
            }
        );
        assert!(report.probes.iter().all(ProbeResult::is_importable));
        assert!(ui.has_success("numpy 1.24.4"));
        assert!(runner.was_run("-c import numpy, cv2"));
    }

    #[test]
    fn warning_when_combined_import_fails() {
        let temp = TempDir::new().unwrap();
        let mut runner = MockRunner::new();
        runner.respond(
            &pip::probe_args("cv2").join(" "),
            MockResponse::fail_with(1, "ModuleNotFoundError: No module named 'cv2'"),
        );
        runner.respond("-c import numpy, cv2", MockResponse::fail(1));
        let mut ui = MockUI::new();
        let mut ctx = StageContext::new(&mut runner, &mut ui);

        let report = finalize_and_verify(
            &mut ctx,
            &env(),
            &temp.path().join("requirements-frozen.txt"),
            &critical(),
        );

        assert_eq!(report.status, OverallStatus::Warning);
        assert!(!report.probes[1].is_importable());
        assert!(ui.has_warning("cv2 not importable"));
    }

    #[test]
    fn freeze_failure_is_only_a_warning() {
        let temp = TempDir::new().unwrap();
        let mut runner = MockRunner::new();
        runner.respond("-m pip freeze", MockResponse::fail_with(2, "pip is broken"));
        let mut ui = MockUI::new();
        let mut ctx = StageContext::new(&mut runner, &mut ui);

        let report = finalize_and_verify(
            &mut ctx,
            &env(),
            &temp.path().join("requirements-frozen.txt"),
            &critical(),
        );

        assert_eq!(
            report.manifest,
            ManifestOutcome::Failed {
                reason: "pip is broken".to_string()
            }
        );
        assert_eq!(report.status, OverallStatus::Success);
        assert!(ui.has_warning("Could not freeze packages"));
    }

    #[test]
    fn status_display() {
        assert_eq!(OverallStatus::Success.to_string(), "SUCCESS");
        assert_eq!(OverallStatus::Warning.to_string(), "WARNING");
    }
}
