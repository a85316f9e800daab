//! Install strategies: required batches, best-effort batches and
//! import-verified fallback chains.

use super::context::{failure_detail, StageContext};
use super::pip::{self, ProbeResult};
use super::pyenv::ActiveEnvironment;
use super::workflow::Stage;
use crate::config::{Candidate, GatedPackage};
use crate::error::{ProvisionError, Result};

/// One `pip install` attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallAttempt {
    pub spec: String,
    /// The install command exited 0.
    pub installed: bool,
    /// Import probe result; `None` when the install failed and no probe ran.
    pub verified: Option<bool>,
}

/// Result of walking a fallback candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackOutcome {
    /// `candidate` installed and imported.
    Installed { candidate: Candidate, version: String },
    /// No candidate both installed and imported.
    Exhausted,
}

/// Everything that happened for one gated package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatedResult {
    pub package: String,
    pub attempts: Vec<InstallAttempt>,
    pub outcome: FallbackOutcome,
}

impl GatedResult {
    pub fn is_installed(&self) -> bool {
        matches!(self.outcome, FallbackOutcome::Installed { .. })
    }
}

/// Result of the best-effort batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Nothing to install.
    Skipped,
    Installed,
    Failed { reason: String },
}

/// Install a batch that must succeed.
///
/// # Errors
///
/// Returns `StageFailed` naming `stage` when pip exits non-zero or cannot
/// be started.
pub fn install_required(
    ctx: &mut StageContext<'_>,
    env: &ActiveEnvironment,
    stage: Stage,
    specs: &[String],
    upgrade: bool,
) -> Result<()> {
    if specs.is_empty() {
        ctx.ui.message(&format!("No {} packages configured", stage));
        return Ok(());
    }

    let label = specs.join(" ");
    let mut spinner = ctx.ui.start_spinner(&format!("Installing {}", label));
    let result = match pip::install(ctx, env, specs, upgrade) {
        Ok(result) => result,
        Err(e) => {
            spinner.finish_error(&format!("{} failed to start", label));
            return Err(ProvisionError::StageFailed {
                stage: stage.to_string(),
                message: e.to_string(),
            });
        }
    };

    if result.success {
        spinner.finish_success(&format!("Installed {}", label));
        Ok(())
    } else {
        spinner.finish_error(&format!("{} failed to install", label));
        Err(ProvisionError::StageFailed {
            stage: stage.to_string(),
            message: failure_detail(&result),
        })
    }
}

/// Install every spec in one call; failure only warns.
pub fn install_best_effort(
    ctx: &mut StageContext<'_>,
    env: &ActiveEnvironment,
    specs: &[String],
) -> BatchOutcome {
    if specs.is_empty() {
        ctx.ui.message("No best-effort packages configured");
        return BatchOutcome::Skipped;
    }

    let mut spinner = ctx
        .ui
        .start_spinner(&format!("Installing {} best-effort packages", specs.len()));
    let reason = match pip::install(ctx, env, specs, false) {
        Ok(result) if result.success => {
            spinner.finish_success(&format!("Installed {}", specs.join(" ")));
            return BatchOutcome::Installed;
        }
        Ok(result) => failure_detail(&result),
        Err(e) => e.to_string(),
    };

    spinner.finish_error("Best-effort install failed");
    ctx.ui.warning(&format!(
        "Best-effort packages not installed ({}); continuing",
        reason
    ));
    BatchOutcome::Failed { reason }
}

/// Try each candidate in order until one installs and imports.
///
/// A candidate counts only once its import probe succeeds. Exhausting the
/// list is a warning; the caller keeps going.
pub fn install_with_verified_fallback(
    ctx: &mut StageContext<'_>,
    env: &ActiveEnvironment,
    package: &GatedPackage,
) -> GatedResult {
    let mut attempts = Vec::new();
    let total = package.candidates.len();

    for (index, candidate) in package.candidates.iter().enumerate() {
        let mut spinner = ctx.ui.start_spinner(&format!(
            "Installing {} [{}/{}]",
            candidate.spec,
            index + 1,
            total
        ));

        let install = pip::install(ctx, env, std::slice::from_ref(&candidate.spec), false);
        let failure = match install {
            Ok(result) if result.success => None,
            Ok(result) => Some(failure_detail(&result)),
            Err(e) => Some(e.to_string()),
        };

        if let Some(reason) = failure {
            spinner.finish_error(&format!("{} failed to install", candidate.spec));
            ctx.ui
                .warning(&format!("{} install failed: {}", candidate.spec, reason));
            attempts.push(InstallAttempt {
                spec: candidate.spec.clone(),
                installed: false,
                verified: None,
            });
            continue;
        }

        match pip::probe_import(ctx, env, &candidate.import_name) {
            ProbeResult::Importable { version, .. } => {
                spinner.finish_success(&format!(
                    "{} installed ({} {})",
                    candidate.spec, candidate.import_name, version
                ));
                attempts.push(InstallAttempt {
                    spec: candidate.spec.clone(),
                    installed: true,
                    verified: Some(true),
                });
                return GatedResult {
                    package: package.name.clone(),
                    attempts,
                    outcome: FallbackOutcome::Installed {
                        candidate: candidate.clone(),
                        version,
                    },
                };
            }
            ProbeResult::Failed { reason, .. } => {
                spinner.finish_error(&format!(
                    "{} installed but 'import {}' failed",
                    candidate.spec, candidate.import_name
                ));
                ctx.ui.warning(&format!(
                    "{} installed but not importable: {}",
                    candidate.spec, reason
                ));
                attempts.push(InstallAttempt {
                    spec: candidate.spec.clone(),
                    installed: true,
                    verified: Some(false),
                });
            }
        }
    }

    ctx.ui.warning(&format!(
        "No working candidate for {} after {} attempts; continuing without it",
        package.name, total
    ));
    GatedResult {
        package: package.name.clone(),
        attempts,
        outcome: FallbackOutcome::Exhausted,
    }
}
