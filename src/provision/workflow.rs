//! The provisioning run, stage by stage.

use super::context::StageContext;
use super::install::{
    install_best_effort, install_required, install_with_verified_fallback, BatchOutcome,
    GatedResult,
};
use super::pyenv::{ensure_environment, ActiveEnvironment, Pyenv};
use super::verify::{finalize_and_verify, OverallStatus, VerificationReport};
use crate::config::Settings;
use crate::error::Result;
use crate::shell::{parse_system_path, CommandRunner};
use crate::ui::UserInterface;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Stages of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    EnsureEnv,
    InstallTooling,
    InstallCore,
    InstallBestEffort,
    InstallGated,
    FinalizeAndVerify,
}

impl Stage {
    /// Whether a failure in this stage stops the run.
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::EnsureEnv | Self::InstallTooling | Self::InstallCore)
    }

    /// Short identifier used in errors and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::EnsureEnv => "ensure_env",
            Self::InstallTooling => "tooling",
            Self::InstallCore => "core",
            Self::InstallBestEffort => "best_effort",
            Self::InstallGated => "gated",
            Self::FinalizeAndVerify => "verify",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub environment: ActiveEnvironment,
    pub python_version: String,
    pub best_effort: BatchOutcome,
    pub gated: Vec<GatedResult>,
    pub verification: VerificationReport,
    pub duration: Duration,
}

impl RunReport {
    pub fn status(&self) -> OverallStatus {
        self.verification.status
    }

    /// Gated packages for which no candidate worked.
    pub fn exhausted(&self) -> Vec<&str> {
        self.gated
            .iter()
            .filter(|g| !g.is_installed())
            .map(|g| g.package.as_str())
            .collect()
    }
}

/// Drives one provisioning run.
///
/// Owns nothing external: commands go through the borrowed runner and
/// messages through the borrowed UI.
pub struct Provisioner<'a> {
    settings: &'a Settings,
    runner: &'a mut dyn CommandRunner,
    ui: &'a mut dyn UserInterface,
    search_path: Vec<PathBuf>,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        settings: &'a Settings,
        runner: &'a mut dyn CommandRunner,
        ui: &'a mut dyn UserInterface,
    ) -> Self {
        Self {
            settings,
            runner,
            ui,
            search_path: parse_system_path(),
        }
    }

    /// Use `dirs` instead of the process PATH for locating pyenv and for
    /// the PATH handed to child processes.
    pub fn with_search_path(mut self, dirs: Vec<PathBuf>) -> Self {
        self.search_path = dirs;
        self
    }

    /// Run every stage.
    ///
    /// # Errors
    ///
    /// Any error is fatal: a missing tool, the interpreter install, an
    /// environment operation, or the tooling/core installs. Every later
    /// problem is a warning recorded in the [`RunReport`].
    pub fn run(&mut self) -> Result<RunReport> {
        let start = Instant::now();
        let settings = self.settings;
        let total = 5 + settings.gated.len();
        let mut ctx = StageContext::new(&mut *self.runner, &mut *self.ui);

        let pyenv = Pyenv::locate(&settings.pyenv_root, &self.search_path)?;

        let title = format!(
            "Environment '{}' (Python {})",
            settings.env_name, settings.python_version
        );
        enter(&mut ctx, Stage::EnsureEnv, 1, total, &title);
        let environment = ensure_environment(
            &mut ctx,
            &pyenv,
            &settings.python_version,
            &settings.env_name,
            &settings.project_root,
        )?;

        enter(&mut ctx, Stage::InstallTooling, 2, total, "Installer tooling");
        install_required(
            &mut ctx,
            &environment,
            Stage::InstallTooling,
            &settings.tooling,
            true,
        )?;

        enter(&mut ctx, Stage::InstallCore, 3, total, "Core packages");
        install_required(
            &mut ctx,
            &environment,
            Stage::InstallCore,
            &settings.core,
            false,
        )?;

        enter(&mut ctx, Stage::InstallBestEffort, 4, total, "Best-effort packages");
        let best_effort = install_best_effort(&mut ctx, &environment, &settings.best_effort);

        let mut gated = Vec::with_capacity(settings.gated.len());
        for (i, package) in settings.gated.iter().enumerate() {
            let title = format!("{} (verified fallback)", package.name);
            enter(&mut ctx, Stage::InstallGated, 5 + i, total, &title);
            gated.push(install_with_verified_fallback(&mut ctx, &environment, package));
        }

        enter(&mut ctx, Stage::FinalizeAndVerify, total, total, "Verification");
        let verification = finalize_and_verify(
            &mut ctx,
            &environment,
            &settings.manifest_path,
            &settings.critical,
        );

        tracing::debug!(status = %verification.status, "run finished");
        Ok(RunReport {
            environment,
            python_version: settings.python_version.clone(),
            best_effort,
            gated,
            verification,
            duration: start.elapsed(),
        })
    }
}

fn enter(ctx: &mut StageContext<'_>, stage: Stage, step: usize, total: usize, title: &str) {
    tracing::debug!(%stage, fatal = stage.is_fatal(), step, total, "entering stage");
    ctx.ui.show_progress(step, total);
    ctx.ui.show_header(title);
}
