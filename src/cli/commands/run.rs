//! Run command implementation.
//!
//! The `mlenv run` command (and bare `mlenv`) provisions the environment.

use std::path::{Path, PathBuf};

use crate::cli::args::RunArgs;
use crate::config::{load_config, validate, Settings};
use crate::error::Result;
use crate::logging::{self, RunLog, TeeUI};
use crate::provision::{
    BatchOutcome, FallbackOutcome, ManifestOutcome, OverallStatus, Provisioner, RunReport,
};
use crate::shell::{CommandRunner, SystemRunner};
use crate::ui::{format_duration, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: RunArgs,
    search_path: Option<Vec<PathBuf>>,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: RunArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
            search_path: None,
        }
    }

    /// Look for tools in `dirs` instead of the process PATH.
    pub fn with_search_path(mut self, dirs: Vec<PathBuf>) -> Self {
        self.search_path = Some(dirs);
        self
    }

    /// Resolve settings from the config file and flags.
    pub fn settings(&self) -> Result<Settings> {
        let loaded = load_config(&self.project_root, self.config_path.as_deref())?;
        let mut config = loaded.config;
        config.apply_overrides(&self.args.overrides());
        validate(&config)?;
        Settings::resolve(config, &self.project_root)
    }

    /// Provision through `runner`, logging to a fresh run log.
    ///
    /// Configuration problems are returned as errors. Once the run log is
    /// open, fatal provisioning errors are reported and become exit code 1.
    pub fn execute_with(
        &self,
        ui: &mut dyn UserInterface,
        runner: &mut dyn CommandRunner,
    ) -> Result<CommandResult> {
        let settings = self.settings()?;
        let log = RunLog::create(&settings.log_dir)?;
        logging::attach(&log);

        let mut ui = TeeUI::new(ui, log.clone());
        ui.message(&format!("Logging to {}", log.path().display()));

        let mut provisioner = Provisioner::new(&settings, runner, &mut ui);
        if let Some(dirs) = &self.search_path {
            provisioner = provisioner.with_search_path(dirs.clone());
        }
        let outcome = provisioner.run();

        match outcome {
            Ok(report) => {
                show_summary(&mut ui, &report);
                ui.message(&format!("Log file: {}", log.path().display()));
                Ok(CommandResult::success())
            }
            Err(e) => {
                ui.error(&format!("FATAL: {}", e));
                ui.error(&format!("See log file: {}", log.path().display()));
                Ok(CommandResult::failure(1))
            }
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut runner = SystemRunner::new();
        self.execute_with(ui, &mut runner)
    }
}

fn show_summary(ui: &mut dyn UserInterface, report: &RunReport) {
    ui.show_header("Summary");
    ui.message(&format!(
        "Environment '{}' (Python {}) at {}",
        report.environment.name,
        report.python_version,
        report.environment.prefix.display()
    ));

    match &report.best_effort {
        BatchOutcome::Installed => ui.message("Best-effort packages: installed"),
        BatchOutcome::Skipped => ui.message("Best-effort packages: none configured"),
        BatchOutcome::Failed { reason } => {
            ui.warning(&format!("Best-effort packages: failed ({})", reason))
        }
    }

    for gated in &report.gated {
        match &gated.outcome {
            FallbackOutcome::Installed { candidate, version } => ui.message(&format!(
                "{}: {} ({} {})",
                gated.package, candidate.spec, candidate.import_name, version
            )),
            FallbackOutcome::Exhausted => ui.warning(&format!(
                "{}: no working candidate ({} tried)",
                gated.package,
                gated.attempts.len()
            )),
        }
    }

    match &report.verification.manifest {
        ManifestOutcome::Written { path, entries } => {
            ui.message(&format!("Manifest: {} ({} packages)", path.display(), entries))
        }
        ManifestOutcome::Failed { .. } => ui.warning("Manifest: not written"),
    }

    let elapsed = format_duration(report.duration);
    match report.status() {
        OverallStatus::Success => ui.success(&format!(
            "SUCCESS: all critical packages import ({})",
            elapsed
        )),
        OverallStatus::Warning => ui.warning(&format!(
            "WARNING: some critical packages do not import ({})",
            elapsed
        )),
    }
}
