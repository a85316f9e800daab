//! Command execution shared by every stage.

use crate::error::Result;
use crate::shell::{CommandResult, CommandRunner, CommandSpec};
use crate::ui::UserInterface;

/// The runner and UI a stage works through.
///
/// Every command goes through [`StageContext::run`], so its output always
/// lands in the run log.
pub struct StageContext<'a> {
    pub runner: &'a mut dyn CommandRunner,
    pub ui: &'a mut dyn UserInterface,
}

impl<'a> StageContext<'a> {
    pub fn new(runner: &'a mut dyn CommandRunner, ui: &'a mut dyn UserInterface) -> Self {
        Self { runner, ui }
    }

    /// Run `spec` and record its combined output.
    pub fn run(&mut self, spec: &CommandSpec) -> Result<CommandResult> {
        tracing::debug!(command = %spec, cwd = ?spec.cwd, "running command");
        let result = self.runner.run(spec)?;
        self.ui
            .command_output(&spec.to_string(), &result.combined_output());
        tracing::debug!(
            command = %spec,
            exit = %result.describe_exit(),
            duration_ms = result.duration.as_millis() as u64,
            "command finished"
        );
        Ok(result)
    }
}

/// One line explaining why a command failed.
///
/// Uses the last non-empty line of stderr, then stdout, then the exit code.
pub fn failure_detail(result: &CommandResult) -> String {
    let last_line = |text: &str| {
        text.lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
    };

    last_line(&result.stderr)
        .or_else(|| last_line(&result.stdout))
        .unwrap_or_else(|| result.describe_exit())
}
