//! Routing from parsed arguments to a command.

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::UserInterface;

use super::completions::CompletionsCommand;
use super::config::ConfigCommand;
use super::run::RunCommand;

/// A subcommand ready to execute against a UI.
pub trait Command {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Process exit status of a finished command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self::from_code(0)
    }

    pub fn failure(exit_code: i32) -> Self {
        Self::from_code(exit_code)
    }

    fn from_code(exit_code: i32) -> Self {
        Self {
            success: exit_code == 0,
            exit_code,
        }
    }
}

/// Builds the command named on the command line for one project.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
}

impl CommandDispatcher {
    /// `config_path` is the `--config` file, if given; otherwise
    /// `mlenv.yml` is looked up in `project_root`.
    pub fn new(project_root: PathBuf, config_path: Option<PathBuf>) -> Self {
        Self {
            project_root,
            config_path,
        }
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// The command for `cli`. Bare `mlenv` provisions using the top-level
    /// run flags; `run` fills its unset flags from them.
    pub fn command_for(&self, cli: &Cli) -> Box<dyn Command> {
        let root = self.project_root.as_path();
        let config = self.config_path();
        match &cli.command {
            Some(Commands::Run(args)) => {
                Box::new(RunCommand::new(root, config, args.clone().or(&cli.run)))
            }
            None => Box::new(RunCommand::new(root, config, cli.run.clone())),
            Some(Commands::Config(args)) => Box::new(
                ConfigCommand::new(root, config, args.clone()).with_overrides(cli.run.overrides()),
            ),
            Some(Commands::Completions(args)) => Box::new(CompletionsCommand::new(args.clone())),
        }
    }

    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.command_for(cli).execute(ui)
    }
}
