//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::Overrides;

/// mlenv - Provision a pyenv virtualenv with verified ML package installs.
#[derive(Debug, Parser)]
#[command(name = "mlenv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides ./mlenv.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project directory (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Echo installer output to the console
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// `run` flags given before any subcommand
    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Provision the environment (default if no command specified)
    Run(RunArgs),

    /// Show resolved configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Python version to install and base the environment on
    #[arg(long, value_name = "VERSION", env = "MLENV_PYTHON")]
    pub python: Option<String>,

    /// Name of the virtualenv to recreate
    #[arg(long, value_name = "NAME", env = "MLENV_ENV_NAME")]
    pub env_name: Option<String>,

    /// Directory for run logs
    #[arg(long, value_name = "PATH")]
    pub log_dir: Option<PathBuf>,
}

impl RunArgs {
    /// These flags, with any unset one taken from `outer`.
    ///
    /// Used to combine `mlenv --env-name x run` with `mlenv run --python y`.
    pub fn or(self, outer: &RunArgs) -> RunArgs {
        RunArgs {
            python: self.python.or_else(|| outer.python.clone()),
            env_name: self.env_name.or_else(|| outer.env_name.clone()),
            log_dir: self.log_dir.or_else(|| outer.log_dir.clone()),
        }
    }

    /// Configuration overrides carried by these flags.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            python_version: self.python.clone(),
            env_name: self.env_name.clone(),
            log_dir: self.log_dir.clone(),
        }
    }
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
