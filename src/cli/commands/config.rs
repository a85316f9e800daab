//! Config command implementation.
//!
//! The `mlenv config` command shows the resolved configuration, including
//! the `--python`/`--env-name`/`--log-dir` overrides and their
//! `MLENV_PYTHON`/`MLENV_ENV_NAME` variables, as `run` would use them.

use std::path::{Path, PathBuf};

use crate::cli::args::ConfigArgs;
use crate::config::{load_config, validate, Overrides, Settings};
use crate::error::{ProvisionError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: ConfigArgs,
    overrides: Overrides,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: ConfigArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
            overrides: Overrides::default(),
        }
    }

    /// Apply run overrides before showing the configuration.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let loaded = load_config(&self.project_root, self.config_path.as_deref())?;
        let mut config = loaded.config;
        config.apply_overrides(&self.overrides);
        validate(&config)?;

        let settings = Settings::resolve(config.clone(), &self.project_root)?;
        config.pyenv_root = Some(settings.pyenv_root);

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&config).map_err(|e| ProvisionError::Other(e.into()))?;
            ui.output(&json);
        } else {
            match &loaded.source {
                Some(path) => ui.output(&format!("# {}", path.display())),
                None => ui.output("# built-in defaults"),
            }
            let yaml = serde_yaml::to_string(&config).map_err(|e| ProvisionError::Other(e.into()))?;
            ui.output(yaml.trim_end());
        }

        Ok(CommandResult::success())
    }
}
