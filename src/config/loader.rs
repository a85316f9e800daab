//! Configuration file discovery and loading.

use crate::config::schema::{ProvisionConfig, CONFIG_FILE_NAME};
use crate::error::{ProvisionError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A loaded configuration and the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ProvisionConfig,
    /// `None` when the built-in defaults are in use.
    pub source: Option<PathBuf>,
}

/// Find `mlenv.yml` in the project directory.
pub fn find_project_config(project_root: &Path) -> Option<PathBuf> {
    let path = project_root.join(CONFIG_FILE_NAME);
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<ProvisionConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ProvisionError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ProvisionError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into a [`ProvisionConfig`].
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<ProvisionConfig> {
    if content.trim().is_empty() {
        return Ok(ProvisionConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| ProvisionError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load config with optional path override.
///
/// An explicit path must exist. Without one, `mlenv.yml` in the project
/// directory is used if present, otherwise the built-in defaults.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<LoadedConfig> {
    let source = match config_override {
        Some(path) => Some(path.to_path_buf()),
        None => find_project_config(project_root),
    };

    let config = match &source {
        Some(path) => load_config_file(path)?,
        None => ProvisionConfig::default(),
    };

    tracing::debug!(source = ?source, "configuration loaded");
    Ok(LoadedConfig { config, source })
}
