//! Resolved run settings.
//!
//! [`Settings`] is the configuration with every path made absolute and the
//! pyenv root decided once, so later stages never consult the environment.

use crate::config::schema::{GatedPackage, ProvisionConfig};
use crate::error::{ProvisionError, Result};
use std::path::{Path, PathBuf};

/// Environment variable naming the pyenv root.
pub const PYENV_ROOT_VAR: &str = "PYENV_ROOT";

/// Everything a provisioning run needs, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub python_version: String,
    pub env_name: String,
    /// Directory the environment is bound to with `pyenv local`.
    pub project_root: PathBuf,
    pub pyenv_root: PathBuf,
    pub log_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub tooling: Vec<String>,
    pub core: Vec<String>,
    pub best_effort: Vec<String>,
    pub gated: Vec<GatedPackage>,
    pub critical: Vec<String>,
}

impl Settings {
    /// Resolve using the real process environment.
    pub fn resolve(config: ProvisionConfig, project_root: &Path) -> Result<Self> {
        Self::resolve_with_env(config, project_root, |key: &str| std::env::var(key))
    }

    /// Resolve with a custom env var lookup function.
    ///
    /// The pyenv root comes from the config, then `PYENV_ROOT`, then
    /// `~/.pyenv`. Relative paths are taken relative to `project_root`.
    pub fn resolve_with_env<F>(
        config: ProvisionConfig,
        project_root: &Path,
        env_fn: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
    {
        let home = dirs::home_dir();

        let pyenv_root = match &config.pyenv_root {
            Some(root) => absolutize(root, project_root, home.as_deref()),
            None => match env_fn(PYENV_ROOT_VAR) {
                Ok(value) if !value.trim().is_empty() => {
                    absolutize(Path::new(value.trim()), project_root, home.as_deref())
                }
                _ => home
                    .as_ref()
                    .map(|h| h.join(".pyenv"))
                    .ok_or_else(|| ProvisionError::ConfigValidationError {
                        message: "cannot determine pyenv root: set PYENV_ROOT or pyenv_root"
                            .to_string(),
                    })?,
            },
        };

        let settings = Self {
            log_dir: absolutize(&config.log_dir, project_root, home.as_deref()),
            manifest_path: absolutize(&config.manifest, project_root, home.as_deref()),
            python_version: config.python_version,
            env_name: config.env_name,
            project_root: project_root.to_path_buf(),
            pyenv_root,
            tooling: config.tooling,
            core: config.core,
            best_effort: config.best_effort,
            gated: config.gated,
            critical: config.critical,
        };

        tracing::debug!(
            pyenv_root = %settings.pyenv_root.display(),
            log_dir = %settings.log_dir.display(),
            "settings resolved"
        );
        Ok(settings)
    }
}

/// Expand a leading `~/` and anchor relative paths at `base`.
pub fn absolutize(path: &Path, base: &Path, home: Option<&Path>) -> PathBuf {
    let expanded = match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    };

    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::VarError;

    fn no_env(_: &str) -> std::result::Result<String, VarError> {
        Err(VarError::NotPresent)
    }

    #[test]
    fn config_root_wins_over_env() {
        let config = ProvisionConfig {
            pyenv_root: Some(PathBuf::from("/opt/pyenv")),
            ..Default::default()
        };
        let settings = Settings::resolve_with_env(config, Path::new("/work"), |_| {
            Ok("/from/env".to_string())
        })
        .unwrap();
        assert_eq!(settings.pyenv_root, PathBuf::from("/opt/pyenv"));
    }

    #[test]
    fn env_root_used_when_config_unset() {
        let settings = Settings::resolve_with_env(
            ProvisionConfig::default(),
            Path::new("/work"),
            |key| {
                if key == PYENV_ROOT_VAR {
                    Ok("/srv/pyenv".to_string())
                } else {
                    Err(VarError::NotPresent)
                }
            },
        )
        .unwrap();
        assert_eq!(settings.pyenv_root, PathBuf::from("/srv/pyenv"));
    }

    #[test]
    fn home_fallback_when_nothing_set() {
        if dirs::home_dir().is_none() {
            return;
        }
        let settings =
            Settings::resolve_with_env(ProvisionConfig::default(), Path::new("/work"), no_env)
                .unwrap();
        assert!(settings.pyenv_root.ends_with(".pyenv"));
    }

    #[test]
    fn relative_paths_anchor_at_project() {
        let settings =
            Settings::resolve_with_env(ProvisionConfig::default(), Path::new("/work"), |_| {
                Ok("/p".to_string())
            })
            .unwrap();
        assert_eq!(settings.log_dir, PathBuf::from("/work/logs"));
        assert_eq!(
            settings.manifest_path,
            PathBuf::from("/work/requirements-frozen.txt")
        );
        assert_eq!(settings.project_root, PathBuf::from("/work"));
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = Path::new("/home/dev");
        assert_eq!(
            absolutize(Path::new("~/.pyenv"), Path::new("/work"), Some(home)),
            PathBuf::from("/home/dev/.pyenv")
        );
        assert_eq!(
            absolutize(Path::new("/abs/logs"), Path::new("/work"), Some(home)),
            PathBuf::from("/abs/logs")
        );
    }
}
