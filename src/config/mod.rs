//! Configuration loading, validation, and resolution.
//!
//! - Schema definitions and built-in defaults in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//! - Path and pyenv root resolution in [`settings`]
//!
//! # Example
//!
//! ```
//! use mlenv::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("mlenv.yml"), "env_name: vision").unwrap();
//!
//! let loaded = load_config(temp.path(), None).unwrap();
//! validate(&loaded.config).unwrap();
//! assert_eq!(loaded.config.env_name, "vision");
//! assert_eq!(loaded.config.python_version, "3.10.13");
//! ```
//!
//! # Precedence
//!
//! 1. Built-in defaults
//! 2. `--config <file>`, or `mlenv.yml` in the project directory
//! 3. Command-line flags and `MLENV_*` environment variables

pub mod loader;
pub mod schema;
pub mod settings;
pub mod validator;

pub use loader::{find_project_config, load_config, load_config_file, parse_config, LoadedConfig};
pub use schema::{
    Candidate, GatedPackage, Overrides, ProvisionConfig, CONFIG_FILE_NAME, DEFAULT_ENV_NAME,
    DEFAULT_PYTHON_VERSION,
};
pub use settings::{absolutize, Settings, PYENV_ROOT_VAR};
pub use validator::{
    is_valid_env_name, is_valid_import_name, validate, validate_config, ValidationError,
};
