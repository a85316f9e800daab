//! mlenv - Provision a pyenv virtualenv with verified ML package installs.
//!
//! mlenv installs a Python interpreter through pyenv, recreates a named
//! virtualenv, and installs a package plan in priority order: installer
//! tooling and core packages (required), a best-effort batch, and gated
//! packages tried through ordered fallback candidates that only count once
//! they import. The run ends by freezing the environment and checking that
//! the critical modules import together.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, validation, and resolution
//! - [`error`] - Error types and result aliases
//! - [`logging`] - Per-run log files and tracing setup
//! - [`provision`] - The provisioning stages
//! - [`shell`] - External command execution
//! - [`ui`] - Spinners and terminal output
//!
//! # Example
//!
//! ```
//! use mlenv::config::{ProvisionConfig, validate};
//!
//! let config = ProvisionConfig::default();
//! validate(&config).unwrap();
//! assert_eq!(config.gated[1].candidates[0].spec, "onnxruntime-gpu");
//! ```
//!
//! For complete runs against a scripted runner, see the integration tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod provision;
pub mod shell;
pub mod ui;

pub use error::{ProvisionError, Result};
