//! Error types for mlenv operations.
//!
//! This module defines [`ProvisionError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every variant returned from [`crate::provision::Provisioner::run`] is
//!   fatal: the run stops and the process exits with code 1
//! - Recoverable problems (a best-effort batch, a fallback candidate, the
//!   manifest) are never errors; they are logged as warnings and recorded
//!   in the [`crate::provision::RunReport`]
//! - Use `anyhow::Error` (via `ProvisionError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for mlenv operations.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Explicitly requested configuration file does not exist.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A required external tool is not available on this host.
    #[error("Required tool '{tool}' not found: {message}")]
    ToolMissing { tool: String, message: String },

    /// The version manager could not install the requested interpreter.
    #[error("Failed to install Python {version}: {message}")]
    InterpreterInstallFailed { version: String, message: String },

    /// A virtual environment operation (delete, create, bind, activate) failed.
    #[error("Failed to {action} environment '{env_name}': {message}")]
    EnvironmentFailed {
        action: String,
        env_name: String,
        message: String,
    },

    /// A required install stage (tooling or core packages) failed.
    #[error("Required install stage '{stage}' failed: {message}")]
    StageFailed { stage: String, message: String },

    /// An external command could not be spawned at all.
    #[error("Could not run '{command}': {message}")]
    SpawnFailed { command: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for mlenv operations.
pub type Result<T> = std::result::Result<T, ProvisionError>;
