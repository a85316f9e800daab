//! Environment provisioning.
//!
//! A run moves through fixed stages:
//!
//! ```text
//! ENSURE_ENV -> INSTALL_TOOLING -> INSTALL_CORE -> INSTALL_BEST_EFFORT
//!   -> INSTALL_GATED (once per gated package) -> FINALIZE_AND_VERIFY
//! ```
//!
//! The first three stop the run on failure. The rest only warn, so a run
//! that gets past the core install always ends with a [`RunReport`].
//!
//! - [`pyenv`]: interpreter and virtualenv management
//! - [`pip`]: installer and import probe commands
//! - [`install`]: required, best-effort and verified-fallback installs
//! - [`verify`]: manifest freeze and critical import checks
//! - [`workflow`]: the [`Provisioner`] that runs the stages

pub mod context;
pub mod install;
pub mod pip;
pub mod pyenv;
pub mod verify;
pub mod workflow;

pub use context::{failure_detail, StageContext};
pub use install::{
    install_best_effort, install_required, install_with_verified_fallback, BatchOutcome,
    FallbackOutcome, GatedResult, InstallAttempt,
};
pub use pip::ProbeResult;
pub use pyenv::{ensure_environment, env_listed, version_installed, ActiveEnvironment, Pyenv};
pub use verify::{finalize_and_verify, ManifestOutcome, OverallStatus, VerificationReport};
pub use workflow::{Provisioner, RunReport, Stage};
