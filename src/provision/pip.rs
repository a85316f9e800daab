//! Package installer and import probe commands.
//!
//! Everything runs through the environment interpreter (`python -m pip`),
//! never a bare `pip` from PATH.

use super::context::{failure_detail, StageContext};
use super::pyenv::ActiveEnvironment;
use crate::error::Result;
use crate::shell::CommandResult;

/// Arguments for `python -m pip install [--upgrade] <specs...>`.
pub fn install_args(specs: &[String], upgrade: bool) -> Vec<String> {
    let mut args = vec!["-m".to_string(), "pip".to_string(), "install".to_string()];
    if upgrade {
        args.push("--upgrade".to_string());
    }
    args.extend(specs.iter().cloned());
    args
}

/// Python source that imports `import_name` and prints its version.
pub fn probe_script(import_name: &str) -> String {
    format!(
        "import {0}; print(getattr({0}, '__version__', 'unknown'))",
        import_name
    )
}

/// Arguments for probing a single import.
pub fn probe_args(import_name: &str) -> Vec<String> {
    vec!["-c".to_string(), probe_script(import_name)]
}

/// Arguments for importing every name in one interpreter.
pub fn combined_probe_args(import_names: &[String]) -> Vec<String> {
    vec!["-c".to_string(), format!("import {}", import_names.join(", "))]
}

/// Run `pip install`.
///
/// Returns the raw result; whether a failure is fatal is up to the caller.
pub fn install(
    ctx: &mut StageContext<'_>,
    env: &ActiveEnvironment,
    specs: &[String],
    upgrade: bool,
) -> Result<CommandResult> {
    ctx.run(&env.python(install_args(specs, upgrade)))
}

/// Run `pip freeze`.
pub fn freeze(ctx: &mut StageContext<'_>, env: &ActiveEnvironment) -> Result<CommandResult> {
    ctx.run(&env.python(["-m", "pip", "freeze"]))
}

/// Outcome of importing one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// The import worked; `version` is the module's `__version__` or
    /// `"unknown"`.
    Importable { import_name: String, version: String },
    /// The import raised or the interpreter could not run.
    Failed { import_name: String, reason: String },
}

impl ProbeResult {
    pub fn import_name(&self) -> &str {
        match self {
            Self::Importable { import_name, .. } | Self::Failed { import_name, .. } => import_name,
        }
    }

    pub fn is_importable(&self) -> bool {
        matches!(self, Self::Importable { .. })
    }
}

/// Import `import_name` in the environment.
///
/// Never fails: spawn errors become [`ProbeResult::Failed`].
pub fn probe_import(
    ctx: &mut StageContext<'_>,
    env: &ActiveEnvironment,
    import_name: &str,
) -> ProbeResult {
    match ctx.run(&env.python(probe_args(import_name))) {
        Ok(result) if result.success => {
            let version = result
                .stdout
                .lines()
                .map(str::trim)
                .rfind(|line| !line.is_empty())
                .unwrap_or("unknown")
                .to_string();
            ProbeResult::Importable {
                import_name: import_name.to_string(),
                version,
            }
        }
        Ok(result) => ProbeResult::Failed {
            import_name: import_name.to_string(),
            reason: failure_detail(&result),
        },
        Err(e) => ProbeResult::Failed {
            import_name: import_name.to_string(),
            reason: e.to_string(),
        },
    }
}

/// Import every name in a single interpreter.
pub fn probe_all(
    ctx: &mut StageContext<'_>,
    env: &ActiveEnvironment,
    import_names: &[String],
) -> bool {
    if import_names.is_empty() {
        return true;
    }
    match ctx.run(&env.python(combined_probe_args(import_names))) {
        Ok(result) => result.success,
        Err(e) => {
            tracing::debug!(error = %e, "combined import probe could not run");
            false
        }
    }
}
