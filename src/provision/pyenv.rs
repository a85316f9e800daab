//! pyenv and pyenv-virtualenv operations.
//!
//! [`Pyenv`] builds every version-manager command with `PYENV_ROOT` and
//! the pyenv directories on `PATH`. [`ensure_environment`] runs the whole
//! ENSURE_ENV stage and yields the [`ActiveEnvironment`] later stages use.

use super::context::{failure_detail, StageContext};
use super::workflow::Stage;
use crate::error::{ProvisionError, Result};
use crate::shell::{is_executable, prepend_path, resolve_tool_path, CommandSpec};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A located pyenv executable bound to one root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pyenv {
    program: PathBuf,
    root: PathBuf,
    search_path: Vec<PathBuf>,
}

impl Pyenv {
    /// Find pyenv under `root/bin`, then on `search_path`.
    ///
    /// # Errors
    ///
    /// Returns `ToolMissing` when neither location has an executable.
    pub fn locate(root: &Path, search_path: &[PathBuf]) -> Result<Self> {
        let bundled = root.join("bin").join("pyenv");
        let program = if bundled.is_file() && is_executable(&bundled) {
            Some(bundled)
        } else {
            resolve_tool_path("pyenv", search_path)
        };

        match program {
            Some(program) => {
                tracing::debug!(program = %program.display(), "located pyenv");
                Ok(Self {
                    program,
                    root: root.to_path_buf(),
                    search_path: search_path.to_vec(),
                })
            }
            None => Err(ProvisionError::ToolMissing {
                tool: "pyenv".to_string(),
                message: format!(
                    "not found in {} or on PATH",
                    root.join("bin").display()
                ),
            }),
        }
    }

    /// Path of the pyenv executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// A pyenv command with `args`.
    pub fn command<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dirs = [self.root.join("bin"), self.root.join("shims")];
        CommandSpec::new(&self.program)
            .args(args)
            .env("PYENV_ROOT", self.root.to_string_lossy())
            .env("PATH", prepend_path(&dirs, &self.search_path))
    }

    /// Check that pyenv and the virtualenv plugin both respond.
    pub fn check(&self, ctx: &mut StageContext<'_>) -> Result<()> {
        let version = run_or_missing(ctx, &self.command(["--version"]), "pyenv")?;
        if !version.success {
            return Err(ProvisionError::ToolMissing {
                tool: "pyenv".to_string(),
                message: failure_detail(&version),
            });
        }
        ctx.ui
            .message(&format!("Found {}", version.stdout.trim()));

        let plugin = run_or_missing(
            ctx,
            &self.command(["virtualenv", "--version"]),
            "pyenv-virtualenv",
        )?;
        if !plugin.success {
            return Err(ProvisionError::ToolMissing {
                tool: "pyenv-virtualenv".to_string(),
                message: failure_detail(&plugin),
            });
        }
        Ok(())
    }

    /// Output lines of `pyenv versions --bare`.
    pub fn installed_versions(&self, ctx: &mut StageContext<'_>) -> Result<Vec<String>> {
        let result = ctx.run(&self.command(["versions", "--bare"]))?;
        if !result.success {
            return Err(ProvisionError::StageFailed {
                stage: Stage::EnsureEnv.to_string(),
                message: format!("'pyenv versions' failed: {}", failure_detail(&result)),
            });
        }
        Ok(result
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Install an interpreter version unless `present` says it already is.
    pub fn install_version(
        &self,
        ctx: &mut StageContext<'_>,
        version: &str,
        present: bool,
    ) -> Result<()> {
        let mut spinner = ctx
            .ui
            .start_spinner(&format!("Installing Python {}", version));
        if present {
            spinner.finish_skipped(&format!("Python {} already installed", version));
            return Ok(());
        }
        let result = ctx.run(&self.command(["install", "-s", version]))?;
        if result.success {
            spinner.finish_success(&format!("Python {} installed", version));
            Ok(())
        } else {
            let detail = failure_detail(&result);
            spinner.finish_error(&format!("Python {} failed to install", version));
            Err(ProvisionError::InterpreterInstallFailed {
                version: version.to_string(),
                message: detail,
            })
        }
    }

    /// Delete a virtualenv without prompting.
    pub fn delete_env(&self, ctx: &mut StageContext<'_>, name: &str) -> Result<()> {
        let result = ctx.run(&self.command(["virtualenv-delete", "-f", name]))?;
        env_step(&result, "delete", name)
    }

    /// Create a virtualenv for `version`.
    pub fn create_env(&self, ctx: &mut StageContext<'_>, version: &str, name: &str) -> Result<()> {
        let result = ctx.run(&self.command(["virtualenv", version, name]))?;
        env_step(&result, "create", name)
    }

    /// Bind `project_root` to the environment with `pyenv local`.
    pub fn set_local(&self, ctx: &mut StageContext<'_>, name: &str, project_root: &Path) -> Result<()> {
        let spec = self.command(["local", name]).current_dir(project_root);
        let result = ctx.run(&spec)?;
        env_step(&result, "bind", name)
    }

    /// Resolve the environment prefix and its interpreter.
    pub fn activate(&self, ctx: &mut StageContext<'_>, name: &str) -> Result<ActiveEnvironment> {
        let result = ctx.run(&self.command(["prefix", name]))?;
        env_step(&result, "activate", name)?;

        let prefix = result
            .stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| activation_error(name, "'pyenv prefix' printed nothing"))?;

        let python = prefix.join("bin").join("python");
        if !python.is_file() {
            return Err(activation_error(
                name,
                &format!("interpreter {} does not exist", python.display()),
            ));
        }

        let mut env = BTreeMap::new();
        env.insert(
            "VIRTUAL_ENV".to_string(),
            prefix.to_string_lossy().to_string(),
        );
        env.insert("PYENV_VERSION".to_string(), name.to_string());
        env.insert("PYENV_ROOT".to_string(), self.root.to_string_lossy().to_string());
        env.insert(
            "PATH".to_string(),
            prepend_path(&[prefix.join("bin")], &self.search_path),
        );

        Ok(ActiveEnvironment {
            name: name.to_string(),
            prefix,
            python,
            env,
        })
    }
}

fn run_or_missing(
    ctx: &mut StageContext<'_>,
    spec: &CommandSpec,
    tool: &str,
) -> Result<crate::shell::CommandResult> {
    ctx.run(spec).map_err(|e| ProvisionError::ToolMissing {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

fn env_step(result: &crate::shell::CommandResult, action: &str, name: &str) -> Result<()> {
    if result.success {
        Ok(())
    } else {
        Err(ProvisionError::EnvironmentFailed {
            action: action.to_string(),
            env_name: name.to_string(),
            message: failure_detail(result),
        })
    }
}

fn activation_error(name: &str, message: &str) -> ProvisionError {
    ProvisionError::EnvironmentFailed {
        action: "activate".to_string(),
        env_name: name.to_string(),
        message: message.to_string(),
    }
}

/// Whether `version` appears as its own line in a versions listing.
pub fn version_installed(listing: &[String], version: &str) -> bool {
    listing.iter().any(|line| line == version)
}

/// Whether a virtualenv called `name` appears in a versions listing.
///
/// pyenv-virtualenv lists each environment twice: by bare name and as
/// `<version>/envs/<name>`.
pub fn env_listed(listing: &[String], name: &str) -> bool {
    let suffix = format!("/envs/{}", name);
    listing
        .iter()
        .any(|line| line == name || line.ends_with(&suffix))
}

/// The virtualenv later stages install into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEnvironment {
    pub name: String,
    /// Directory reported by `pyenv prefix`.
    pub prefix: PathBuf,
    /// `<prefix>/bin/python`.
    pub python: PathBuf,
    /// Variables every interpreter command runs with.
    pub env: BTreeMap<String, String>,
}

impl ActiveEnvironment {
    /// An interpreter command with `args` and the activation variables.
    pub fn python<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new(&self.python).args(args).envs(&self.env)
    }
}

/// Run the ENSURE_ENV stage.
///
/// Installs the interpreter if missing, deletes any environment with the
/// same name, creates it fresh, binds the project directory and activates
/// it. Every failure is fatal.
pub fn ensure_environment(
    ctx: &mut StageContext<'_>,
    pyenv: &Pyenv,
    python_version: &str,
    env_name: &str,
    project_root: &Path,
) -> Result<ActiveEnvironment> {
    pyenv.check(ctx)?;

    let listing = pyenv.installed_versions(ctx)?;
    pyenv.install_version(
        ctx,
        python_version,
        version_installed(&listing, python_version),
    )?;

    if env_listed(&listing, env_name) {
        ctx.ui.warning(&format!(
            "Environment '{}' already exists; deleting it",
            env_name
        ));
        pyenv.delete_env(ctx, env_name)?;
    }

    pyenv.create_env(ctx, python_version, env_name)?;
    ctx.ui.message(&format!(
        "Created environment '{}' (Python {})",
        env_name, python_version
    ));

    pyenv.set_local(ctx, env_name, project_root)?;
    ctx.ui.message(&format!(
        "Bound {} to '{}'",
        project_root.display(),
        env_name
    ));

    let active = pyenv.activate(ctx, env_name)?;
    ctx.ui
        .success(&format!("Activated '{}' at {}", env_name, active.prefix.display()));
    Ok(active)
}
