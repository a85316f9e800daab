//! Configuration schema.
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! the built-in machine-learning package plan.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default interpreter version.
pub const DEFAULT_PYTHON_VERSION: &str = "3.10.13";

/// Default virtualenv name.
pub const DEFAULT_ENV_NAME: &str = "ml-env";

/// Default config file name looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = "mlenv.yml";

/// Top-level provisioning configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvisionConfig {
    /// Interpreter version handed to `pyenv install`.
    pub python_version: String,

    /// Name of the virtualenv to (re)create.
    pub env_name: String,

    /// pyenv installation root. Falls back to `PYENV_ROOT`, then `~/.pyenv`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pyenv_root: Option<PathBuf>,

    /// Directory for per-run log files.
    pub log_dir: PathBuf,

    /// Where the frozen package list is written.
    pub manifest: PathBuf,

    /// Installer and build tools, upgraded first. Failure is fatal.
    pub tooling: Vec<String>,

    /// Pinned core packages. Failure is fatal.
    pub core: Vec<String>,

    /// Low-risk packages installed in one batch; failure only warns.
    pub best_effort: Vec<String>,

    /// Packages installed through ordered, import-verified fallbacks.
    pub gated: Vec<GatedPackage>,

    /// Import names whose importability decides the final status.
    pub critical: Vec<String>,
}

/// A logical package installed through a fallback candidate list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatedPackage {
    /// Display name (e.g. "onnxruntime").
    pub name: String,

    /// Candidates, tried first to last.
    pub candidates: Vec<Candidate>,
}

/// One install alternative and the module that proves it works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Candidate {
    /// Argument passed to `pip install`.
    pub spec: String,

    /// Module imported after a successful install.
    #[serde(rename = "import")]
    pub import_name: String,
}

impl Candidate {
    pub fn new(spec: &str, import_name: &str) -> Self {
        Self {
            spec: spec.to_string(),
            import_name: import_name.to_string(),
        }
    }
}

impl GatedPackage {
    pub fn new(name: &str, candidates: Vec<Candidate>) -> Self {
        Self {
            name: name.to_string(),
            candidates,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            python_version: DEFAULT_PYTHON_VERSION.to_string(),
            env_name: DEFAULT_ENV_NAME.to_string(),
            pyenv_root: None,
            log_dir: PathBuf::from("logs"),
            manifest: PathBuf::from("requirements-frozen.txt"),
            tooling: strings(&["pip", "setuptools", "wheel"]),
            core: strings(&["numpy==1.24.4"]),
            best_effort: strings(&[
                "pillow==10.1.0",
                "scipy==1.11.4",
                "tqdm==4.66.1",
                "pyyaml==6.0.1",
                "requests==2.31.0",
            ]),
            gated: vec![
                GatedPackage::new(
                    "opencv",
                    vec![
                        Candidate::new("opencv-python==4.8.1.78", "cv2"),
                        Candidate::new("opencv-python-headless==4.8.1.78", "cv2"),
                        Candidate::new("opencv-python-headless", "cv2"),
                    ],
                ),
                GatedPackage::new(
                    "onnxruntime",
                    vec![
                        Candidate::new("onnxruntime-gpu", "onnxruntime"),
                        Candidate::new("onnxruntime", "onnxruntime"),
                        Candidate::new("onnxruntime==1.16.3", "onnxruntime"),
                        Candidate::new("onnxruntime==1.15.1", "onnxruntime"),
                        Candidate::new("onnxruntime==1.14.1", "onnxruntime"),
                    ],
                ),
            ],
            critical: strings(&["numpy", "cv2", "onnxruntime"]),
        }
    }
}

/// Values supplied on the command line or via environment variables.
///
/// Applied on top of the file (or default) configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub python_version: Option<String>,
    pub env_name: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl ProvisionConfig {
    /// Replace fields with any values present in `overrides`.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(version) = &overrides.python_version {
            self.python_version = version.clone();
        }
        if let Some(name) = &overrides.env_name {
            self.env_name = name.clone();
        }
        if let Some(dir) = &overrides.log_dir {
            self.log_dir = dir.clone();
        }
    }
}
