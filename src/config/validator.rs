//! Configuration validation rules.
//!
//! - The interpreter version must be non-empty and not look like a flag
//! - The environment name must be a plain pyenv version name
//! - Package specs must be non-empty and must not start with `-`
//! - Every gated package needs a name and at least one candidate
//! - Import names must be dotted Python identifiers

use crate::config::schema::ProvisionConfig;
use crate::error::{ProvisionError, Result};
use regex::Regex;
use std::sync::LazyLock;

static ENV_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("valid regex"));

static IMPORT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").expect("valid regex")
});

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
        }
    }
}

/// Check whether `name` is usable as an environment name.
pub fn is_valid_env_name(name: &str) -> bool {
    ENV_NAME.is_match(name)
}

/// Check whether `name` can follow `import` in Python source.
pub fn is_valid_import_name(name: &str) -> bool {
    IMPORT_NAME.is_match(name)
}

/// Validate a configuration and return all errors.
///
/// Collects every problem rather than stopping at the first one.
pub fn validate_config(config: &ProvisionConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let version = config.python_version.trim();
    if version.is_empty() {
        errors.push(ValidationError::new(
            "python-version",
            "python_version must not be empty".to_string(),
        ));
    } else if version.starts_with('-') || version.contains(char::is_whitespace) {
        errors.push(ValidationError::new(
            "python-version",
            format!("python_version '{}' is not a pyenv version", config.python_version),
        ));
    }

    if !is_valid_env_name(&config.env_name) {
        errors.push(ValidationError::new(
            "env-name",
            format!(
                "env_name '{}' must start with a letter or digit and contain only letters, digits, '.', '_' or '-'",
                config.env_name
            ),
        ));
    }

    errors.extend(validate_specs("tooling", &config.tooling));
    errors.extend(validate_specs("core", &config.core));
    errors.extend(validate_specs("best_effort", &config.best_effort));
    errors.extend(validate_gated(config));

    for name in &config.critical {
        if !is_valid_import_name(name) {
            errors.push(ValidationError::new(
                "import-name",
                format!("critical entry '{}' is not a valid Python module name", name),
            ));
        }
    }

    errors
}

/// Rule broken by `spec`, if any. A leading `-` would reach pip as an option.
fn spec_problem(spec: &str) -> Option<(&'static str, &'static str)> {
    let spec = spec.trim();
    if spec.is_empty() {
        Some(("empty-spec", "is an empty package spec"))
    } else if spec.starts_with('-') {
        Some(("option-spec", "looks like a pip option, not a package spec"))
    } else {
        None
    }
}

fn validate_specs(section: &str, specs: &[String]) -> Vec<ValidationError> {
    specs
        .iter()
        .enumerate()
        .filter_map(|(i, spec)| {
            spec_problem(spec).map(|(rule, problem)| {
                ValidationError::new(rule, format!("{}[{}] {}", section, i, problem))
            })
        })
        .collect()
}

fn validate_gated(config: &ProvisionConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (i, package) in config.gated.iter().enumerate() {
        let label = if package.name.trim().is_empty() {
            errors.push(ValidationError::new(
                "gated-name",
                format!("gated[{}] has no name", i),
            ));
            format!("gated[{}]", i)
        } else {
            package.name.clone()
        };

        if package.candidates.is_empty() {
            errors.push(ValidationError::new(
                "gated-candidates",
                format!("gated package '{}' has no candidates", label),
            ));
        }

        for candidate in &package.candidates {
            if let Some((rule, problem)) = spec_problem(&candidate.spec) {
                errors.push(ValidationError::new(
                    rule,
                    format!(
                        "gated package '{}': candidate '{}' {}",
                        label, candidate.spec, problem
                    ),
                ));
            }
            if !is_valid_import_name(&candidate.import_name) {
                errors.push(ValidationError::new(
                    "import-name",
                    format!(
                        "gated package '{}': '{}' is not a valid Python module name",
                        label, candidate.import_name
                    ),
                ));
            }
        }
    }

    errors
}

/// Validate and return the first batch of errors as a single error.
pub fn validate(config: &ProvisionConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }

    let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
    Err(ProvisionError::ConfigValidationError {
        message: messages.join("; "),
    })
}
