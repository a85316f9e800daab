//! Scripted command runner for testing.
//!
//! `MockRunner` implements [`CommandRunner`] without spawning anything.
//! Responses are keyed by the command's argument line (see
//! [`CommandSpec::args_line`]); the program path is ignored so tests do
//! not depend on where pyenv or the environment interpreter live.
//!
//! # Example
//!
//! ```
//! use mlenv::shell::{CommandRunner, CommandSpec, MockResponse, MockRunner};
//!
//! let mut runner = MockRunner::new();
//! runner.respond("-m pip install onnxruntime-gpu", MockResponse::fail(1));
//!
//! let spec = CommandSpec::new("python").args(["-m", "pip", "install", "onnxruntime-gpu"]);
//! let result = runner.run(&spec).unwrap();
//! assert!(!result.success);
//! assert!(runner.was_run("-m pip install onnxruntime-gpu"));
//! ```

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::error::{ProvisionError, Result};

use super::command::{CommandResult, CommandRunner, CommandSpec};

/// A scripted outcome for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// Exit 0 with the given stdout.
    Success { stdout: String },
    /// Exit with a non-zero code and the given stderr.
    Failure { code: i32, stderr: String },
    /// The program could not be started.
    SpawnError { message: String },
}

impl MockResponse {
    /// Exit 0 with `stdout`.
    pub fn ok(stdout: &str) -> Self {
        Self::Success {
            stdout: stdout.to_string(),
        }
    }

    /// Exit with `code` and no output.
    pub fn fail(code: i32) -> Self {
        Self::Failure {
            code,
            stderr: String::new(),
        }
    }

    /// Exit with `code` and an error message on stderr.
    pub fn fail_with(code: i32, stderr: &str) -> Self {
        Self::Failure {
            code,
            stderr: stderr.to_string(),
        }
    }

    /// Fail to spawn.
    pub fn not_found() -> Self {
        Self::SpawnError {
            message: "No such file or directory (os error 2)".to_string(),
        }
    }

    fn into_result(self, spec: &CommandSpec) -> Result<CommandResult> {
        match self {
            Self::Success { stdout } => Ok(CommandResult::success(
                stdout,
                String::new(),
                Duration::ZERO,
            )),
            Self::Failure { code, stderr } => Ok(CommandResult::failure(
                Some(code),
                String::new(),
                stderr,
                Duration::ZERO,
            )),
            Self::SpawnError { message } => Err(ProvisionError::SpawnFailed {
                command: spec.to_string(),
                message,
            }),
        }
    }
}

/// Command runner that returns pre-configured responses.
///
/// Lookup order for each invocation: queued responses for the argument
/// line, then the fixed response for it, then the default response, and
/// finally an empty success.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: HashMap<String, MockResponse>,
    queues: HashMap<String, VecDeque<MockResponse>>,
    default_response: Option<MockResponse>,
    invocations: Vec<CommandSpec>,
}

impl MockRunner {
    /// Create a runner where every command succeeds silently.
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `args_line` with `response`.
    pub fn respond(&mut self, args_line: &str, response: MockResponse) {
        self.responses.insert(args_line.to_string(), response);
    }

    /// Answer `args_line` with each queued response in turn.
    ///
    /// Once the queue is exhausted, falls back to `respond` or defaults.
    pub fn queue(&mut self, args_line: &str, responses: Vec<MockResponse>) {
        self.queues
            .insert(args_line.to_string(), responses.into_iter().collect());
    }

    /// Response for any argument line without an explicit entry.
    pub fn set_default_response(&mut self, response: MockResponse) {
        self.default_response = Some(response);
    }

    /// Every command run so far, in order.
    pub fn invocations(&self) -> &[CommandSpec] {
        &self.invocations
    }

    /// Argument lines of every command run so far, in order.
    pub fn args_lines(&self) -> Vec<String> {
        self.invocations.iter().map(CommandSpec::args_line).collect()
    }

    /// Whether a command with exactly this argument line ran.
    pub fn was_run(&self, args_line: &str) -> bool {
        self.position(args_line).is_some()
    }

    /// Index of the first invocation with this argument line.
    pub fn position(&self, args_line: &str) -> Option<usize> {
        self.invocations
            .iter()
            .position(|spec| spec.args_line() == args_line)
    }

    /// Number of invocations whose argument line contains `fragment`.
    pub fn count_containing(&self, fragment: &str) -> usize {
        self.invocations
            .iter()
            .filter(|spec| spec.args_line().contains(fragment))
            .count()
    }
}

impl CommandRunner for MockRunner {
    fn run(&mut self, spec: &CommandSpec) -> Result<CommandResult> {
        self.invocations.push(spec.clone());
        let key = spec.args_line();

        let queued = self.queues.get_mut(&key).and_then(VecDeque::pop_front);
        let response = queued
            .or_else(|| self.responses.get(&key).cloned())
            .or_else(|| self.default_response.clone())
            .unwrap_or_else(|| MockResponse::ok(""));

        response.into_result(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(args: &[&str]) -> CommandSpec {
        CommandSpec::new("tool").args(args.iter().copied())
    }

    #[test]
    fn unknown_commands_succeed_silently() {
        let mut runner = MockRunner::new();
        let result = runner.run(&spec(&["anything"])).unwrap();
        assert!(result.success);
        assert!(result.stdout.is_empty());
    }

    #[test]
    fn fixed_response_is_returned_every_time() {
        let mut runner = MockRunner::new();
        runner.respond("versions --bare", MockResponse::ok("3.10.13\n"));

        for _ in 0..2 {
            let result = runner.run(&spec(&["versions", "--bare"])).unwrap();
            assert_eq!(result.stdout, "3.10.13\n");
        }
    }

    #[test]
    fn queued_responses_take_priority_then_fall_back() {
        let mut runner = MockRunner::new();
        runner.respond("versions --bare", MockResponse::ok("fallback"));
        runner.queue(
            "versions --bare",
            vec![MockResponse::ok("first"), MockResponse::fail(1)],
        );

        let first = runner.run(&spec(&["versions", "--bare"])).unwrap();
        let second = runner.run(&spec(&["versions", "--bare"])).unwrap();
        let third = runner.run(&spec(&["versions", "--bare"])).unwrap();

        assert_eq!(first.stdout, "first");
        assert!(!second.success);
        assert_eq!(third.stdout, "fallback");
    }

    #[test]
    fn default_response_applies_to_unscripted_commands() {
        let mut runner = MockRunner::new();
        runner.set_default_response(MockResponse::fail(2));
        let result = runner.run(&spec(&["whatever"])).unwrap();
        assert_eq!(result.exit_code, Some(2));
    }

    #[test]
    fn spawn_error_is_err() {
        let mut runner = MockRunner::new();
        runner.respond("--version", MockResponse::not_found());
        let err = runner.run(&spec(&["--version"])).unwrap_err();
        assert!(matches!(err, ProvisionError::SpawnFailed { .. }));
    }

    #[test]
    fn records_invocations_in_order() {
        let mut runner = MockRunner::new();
        runner.run(&spec(&["a"])).unwrap();
        runner.run(&spec(&["b", "c"])).unwrap();

        assert_eq!(runner.args_lines(), vec!["a", "b c"]);
        assert_eq!(runner.position("b c"), Some(1));
        assert!(!runner.was_run("d"));
        assert_eq!(runner.count_containing("c"), 1);
    }
}
