//! UI wrapper that mirrors everything into the run log.

use super::run_log::{LogLevel, RunLog};
use crate::ui::{OutputMode, SpinnerHandle, UserInterface};

/// A [`UserInterface`] that writes every message to a [`RunLog`] and
/// then forwards it to the wrapped console UI.
///
/// Command output always reaches the log; whether it reaches the console
/// is up to the inner UI's output mode.
pub struct TeeUI<'a> {
    inner: &'a mut dyn UserInterface,
    log: RunLog,
}

impl<'a> TeeUI<'a> {
    /// Wrap `inner`, logging into `log`.
    pub fn new(inner: &'a mut dyn UserInterface, log: RunLog) -> Self {
        Self { inner, log }
    }
}

impl UserInterface for TeeUI<'_> {
    fn output_mode(&self) -> OutputMode {
        self.inner.output_mode()
    }

    fn message(&mut self, msg: &str) {
        self.log.line(LogLevel::Info, msg);
        self.inner.message(msg);
    }

    fn output(&mut self, text: &str) {
        self.log.line(LogLevel::Info, text);
        self.inner.output(text);
    }

    fn success(&mut self, msg: &str) {
        self.log.line(LogLevel::Success, msg);
        self.inner.success(msg);
    }

    fn warning(&mut self, msg: &str) {
        self.log.line(LogLevel::Warning, msg);
        self.inner.warning(msg);
    }

    fn error(&mut self, msg: &str) {
        self.log.line(LogLevel::Error, msg);
        self.inner.error(msg);
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.log.line(LogLevel::Info, message);
        Box::new(TeeSpinner {
            inner: self.inner.start_spinner(message),
            log: self.log.clone(),
        })
    }

    fn show_header(&mut self, title: &str) {
        self.log.line(LogLevel::Info, &format!("=== {} ===", title));
        self.inner.show_header(title);
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        self.inner.show_progress(current, total);
    }

    fn command_output(&mut self, command: &str, output: &str) {
        self.log.command_output(command, output);
        self.inner.command_output(command, output);
    }

    fn is_interactive(&self) -> bool {
        self.inner.is_interactive()
    }
}

struct TeeSpinner {
    inner: Box<dyn SpinnerHandle>,
    log: RunLog,
}

impl SpinnerHandle for TeeSpinner {
    fn set_message(&mut self, msg: &str) {
        self.inner.set_message(msg);
    }

    fn finish_success(&mut self, msg: &str) {
        self.log.line(LogLevel::Success, msg);
        self.inner.finish_success(msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.log.line(LogLevel::Error, msg);
        self.inner.finish_error(msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.log.line(LogLevel::Info, msg);
        self.inner.finish_skipped(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{MockUI, SpinnerStatus};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn messages_reach_both_sinks() {
        let temp = TempDir::new().unwrap();
        let log = RunLog::open(&temp.path().join("run.log")).unwrap();
        let mut mock = MockUI::new();

        {
            let mut ui = TeeUI::new(&mut mock, log.clone());
            ui.message("Checking pyenv");
            ui.warning("scipy failed");
            ui.error("pyenv not found");
            ui.success("Environment ready");
        }

        assert!(mock.has_message("Checking pyenv"));
        assert!(mock.has_warning("scipy failed"));
        assert!(mock.has_error("pyenv not found"));

        let content = fs::read_to_string(log.path()).unwrap();
        assert!(content.contains("[INFO] Checking pyenv"));
        assert!(content.contains("[WARNING] scipy failed"));
        assert!(content.contains("[ERROR] pyenv not found"));
        assert!(content.contains("[SUCCESS] Environment ready"));
    }

    #[test]
    fn spinner_results_are_logged() {
        let temp = TempDir::new().unwrap();
        let log = RunLog::open(&temp.path().join("run.log")).unwrap();
        let mut mock = MockUI::new();

        {
            let mut ui = TeeUI::new(&mut mock, log.clone());
            let mut spinner = ui.start_spinner("Installing onnxruntime-gpu");
            spinner.finish_error("onnxruntime-gpu failed to install");
        }

        assert_eq!(
            mock.spinner_results(),
            vec![(
                SpinnerStatus::Error,
                "onnxruntime-gpu failed to install".to_string()
            )]
        );
        let content = fs::read_to_string(log.path()).unwrap();
        assert!(content.contains("[INFO] Installing onnxruntime-gpu"));
        assert!(content.contains("[ERROR] onnxruntime-gpu failed to install"));
    }

    #[test]
    fn command_output_always_logged() {
        let temp = TempDir::new().unwrap();
        let log = RunLog::open(&temp.path().join("run.log")).unwrap();
        let mut mock = MockUI::with_mode(OutputMode::Quiet);

        {
            let mut ui = TeeUI::new(&mut mock, log.clone());
            ui.command_output("pyenv versions --bare", "3.10.13");
        }

        let content = fs::read_to_string(log.path()).unwrap();
        assert!(content.contains("$ pyenv versions --bare"));
        assert!(content.contains("3.10.13"));
    }
}
