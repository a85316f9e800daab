//! Recording UI for tests.
//!
//! [`MockUI`] keeps every call as a [`UiEvent`] in order, so tests can
//! assert both what was shown and how each spinner ended.
//!
//! ```
//! use mlenv::ui::{MockUI, SpinnerStatus, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Logging to logs/provision.log");
//! let mut spinner = ui.start_spinner("Installing numpy==1.24.4");
//! spinner.finish_success("numpy==1.24.4 installed");
//!
//! assert!(ui.has_message("Logging to"));
//! assert_eq!(
//!     ui.spinner_results(),
//!     vec![(SpinnerStatus::Success, "numpy==1.24.4 installed".to_string())]
//! );
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use super::{OutputMode, SpinnerHandle, UserInterface};

/// One recorded UI call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Message(String),
    Output(String),
    Success(String),
    Warning(String),
    Error(String),
    Header(String),
    Progress(usize, usize),
    SpinnerStarted(String),
    CommandOutput { command: String, output: String },
}

/// How a recorded spinner ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerStatus {
    Success,
    Error,
    Skipped,
}

type Finishes = Rc<RefCell<Vec<(SpinnerStatus, String)>>>;

/// A [`UserInterface`] that records instead of printing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    events: Vec<UiEvent>,
    finishes: Finishes,
}

impl MockUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Every recorded call, oldest first.
    pub fn events(&self) -> &[UiEvent] {
        &self.events
    }

    fn texts(&self, pick: fn(&UiEvent) -> Option<&String>) -> Vec<String> {
        self.events.iter().filter_map(pick).cloned().collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.texts(|e| match e {
            UiEvent::Message(m) => Some(m),
            _ => None,
        })
    }

    /// Text passed to `output`.
    pub fn outputs(&self) -> Vec<String> {
        self.texts(|e| match e {
            UiEvent::Output(m) => Some(m),
            _ => None,
        })
    }

    pub fn warnings(&self) -> Vec<String> {
        self.texts(|e| match e {
            UiEvent::Warning(m) => Some(m),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<String> {
        self.texts(|e| match e {
            UiEvent::Error(m) => Some(m),
            _ => None,
        })
    }

    pub fn headers(&self) -> Vec<String> {
        self.texts(|e| match e {
            UiEvent::Header(m) => Some(m),
            _ => None,
        })
    }

    /// `(current, total)` pairs passed to `show_progress`.
    pub fn progress(&self) -> Vec<(usize, usize)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                UiEvent::Progress(current, total) => Some((*current, *total)),
                _ => None,
            })
            .collect()
    }

    /// `(command, output)` pairs passed to `command_output`.
    pub fn command_outputs(&self) -> Vec<(String, String)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                UiEvent::CommandOutput { command, output } => {
                    Some((command.clone(), output.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Spinner endings in the order they happened.
    pub fn spinner_results(&self) -> Vec<(SpinnerStatus, String)> {
        self.finishes.borrow().clone()
    }

    fn any(&self, needle: &str, pick: fn(&UiEvent) -> Option<&String>) -> bool {
        self.events
            .iter()
            .filter_map(pick)
            .any(|text| text.contains(needle))
    }

    pub fn has_message(&self, needle: &str) -> bool {
        self.any(needle, |e| match e {
            UiEvent::Message(m) => Some(m),
            _ => None,
        })
    }

    pub fn has_output(&self, needle: &str) -> bool {
        self.any(needle, |e| match e {
            UiEvent::Output(m) => Some(m),
            _ => None,
        })
    }

    pub fn has_success(&self, needle: &str) -> bool {
        self.any(needle, |e| match e {
            UiEvent::Success(m) => Some(m),
            _ => None,
        })
    }

    pub fn has_warning(&self, needle: &str) -> bool {
        self.any(needle, |e| match e {
            UiEvent::Warning(m) => Some(m),
            _ => None,
        })
    }

    pub fn has_error(&self, needle: &str) -> bool {
        self.any(needle, |e| match e {
            UiEvent::Error(m) => Some(m),
            _ => None,
        })
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.events.push(UiEvent::Message(msg.to_string()));
    }

    fn output(&mut self, text: &str) {
        self.events.push(UiEvent::Output(text.to_string()));
    }

    fn success(&mut self, msg: &str) {
        self.events.push(UiEvent::Success(msg.to_string()));
    }

    fn warning(&mut self, msg: &str) {
        self.events.push(UiEvent::Warning(msg.to_string()));
    }

    fn error(&mut self, msg: &str) {
        self.events.push(UiEvent::Error(msg.to_string()));
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.events
            .push(UiEvent::SpinnerStarted(message.to_string()));
        Box::new(MockSpinner {
            finishes: Rc::clone(&self.finishes),
        })
    }

    fn show_header(&mut self, title: &str) {
        self.events.push(UiEvent::Header(title.to_string()));
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        self.events.push(UiEvent::Progress(current, total));
    }

    fn command_output(&mut self, command: &str, output: &str) {
        self.events.push(UiEvent::CommandOutput {
            command: command.to_string(),
            output: output.to_string(),
        });
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner handed out by [`MockUI`]; reports its ending back to the UI.
#[derive(Debug)]
pub struct MockSpinner {
    finishes: Finishes,
}

impl MockSpinner {
    fn end(&mut self, status: SpinnerStatus, msg: &str) {
        self.finishes.borrow_mut().push((status, msg.to_string()));
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        self.end(SpinnerStatus::Success, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.end(SpinnerStatus::Error, msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.end(SpinnerStatus::Skipped, msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_keep_call_order() {
        let mut ui = MockUI::new();
        ui.show_progress(3, 7);
        ui.show_header("Core packages");
        ui.warning("opencv-python-headless install failed");

        assert_eq!(
            ui.events(),
            &[
                UiEvent::Progress(3, 7),
                UiEvent::Header("Core packages".to_string()),
                UiEvent::Warning("opencv-python-headless install failed".to_string()),
            ]
        );
        assert_eq!(ui.progress(), vec![(3, 7)]);
    }

    #[test]
    fn kinds_are_filtered_separately() {
        let mut ui = MockUI::new();
        ui.message("Logging to logs/run.log");
        ui.success("ml-env ready");
        ui.error("FATAL: pyenv not found");

        assert_eq!(ui.messages(), vec!["Logging to logs/run.log"]);
        assert!(ui.has_success("ready"));
        assert!(ui.has_error("pyenv"));
        assert!(!ui.has_warning("pyenv"));
        assert!(ui.warnings().is_empty());
    }

    #[test]
    fn spinner_endings_reach_the_ui() {
        let mut ui = MockUI::new();
        ui.start_spinner("Installing onnxruntime-gpu")
            .finish_error("onnxruntime-gpu failed");
        ui.start_spinner("Installing onnxruntime")
            .finish_success("onnxruntime installed");

        assert_eq!(
            ui.spinner_results(),
            vec![
                (SpinnerStatus::Error, "onnxruntime-gpu failed".to_string()),
                (SpinnerStatus::Success, "onnxruntime installed".to_string()),
            ]
        );
    }

    #[test]
    fn command_output_is_paired() {
        let mut ui = MockUI::with_mode(OutputMode::Verbose);
        ui.command_output("python -m pip freeze", "numpy==1.24.4");

        assert_eq!(ui.output_mode(), OutputMode::Verbose);
        assert_eq!(
            ui.command_outputs(),
            vec![("python -m pip freeze".to_string(), "numpy==1.24.4".to_string())]
        );
    }
}
