//! Console output for provisioning runs.
//!
//! Stages talk to a [`UserInterface`]. [`create_ui`] picks [`TerminalUI`]
//! (colors, animated spinners) for an attended terminal and
//! [`NonInteractiveUI`] (plain lines) for CI or redirected output. Tests
//! use [`MockUI`], and `logging::TeeUI` wraps any of them to copy every
//! call into the run log.
//!
//! ```
//! use mlenv::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_progress(1, 7);
//! ui.show_header("Python environment");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod progress;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI, SpinnerStatus, UiEvent};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use progress::format_duration;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, Theme, Tone};

/// Where stages report what they are doing.
pub trait UserInterface {
    fn output_mode(&self) -> OutputMode;

    /// Plain informational line. Dropped in quiet mode.
    fn message(&mut self, msg: &str);

    /// A command's result, such as the rendered configuration. Printed in
    /// every mode.
    fn output(&mut self, text: &str);

    fn success(&mut self, msg: &str);

    /// Non-fatal problem; the run continues.
    fn warning(&mut self, msg: &str);

    /// Shown in every mode, including quiet.
    fn error(&mut self, msg: &str);

    /// Begin a long operation such as an interpreter or package install.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Stage banner.
    fn show_header(&mut self, title: &str);

    /// Stage counter, `current` of `total`.
    fn show_progress(&mut self, current: usize, total: usize);

    /// Captured output of a pyenv or pip call. Echoed only when verbose.
    fn command_output(&mut self, command: &str, output: &str);

    fn is_interactive(&self) -> bool;
}

/// A running spinner. Each handle is finished exactly once.
pub trait SpinnerHandle {
    fn set_message(&mut self, msg: &str);

    fn finish_success(&mut self, msg: &str);

    fn finish_error(&mut self, msg: &str);

    /// Work that was not needed, e.g. an interpreter already installed.
    fn finish_skipped(&mut self, msg: &str);
}
