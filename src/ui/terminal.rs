//! Console UI for an attended terminal.

use console::Term;
use std::io::Write;

use super::output::echo_command_output;
use super::theme::Tone;
use super::{NonInteractiveUI, OutputMode, ProgressSpinner, SpinnerHandle, Theme, UserInterface};

/// Styled output with animated spinners, written through [`console::Term`].
pub struct TerminalUI {
    term: Term,
    theme: Theme,
    mode: OutputMode,
}

impl TerminalUI {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            term: Term::stdout(),
            theme: Theme::detect(),
            mode,
        }
    }

    fn status_line(&mut self, line: String) {
        if self.mode.shows_messages() {
            writeln!(self.term, "{}", line).ok();
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.status_line(msg.to_string());
    }

    fn output(&mut self, text: &str) {
        writeln!(self.term, "{}", text).ok();
    }

    fn success(&mut self, msg: &str) {
        let line = self.theme.line(Tone::Success, msg);
        writeln!(self.term, "{}", line).ok();
    }

    fn warning(&mut self, msg: &str) {
        let line = self.theme.line(Tone::Warning, msg);
        Term::stderr().write_line(&line).ok();
    }

    fn error(&mut self, msg: &str) {
        let line = self.theme.line(Tone::Error, msg);
        Term::stderr().write_line(&line).ok();
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(ProgressSpinner::new(message))
    }

    fn show_header(&mut self, title: &str) {
        let banner = format!("\n{}", self.theme.banner(title));
        self.status_line(banner);
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        let counter = self.theme.counter(current, total);
        self.status_line(counter);
    }

    fn command_output(&mut self, command: &str, output: &str) {
        echo_command_output(self.mode, command, output);
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Pick the terminal UI when attended and stdout is a TTY, else plain lines.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        return Box::new(TerminalUI::new(mode));
    }
    Box::new(NonInteractiveUI::new(mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_requested_mode() {
        let ui = TerminalUI::new(OutputMode::Verbose);
        assert_eq!(ui.output_mode(), OutputMode::Verbose);
    }

    #[test]
    fn unattended_runs_get_plain_ui() {
        let ui = create_ui(false, OutputMode::Quiet);
        assert!(!ui.is_interactive());
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn quiet_terminal_still_spins() {
        let mut ui = TerminalUI::new(OutputMode::Quiet);
        let mut spinner = ui.start_spinner("Installing Python 3.10.13");
        spinner.finish_success("Python 3.10.13 installed");
    }
}
