//! Plain-line UI for CI and redirected output.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use super::output::echo_command_output;
use super::theme::Tone;
use super::{OutputMode, SpinnerHandle, Theme, UserInterface};

type Sink = Rc<RefCell<Box<dyn Write>>>;

/// Writes uncolored lines; warnings and errors go to the error stream.
///
/// A spinner becomes one line when started and one when finished.
pub struct NonInteractiveUI {
    mode: OutputMode,
    theme: Theme,
    out: Sink,
    err: Sink,
}

impl NonInteractiveUI {
    /// Write to stdout and stderr.
    pub fn new(mode: OutputMode) -> Self {
        Self::with_writers(mode, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Write regular lines to `out` and warnings/errors to `err`.
    pub fn with_writers(mode: OutputMode, out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Self {
            mode,
            theme: Theme::plain(),
            out: Rc::new(RefCell::new(out)),
            err: Rc::new(RefCell::new(err)),
        }
    }

    fn say(&self, text: &str) {
        if self.mode.shows_messages() {
            writeln!(self.out.borrow_mut(), "{}", text).ok();
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.say(msg);
    }

    fn output(&mut self, text: &str) {
        writeln!(self.out.borrow_mut(), "{}", text).ok();
    }

    fn success(&mut self, msg: &str) {
        let line = self.theme.line(Tone::Success, msg);
        writeln!(self.out.borrow_mut(), "{}", line).ok();
    }

    fn warning(&mut self, msg: &str) {
        let line = self.theme.line(Tone::Warning, msg);
        writeln!(self.err.borrow_mut(), "{}", line).ok();
    }

    fn error(&mut self, msg: &str) {
        let line = self.theme.line(Tone::Error, msg);
        writeln!(self.err.borrow_mut(), "{}", line).ok();
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        writeln!(self.out.borrow_mut(), "  {}", message).ok();
        Box::new(LineSpinner {
            theme: self.theme.clone(),
            out: Rc::clone(&self.out),
        })
    }

    fn show_header(&mut self, title: &str) {
        self.say(&format!("\n{}", self.theme.banner(title)));
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        self.say(&self.theme.counter(current, total));
    }

    fn command_output(&mut self, command: &str, output: &str) {
        echo_command_output(self.mode, command, output);
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

struct LineSpinner {
    theme: Theme,
    out: Sink,
}

impl LineSpinner {
    fn finish(&self, tone: Tone, msg: &str) {
        writeln!(self.out.borrow_mut(), "  {}", self.theme.line(tone, msg)).ok();
    }
}

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        self.finish(Tone::Success, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish(Tone::Error, msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.finish(Tone::Skipped, msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct Buffer(Rc<RefCell<Vec<u8>>>);

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(mode: OutputMode) -> (NonInteractiveUI, Buffer, Buffer) {
        let out = Buffer::default();
        let err = Buffer::default();
        let ui = NonInteractiveUI::with_writers(mode, Box::new(out.clone()), Box::new(err.clone()));
        (ui, out, err)
    }

    #[test]
    fn never_interactive() {
        let ui = NonInteractiveUI::new(OutputMode::Verbose);
        assert!(!ui.is_interactive());
        assert_eq!(ui.output_mode(), OutputMode::Verbose);
    }

    #[test]
    fn normal_mode_prints_stage_lines() {
        let (mut ui, out, err) = capture(OutputMode::Normal);
        ui.show_progress(2, 7);
        ui.show_header("Installer tooling");
        ui.message("Logging to logs/provision.log");
        ui.warning("scipy failed");

        let out = out.text();
        assert!(out.contains("[2/7]"));
        assert!(out.contains("◆ Installer tooling"));
        assert!(out.contains("Logging to logs/provision.log"));
        assert_eq!(err.text(), "⚠ scipy failed\n");
    }

    #[test]
    fn quiet_mode_keeps_only_outcomes() {
        let (mut ui, out, err) = capture(OutputMode::Quiet);
        ui.show_progress(2, 7);
        ui.show_header("Installer tooling");
        ui.message("Logging to logs/provision.log");
        ui.start_spinner("Installing onnxruntime-gpu")
            .finish_error("onnxruntime-gpu failed");
        ui.warning("No working candidate for onnxruntime");
        ui.error("FATAL: pyenv not found");
        ui.success("SUCCESS: all critical packages import");
        ui.output("env_name: ml-env");

        let out = out.text();
        assert!(!out.contains("[2/7]"));
        assert!(!out.contains("Installer tooling"));
        assert!(!out.contains("Logging to"));
        assert!(out.contains("  Installing onnxruntime-gpu"));
        assert!(out.contains("  ✗ onnxruntime-gpu failed"));
        assert!(out.contains("✓ SUCCESS: all critical packages import"));
        assert!(out.contains("env_name: ml-env"));
        let err = err.text();
        assert!(err.contains("⚠ No working candidate for onnxruntime"));
        assert!(err.contains("✗ FATAL: pyenv not found"));
    }
}
