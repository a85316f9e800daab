//! Verbosity levels.

use std::io::Write;

/// How much a run prints to the console.
///
/// The run log always receives everything; this only governs the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Stage lines plus the captured output of every pip and pyenv call.
    Verbose,
    #[default]
    Normal,
    /// Spinners, warnings, errors and the final status.
    Quiet,
}

impl OutputMode {
    /// Whether captured installer output is echoed.
    pub fn shows_command_output(self) -> bool {
        self == Self::Verbose
    }

    /// Whether headers, stage counters and plain messages are printed.
    pub fn shows_messages(self) -> bool {
        self != Self::Quiet
    }
}

/// Echo a command and its captured output, indented under a `$` line.
///
/// Does nothing unless `mode` is verbose.
pub fn echo_command_output(mode: OutputMode, command: &str, output: &str) {
    if !mode.shows_command_output() || output.trim().is_empty() {
        return;
    }
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "    $ {}", command).ok();
    for line in output.lines() {
        writeln!(stdout, "    │ {}", line).ok();
    }
    stdout.flush().ok();
}
