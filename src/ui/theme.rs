//! Status marks and console styling.

use console::Style;

/// The kind of status line being printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Error,
    Skipped,
}

impl Tone {
    /// Leading mark for a line of this tone.
    pub fn mark(self) -> &'static str {
        match self {
            Tone::Success => "✓",
            Tone::Warning => "⚠",
            Tone::Error => "✗",
            Tone::Skipped => "○",
        }
    }
}

/// Styles applied to status lines, headers and stage counters.
#[derive(Debug, Clone)]
pub struct Theme {
    colored: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::detect()
    }
}

impl Theme {
    /// A theme that emits text only. Used for CI logs and `--no-color`.
    pub fn plain() -> Self {
        Self { colored: false }
    }

    /// Colored on a terminal unless `NO_COLOR` is set.
    pub fn detect() -> Self {
        Self {
            colored: should_use_colors(),
        }
    }

    fn style(&self, tone: Tone) -> Style {
        if !self.colored {
            return Style::new();
        }
        match tone {
            Tone::Success => Style::new().green(),
            Tone::Warning => Style::new().yellow(),
            Tone::Error => Style::new().red().bold(),
            Tone::Skipped => Style::new().dim(),
        }
    }

    /// `msg` prefixed with the tone's mark and styled.
    pub fn line(&self, tone: Tone, msg: &str) -> String {
        self.style(tone)
            .apply_to(format!("{} {}", tone.mark(), msg))
            .to_string()
    }

    /// Stage banner such as `◆ Installing core packages`.
    pub fn banner(&self, title: &str) -> String {
        if self.colored {
            format!(
                "{} {}",
                Style::new().cyan().bold().apply_to("◆"),
                Style::new().bold().apply_to(title)
            )
        } else {
            format!("◆ {}", title)
        }
    }

    /// Stage counter such as `[3/7]`, dimmed when colored.
    pub fn counter(&self, current: usize, total: usize) -> String {
        let text = format!("[{}/{}]", current, total);
        if self.colored {
            Style::new().dim().apply_to(text).to_string()
        } else {
            text
        }
    }
}

/// Whether stdout should receive colors.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    console::Term::stdout().is_term()
}
