//! Per-run log file.
//!
//! Each run writes one file, `provision_YYYYMMDD_HHMMSS.log`, inside the
//! configured log directory. Lines look like
//! `[2026-10-19 14:03:11] [WARNING] opencv-python==4.8.1.78 failed to import`.

use chrono::{DateTime, Local};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;

/// Severity tag written in front of each log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
    Output,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Info => "INFO",
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Output => "OUTPUT",
        };
        f.write_str(tag)
    }
}

/// Append-only log file for one provisioning run.
///
/// Cloning is cheap; clones append to the same file.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
    file: Arc<File>,
}

impl RunLog {
    /// Create a fresh timestamped log file in `log_dir`, creating the directory.
    pub fn create(log_dir: &Path) -> Result<Self> {
        fs::create_dir_all(log_dir)?;
        let path = log_dir.join(log_file_name(Local::now()));
        Self::open(&path)
    }

    /// Open (or create) a specific log file for appending.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Arc::new(file),
        })
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Shared handle to the underlying file.
    pub fn file(&self) -> Arc<File> {
        Arc::clone(&self.file)
    }

    /// Append one message. Multi-line messages get one stamped line each.
    ///
    /// Write failures are ignored: losing a log line never stops a run.
    pub fn line(&self, level: LogLevel, msg: &str) {
        let now = Local::now();
        let mut buf = String::new();
        for text in msg.lines() {
            buf.push_str(&format_line(now, level, text));
            buf.push('\n');
        }
        if buf.is_empty() {
            buf = format_line(now, level, "");
            buf.push('\n');
        }
        (&*self.file).write_all(buf.as_bytes()).ok();
    }

    /// Append a command and its captured output.
    pub fn command_output(&self, command: &str, output: &str) {
        self.line(LogLevel::Output, &format!("$ {}", command));
        if !output.is_empty() {
            let indented: Vec<String> = output.lines().map(|l| format!("  {}", l)).collect();
            self.line(LogLevel::Output, &indented.join("\n"));
        }
    }
}

/// File name for a run started at `started`.
pub fn log_file_name(started: DateTime<Local>) -> String {
    format!("provision_{}.log", started.format("%Y%m%d_%H%M%S"))
}

/// Render a single log line without the trailing newline.
pub fn format_line(at: DateTime<Local>, level: LogLevel, msg: &str) -> String {
    format!("[{}] [{}] {}", at.format("%Y-%m-%d %H:%M:%S"), level, msg)
}
