//! Run logging and diagnostics.
//!
//! Two sinks carry every provisioning message:
//!
//! - the console, through a [`UserInterface`](crate::ui::UserInterface)
//! - the per-run file, through [`RunLog`]
//!
//! [`TeeUI`] joins them. Separately, `tracing` diagnostics go to stderr
//! (filtered by `RUST_LOG` or `--debug`) and, once a run log is attached,
//! into the same file.

pub mod run_log;
pub mod tee;

pub use run_log::{format_line, log_file_name, LogLevel, RunLog};
pub use tee::TeeUI;

use std::fs::File;
use std::io::Write;
use std::sync::{Arc, OnceLock};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static ATTACHED_LOG: OnceLock<Arc<File>> = OnceLock::new();

/// Route `tracing` diagnostics into `log` for the rest of the process.
///
/// Only the first attached log is used.
pub fn attach(log: &RunLog) {
    if ATTACHED_LOG.set(log.file()).is_err() {
        tracing::debug!("run log already attached; keeping the first one");
    }
}

/// Writer for the file layer: the attached run log, or nowhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttachedLogWriter;

impl<'a> MakeWriter<'a> for AttachedLogWriter {
    type Writer = Box<dyn Write + 'a>;

    fn make_writer(&'a self) -> Self::Writer {
        match ATTACHED_LOG.get() {
            Some(file) => Box::new(file.as_ref()),
            None => Box::new(std::io::sink()),
        }
    }
}

/// Initialize the tracing subscriber for logging.
///
/// Console level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// The file layer always records mlenv debug events.
pub fn init_tracing(debug: bool) {
    let console_filter = if debug {
        EnvFilter::new("mlenv=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mlenv=info"))
    };

    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let file = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(AttachedLogWriter)
        .with_filter(EnvFilter::new("mlenv=debug"));

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();
}
