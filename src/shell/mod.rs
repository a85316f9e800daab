//! External command execution and PATH handling.

pub mod command;
pub mod mock;
pub mod platform;

pub use command::{execute, CommandResult, CommandRunner, CommandSpec, SystemRunner};
pub use mock::{MockResponse, MockRunner};
pub use platform::{is_ci, is_executable, parse_system_path, prepend_path, resolve_tool_path};
