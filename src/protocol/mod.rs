//! Write-hook protocol
//!
//! Line-oriented commands from the storage application, answered with JSON.

pub mod commands;
pub mod handlers;
pub mod responses;

pub use commands::{HookCommand, parse_command};
pub use handlers::{CommandResult, handle_command};
pub use responses::{HookResponse, ResponseStatus};
