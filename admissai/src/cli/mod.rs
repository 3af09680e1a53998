//! Command-line surface: argument parsing, command dispatch and the
//! terminal views.

mod args;
mod commands;
mod view;

pub use args::{ChecklistAction, Cli, Commands};
pub use commands::execute;
pub use view::{TerminalChatView, TerminalChecklistView};
