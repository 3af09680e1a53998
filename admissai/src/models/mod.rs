//! Data models shared by the chat session and the checklist tracker.

mod checklist;
mod compression;
mod message;
mod program;

pub use checklist::{ChecklistData, ChecklistItem};
pub use compression::{CompressionResult, CompressionStats};
pub use message::{HistoryEntry, Message, MessageRole};
pub use program::{Program, ProgramDetail, ProgramList};
