//! Conversation session: history, rendering and chat dispatch.

pub mod markdown;
mod session;
mod view;

pub use session::{SendOutcome, SessionController, CONTEXT_WINDOW};
pub use view::{ChatView, RenderedMessage};
