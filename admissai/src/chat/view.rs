//! What a chat message looks like once rendered, and the sink it goes to.

use crate::models::{CompressionStats, Message, MessageRole};

use super::markdown;

/// Display-ready form of a [`Message`]. Pure data, computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub role: MessageRole,
    /// Local time as `HH:MM`.
    pub time: String,
    /// Original text, for plain-text output.
    pub text: String,
    /// Markdown rendered to HTML.
    pub markup: String,
    /// Compression badge shown under assistant replies that saved tokens.
    pub badge: Option<String>,
}

impl RenderedMessage {
    pub fn from_message(message: &Message) -> Self {
        let badge = if message.is_user() {
            None
        } else {
            message.compression.as_ref().and_then(CompressionStats::badge)
        };

        Self {
            role: message.role,
            time: message
                .timestamp
                .with_timezone(&chrono::Local)
                .format("%H:%M")
                .to_string(),
            text: message.content.clone(),
            markup: markdown::render(&message.content),
            badge,
        }
    }
}

/// Where the session controller sends everything it wants shown.
pub trait ChatView: Send + Sync {
    /// Append one message to the transcript.
    fn show_message(&self, message: &RenderedMessage);

    /// Show or hide the "assistant is typing" indicator.
    fn set_typing(&self, _typing: bool) {}

    /// Update the compression summary with the latest stats and running total.
    fn show_compression(&self, _stats: &CompressionStats, _total_saved: i64) {}
}
