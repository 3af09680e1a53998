//! Notification sink injected into the state machines.
//!
//! The tracker and CLI never probe for a display; they are handed a
//! [`Notifier`]. Contexts without one get [`NoopNotifier`].

use tracing::info;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Something that can show a short, transient message to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        info!(?level, message, "notification dropped (no sink)");
    }
}

/// Prints notifications on stderr so they never mix with command output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        let marker = match level {
            NoticeLevel::Info => "i",
            NoticeLevel::Success => "✓",
            NoticeLevel::Error => "!",
        };
        eprintln!("[{marker}] {message}");
    }
}
