//! Terminal bindings for the chat and checklist views.
//!
//! Formatting is done by plain functions returning strings; the view types
//! only decide where those strings are printed.

use std::fmt::Write as _;

use crate::chat::{ChatView, RenderedMessage};
use crate::checklist::{ChecklistSnapshot, ChecklistView, ProgressIndicators, ProgressUpdate};
use crate::models::{CompressionStats, MessageRole};

/// Prints chat messages to stdout.
#[derive(Debug, Clone, Copy)]
pub struct TerminalChatView {
    /// Print the HTML markup instead of the raw text.
    pub html: bool,
}

impl ChatView for TerminalChatView {
    fn show_message(&self, message: &RenderedMessage) {
        // The user already sees what they typed.
        if message.role == MessageRole::User {
            return;
        }
        println!("{}", format_message(message, self.html));
    }

    fn set_typing(&self, typing: bool) {
        if typing {
            eprintln!("…");
        }
    }

    fn show_compression(&self, stats: &CompressionStats, total_saved: i64) {
        eprintln!("{}. Session total: {total_saved}", format_compression(stats));
    }
}

pub fn format_message(message: &RenderedMessage, html: bool) -> String {
    let speaker = match message.role {
        MessageRole::User => "You",
        MessageRole::Assistant => "Assistant",
    };
    let body = if html { &message.markup } else { &message.text };

    let mut out = format!("[{}] {speaker}:\n{body}", message.time);
    if let Some(badge) = &message.badge {
        let _ = write!(out, "\n  ⚡ {badge}");
    }
    out
}

pub fn format_compression(stats: &CompressionStats) -> String {
    format!(
        "Context compression ({}): {} → {} tokens, {} saved ({}% reduction)",
        stats.provider,
        stats.original_tokens,
        stats.compressed_tokens,
        stats.tokens_saved,
        stats.reduction_percent(),
    )
}

/// Prints checklist state to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalChecklistView;

impl ChecklistView for TerminalChecklistView {
    fn render_checklist(&self, snapshot: &ChecklistSnapshot<'_>) {
        print!("{}", format_checklist(snapshot));
    }

    fn update_progress(&self, update: &ProgressUpdate<'_>) {
        println!("{}", format_update(update));
    }

    fn show_error(&self, message: &str) {
        eprintln!("{message}");
    }
}

fn progress_line(indicators: &ProgressIndicators) -> String {
    format!(
        "{} ({}) - {}",
        indicators.percent_label, indicators.done_label, indicators.subtitle
    )
}

pub fn format_checklist(snapshot: &ChecklistSnapshot<'_>) -> String {
    let data = snapshot.data;
    let mut out = String::new();

    let _ = writeln!(out, "{}", data.university);
    let _ = writeln!(out, "{}", snapshot.indicators.subtitle);
    let _ = writeln!(out, "Deadline: {}", data.deadline);
    let _ = writeln!(out, "Progress: {}", progress_line(&snapshot.indicators));

    for (category, items) in data.by_category() {
        let _ = writeln!(out, "\n{category} ({})", items.len());
        for item in items {
            let mark = if snapshot.is_done(&item.id) { "x" } else { " " };
            let _ = writeln!(out, "  [{mark}] {:<12} {}", item.id, item.task);
        }
    }
    out
}

pub fn format_update(update: &ProgressUpdate<'_>) -> String {
    let verb = if update.done { "checked" } else { "unchecked" };
    format!("{verb} {}: {}", update.item_id, progress_line(&update.indicators))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::{CompletionMap, Progress};
    use crate::models::{ChecklistData, ChecklistItem, Message};

    #[test]
    fn assistant_message_with_badge() {
        let mut rendered =
            RenderedMessage::from_message(&Message::assistant("- a", Some(stats_for_summary())));
        rendered.time = "09:30".to_string();

        assert_eq!(
            format_message(&rendered, false),
            "[09:30] Assistant:\n- a\n  ⚡ 120 tokens saved (40%)"
        );
        assert!(format_message(&rendered, true).contains("<ul><li>a</li></ul>"));
        assert_eq!(
            format_compression(&stats_for_summary()),
            "Context compression (scaledown): 300 → 180 tokens, 120 saved (40% reduction)"
        );
    }

    fn stats_for_summary() -> CompressionStats {
        CompressionStats {
            original_tokens: 300,
            compressed_tokens: 180,
            tokens_saved: 120,
            compression_ratio: 0.4,
            provider: "scaledown".to_string(),
        }
    }

    #[test]
    fn checklist_groups_and_marks_items() {
        let data = ChecklistData {
            program_id: "mit-cs".to_string(),
            university: "MIT".to_string(),
            program: "CS".to_string(),
            deadline: "January 1, 2025".to_string(),
            total: 2,
            items: vec![
                ChecklistItem {
                    id: "mit-cs-1".to_string(),
                    category: "Essays".to_string(),
                    task: "Write personal statement".to_string(),
                },
                ChecklistItem {
                    id: "mit-cs-2".to_string(),
                    category: "Testing".to_string(),
                    task: "Send SAT scores".to_string(),
                },
            ],
        };
        let completion: CompletionMap = [("mit-cs-2".to_string(), true)].into_iter().collect();
        let progress = Progress::compute(&completion, &data);
        let snapshot = ChecklistSnapshot {
            data: &data,
            completion: &completion,
            progress,
            indicators: progress.indicators(&data.program),
        };

        let out = format_checklist(&snapshot);
        assert!(out.contains("Progress: 50% (1/2) - CS · 1/2 tasks completed"));
        assert!(out.contains("Essays (1)\n  [ ] mit-cs-1"));
        assert!(out.contains("Testing (1)\n  [x] mit-cs-2"));
    }
}
