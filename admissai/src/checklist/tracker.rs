//! Checklist progress tracker.
//!
//! Holds the loaded program's reference data and its completion map. The
//! map is the only source of truth: after every mutation the full
//! [`Progress`] is recomputed and all indicators are pushed to the view in
//! one call.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{ApiError, ChecklistBackend};
use crate::models::ChecklistData;
use crate::notify::{NoticeLevel, Notifier};

use super::progress::{CompletionMap, Progress, ProgressIndicators};
use super::store::KeyValueStore;

/// Shown when the last open task is checked off.
pub const CELEBRATION: &str = "🎉 All tasks complete! Best of luck with your application!";

/// Storage key for a program's completion map.
pub fn storage_key(program_id: &str) -> String {
    format!("checklist_{program_id}")
}

/// Full view of a freshly loaded checklist.
#[derive(Debug)]
pub struct ChecklistSnapshot<'a> {
    pub data: &'a ChecklistData,
    pub completion: &'a CompletionMap,
    pub progress: Progress,
    pub indicators: ProgressIndicators,
}

impl ChecklistSnapshot<'_> {
    pub fn is_done(&self, item_id: &str) -> bool {
        self.completion.get(item_id).copied().unwrap_or(false)
    }
}

/// Result of one toggle: the item's new state and every indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate<'a> {
    pub item_id: &'a str,
    pub done: bool,
    pub progress: Progress,
    pub indicators: ProgressIndicators,
}

/// Where the tracker sends what it wants shown.
pub trait ChecklistView: Send + Sync {
    /// Draw the whole checklist (after a load).
    fn render_checklist(&self, snapshot: &ChecklistSnapshot<'_>);

    /// Apply one toggle. All fields come from the same recomputation.
    fn update_progress(&self, update: &ProgressUpdate<'_>);

    /// Inline error text in place of the checklist.
    fn show_error(&self, message: &str);
}

#[derive(Debug)]
struct LoadedChecklist {
    program_id: String,
    data: ChecklistData,
    completion: CompletionMap,
}

pub struct ChecklistTracker<B> {
    backend: B,
    store: Arc<dyn KeyValueStore>,
    view: Arc<dyn ChecklistView>,
    notifier: Arc<dyn Notifier>,
    current: Option<LoadedChecklist>,
}

impl<B: ChecklistBackend> ChecklistTracker<B> {
    pub fn new(
        backend: B,
        store: Arc<dyn KeyValueStore>,
        view: Arc<dyn ChecklistView>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            backend,
            store,
            view,
            notifier,
            current: None,
        }
    }

    /// Id of the loaded program, if any.
    pub fn loaded_program(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.program_id.as_str())
    }

    /// Progress of the loaded program, recomputed from its map.
    pub fn progress(&self) -> Option<Progress> {
        self.current
            .as_ref()
            .map(|c| Progress::compute(&c.completion, &c.data))
    }

    pub fn is_done(&self, item_id: &str) -> bool {
        self.current
            .as_ref()
            .and_then(|c| c.completion.get(item_id).copied())
            .unwrap_or(false)
    }

    /// Whether the loaded checklist has an item with this id.
    pub fn has_item(&self, item_id: &str) -> bool {
        self.current
            .as_ref()
            .is_some_and(|c| c.data.contains(item_id))
    }

    /// Fetch `program_id`'s checklist, read its saved completion and render.
    ///
    /// An empty id is ignored. On a backend failure nothing stays loaded, so
    /// a later toggle cannot write under the wrong program.
    pub async fn load(&mut self, program_id: &str) -> Result<(), ApiError> {
        if program_id.is_empty() {
            return Ok(());
        }

        let data = match self.backend.checklist(program_id).await {
            Ok(data) => data,
            Err(err) => {
                warn!(program_id, error = %err, "failed to load checklist");
                self.current = None;
                self.view.show_error(&format!("Error: {err}"));
                return Err(err);
            }
        };

        let completion = read_completion(self.store.as_ref(), program_id);
        let progress = Progress::compute(&completion, &data);
        debug!(program_id, done = progress.done, total = progress.total, "checklist loaded");

        self.view.render_checklist(&ChecklistSnapshot {
            data: &data,
            completion: &completion,
            progress,
            indicators: progress.indicators(&data.program),
        });

        self.current = Some(LoadedChecklist {
            program_id: program_id.to_string(),
            data,
            completion,
        });
        Ok(())
    }

    /// Load `program_id` unless it is already the loaded program.
    pub async fn ensure_loaded(&mut self, program_id: &str) -> Result<(), ApiError> {
        if self.loaded_program() == Some(program_id) {
            return Ok(());
        }
        self.load(program_id).await
    }

    /// Flip `item_id` and refresh every indicator.
    ///
    /// Returns the recomputed progress, or `None` when nothing is loaded.
    /// Persistence is best effort: a rejected write is logged and the
    /// in-memory state and view are still updated.
    pub fn toggle(&mut self, item_id: &str) -> Option<Progress> {
        let current = self.current.as_mut()?;

        let done = {
            let entry = current.completion.entry(item_id.to_string()).or_insert(false);
            *entry = !*entry;
            *entry
        };

        write_completion(self.store.as_ref(), &current.program_id, &current.completion);

        let progress = Progress::compute(&current.completion, &current.data);
        self.view.update_progress(&ProgressUpdate {
            item_id,
            done,
            progress,
            indicators: progress.indicators(&current.data.program),
        });

        if progress.is_complete() {
            info!(program_id = %current.program_id, "checklist complete");
            self.notifier.notify(NoticeLevel::Success, CELEBRATION);
        }

        Some(progress)
    }
}

/// Saved completion for `program_id`, or an empty map if there is none or
/// it cannot be read. A corrupt entry is removed.
fn read_completion(store: &dyn KeyValueStore, program_id: &str) -> CompletionMap {
    let key = storage_key(program_id);
    match store.get(&key) {
        Ok(None) => CompletionMap::new(),
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(%key, error = %err, "discarding corrupt checklist state");
            if let Err(err) = store.remove(&key) {
                warn!(%key, error = %err, "could not remove corrupt checklist state");
            }
            CompletionMap::new()
        }),
        Err(err) => {
            warn!(%key, error = %err, "checklist state unreadable, starting empty");
            CompletionMap::new()
        }
    }
}

fn write_completion(store: &dyn KeyValueStore, program_id: &str, completion: &CompletionMap) {
    let key = storage_key(program_id);
    let result = serde_json::to_string(completion)
        .map_err(|err| err.to_string())
        .and_then(|json| store.set(&key, &json).map_err(|err| err.to_string()));
    if let Err(err) = result {
        warn!(%key, error = %err, "could not save checklist state");
    }
}
