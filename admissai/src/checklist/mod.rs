//! Per-program application checklist with persisted completion.

mod progress;
mod store;
mod tracker;

pub use progress::{ring_offset, CompletionMap, Progress, ProgressIndicators, RING_CIRCUMFERENCE};
pub use store::{FileStore, KeyValueStore, StoreError};
pub use tracker::{
    storage_key, ChecklistSnapshot, ChecklistTracker, ChecklistView, ProgressUpdate, CELEBRATION,
};
