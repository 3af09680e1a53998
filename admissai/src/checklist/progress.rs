//! Derived checklist progress.
//!
//! Everything here is a pure function of the completion map and the
//! checklist reference data. Indicators are always rebuilt together from a
//! fresh [`Progress`], never adjusted in place.

use std::collections::BTreeMap;

use crate::models::ChecklistData;

/// Item id → completed. Ordered so the persisted JSON is stable.
pub type CompletionMap = BTreeMap<String, bool>;

/// Circumference of the progress ring (`2 * π * 32`, as drawn).
pub const RING_CIRCUMFERENCE: f64 = 201.1;

/// Stroke offset for a ring showing `percent`.
pub fn ring_offset(percent: u32) -> f64 {
    RING_CIRCUMFERENCE - (f64::from(percent) / 100.0) * RING_CIRCUMFERENCE
}

/// Completion counts for one checklist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
    pub percent: u32,
}

impl Progress {
    /// Count completed items of `data` in `completion`.
    ///
    /// Only ids belonging to the checklist count, so a stale entry left over
    /// from an older item set cannot push progress past 100%.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn compute(completion: &CompletionMap, data: &ChecklistData) -> Self {
        let done = data
            .items
            .iter()
            .filter(|item| completion.get(&item.id).copied().unwrap_or(false))
            .count();
        let total = data.total;
        let percent = if total > 0 {
            ((done as f64 / total as f64) * 100.0).round().min(100.0) as u32
        } else {
            0
        };

        Self {
            done,
            total,
            percent,
        }
    }

    pub const fn is_complete(&self) -> bool {
        self.percent == 100
    }

    /// Every progress indicator, built from this one value.
    pub fn indicators(&self, program: &str) -> ProgressIndicators {
        ProgressIndicators {
            ring_offset: ring_offset(self.percent),
            percent_label: format!("{}%", self.percent),
            done_label: format!("{}/{}", self.done, self.total),
            subtitle: format!("{program} · {}/{} tasks completed", self.done, self.total),
        }
    }
}

/// The dependent visual indicators of a checklist.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressIndicators {
    pub ring_offset: f64,
    pub percent_label: String,
    pub done_label: String,
    pub subtitle: String,
}
