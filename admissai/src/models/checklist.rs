//! Checklist reference data for one program.

use serde::{Deserialize, Serialize};

/// One discrete admissions task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub category: String,
    pub task: String,
}

/// Response of `GET /api/checklist/{program_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistData {
    pub program_id: String,
    pub university: String,
    pub program: String,
    pub deadline: String,
    pub total: usize,
    pub items: Vec<ChecklistItem>,
}

impl ChecklistData {
    /// Whether `item_id` belongs to this checklist.
    pub fn contains(&self, item_id: &str) -> bool {
        self.items.iter().any(|item| item.id == item_id)
    }

    /// Items grouped by category, categories in first-seen order.
    pub fn by_category(&self) -> Vec<(&str, Vec<&ChecklistItem>)> {
        let mut groups: Vec<(&str, Vec<&ChecklistItem>)> = Vec::new();
        for item in &self.items {
            match groups.iter_mut().find(|(cat, _)| *cat == item.category) {
                Some((_, items)) => items.push(item),
                None => groups.push((item.category.as_str(), vec![item])),
            }
        }
        groups
    }
}
