// Bulk task actions: independent per-id operations with an aggregate outcome

use crate::store::Store;
use serde::{Deserialize, Serialize};

/// Action applied to every selected task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Toggle,
    Delete,
}

impl BulkAction {
    /// Apply to one task; returns false if the task does not exist
    pub fn apply(self, store: &mut Store, id: &str) -> bool {
        match self {
            BulkAction::Toggle => store.toggle_task_complete(id).is_some(),
            BulkAction::Delete => store.delete_task(id),
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            BulkAction::Toggle => "toggled",
            BulkAction::Delete => "deleted",
        }
    }
}

impl std::fmt::Display for BulkAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BulkAction::Toggle => write!(f, "toggle"),
            BulkAction::Delete => write!(f, "delete"),
        }
    }
}

/// Aggregate result of a bulk action
///
/// There is no rollback: ids in `succeeded` stay mutated even when others failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome {
    pub action: BulkAction,
    pub succeeded: Vec<String>,
    pub not_found: Vec<String>,
}

impl BulkOutcome {
    pub fn new(action: BulkAction) -> Self {
        Self {
            action,
            succeeded: Vec::new(),
            not_found: Vec::new(),
        }
    }

    pub fn record(&mut self, id: impl Into<String>, ok: bool) {
        if ok {
            self.succeeded.push(id.into());
        } else {
            self.not_found.push(id.into());
        }
    }

    pub fn is_success(&self) -> bool {
        self.not_found.is_empty()
    }

    /// One notification line for the whole batch
    pub fn summary(&self) -> String {
        if self.is_success() {
            format!("{} tasks {}", self.succeeded.len(), self.action.past_tense())
        } else {
            format!(
                "Failed to {} {} of {} tasks. Please try again.",
                self.action,
                self.not_found.len(),
                self.succeeded.len() + self.not_found.len()
            )
        }
    }
}
