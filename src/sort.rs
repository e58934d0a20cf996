// Sort keys for task views

use crate::models::{Task, TaskWithCategory};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort key for a task view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum SortBy {
    /// Ascending manual position
    #[default]
    Created,
    Title,
    /// High priority first
    Priority,
    /// Earliest due first, undated last
    DueDate,
    /// Incomplete first
    Completed,
}

impl SortBy {
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortBy::Created => a.position.cmp(&b.position),
            SortBy::Title => collate(&a.title, &b.title),
            SortBy::Priority => b.priority.rank().cmp(&a.priority.rank()),
            SortBy::DueDate => match (a.due_date, b.due_date) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortBy::Completed => a.completed.cmp(&b.completed),
        }
    }

    /// Stable sort; ties keep their incoming order
    pub fn sort(self, tasks: &mut [TaskWithCategory]) {
        tasks.sort_by(|a, b| self.compare(&a.task, &b.task));
    }
}

impl From<&str> for SortBy {
    /// Unknown keys fall back to `Created`
    fn from(value: &str) -> Self {
        match value {
            "title" => SortBy::Title,
            "priority" => SortBy::Priority,
            "dueDate" => SortBy::DueDate,
            "completed" => SortBy::Completed,
            _ => SortBy::Created,
        }
    }
}

impl From<String> for SortBy {
    fn from(value: String) -> Self {
        SortBy::from(value.as_str())
    }
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortBy::Created => write!(f, "created"),
            SortBy::Title => write!(f, "title"),
            SortBy::Priority => write!(f, "priority"),
            SortBy::DueDate => write!(f, "dueDate"),
            SortBy::Completed => write!(f, "completed"),
        }
    }
}

/// Text collation used for titles and category names
///
/// Case-insensitive (Unicode lowercase) comparison first; strings equal ignoring case fall
/// back to plain code point order, so "Apple" sorts before "apple".
pub fn collate(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}
