// Drag-and-drop reordering over a displayed task sequence

use crate::models::TaskWithCategory;

/// Why a drop could not be turned into a new order
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    #[error("source index {index} is out of range for {len} displayed tasks")]
    SourceOutOfRange { index: usize, len: usize },

    #[error("target index {index} is out of range for {len} displayed tasks")]
    TargetOutOfRange { index: usize, len: usize },

    #[error("task {task_id} is no longer at index {index}")]
    Stale { task_id: String, index: usize },
}

/// A drag in progress: which task was picked up and where it sat in the displayed view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    task_id: String,
    source_index: usize,
}

impl DragSession {
    pub fn start(task_id: impl Into<String>, source_index: usize) -> Self {
        Self {
            task_id: task_id.into(),
            source_index,
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn source_index(&self) -> usize {
        self.source_index
    }

    /// Drop the dragged task at `target_index` of `displayed`
    ///
    /// Returns the ids of the displayed sequence in their new order, ready for
    /// `Store::reorder_tasks`, or `None` when dropped where it started. `displayed` must be
    /// the same sequence the drag started on; if the dragged task is no longer at its
    /// source index the drop is rejected as stale.
    pub fn drop_at(
        &self,
        displayed: &[TaskWithCategory],
        target_index: usize,
    ) -> Result<Option<Vec<String>>, ReorderError> {
        let len = displayed.len();
        let picked = displayed.get(self.source_index).ok_or(ReorderError::SourceOutOfRange {
            index: self.source_index,
            len,
        })?;
        if picked.task.id != self.task_id {
            return Err(ReorderError::Stale {
                task_id: self.task_id.clone(),
                index: self.source_index,
            });
        }
        if target_index >= len {
            return Err(ReorderError::TargetOutOfRange {
                index: target_index,
                len,
            });
        }

        let ids: Vec<String> = displayed.iter().map(|t| t.task.id.clone()).collect();
        Ok(move_item(&ids, self.source_index, target_index))
    }
}

/// Copy of `items` with the element at `source` moved to `target`
///
/// `None` when `source == target` or either index is out of range.
pub fn move_item<T: Clone>(items: &[T], source: usize, target: usize) -> Option<Vec<T>> {
    if source == target || source >= items.len() || target >= items.len() {
        return None;
    }
    let mut moved = items.to_vec();
    let item = moved.remove(source);
    moved.insert(target, item);
    Some(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, Task};
    use chrono::Utc;

    fn displayed(ids: &[&str]) -> Vec<TaskWithCategory> {
        let at = Utc::now();
        ids.iter()
            .enumerate()
            .map(|(i, id)| TaskWithCategory {
                task: Task {
                    id: id.to_string(),
                    title: id.to_uppercase(),
                    description: None,
                    completed: false,
                    priority: Priority::Medium,
                    category_id: None,
                    due_date: None,
                    position: i as i64,
                    created_at: at,
                    updated_at: at,
                },
                category: None,
            })
            .collect()
    }

    #[test]
    fn test_move_item_down_and_up() {
        let items = vec!['a', 'b', 'c', 'd'];
        assert_eq!(move_item(&items, 0, 2), Some(vec!['b', 'c', 'a', 'd']));
        assert_eq!(move_item(&items, 3, 1), Some(vec!['a', 'd', 'b', 'c']));
        assert_eq!(move_item(&items, 1, 1), None);
        assert_eq!(move_item(&items, 4, 0), None);
    }

    #[test]
    fn test_drop_produces_full_displayed_order() {
        let view = displayed(&["a", "b", "c"]);
        let session = DragSession::start("a", 0);
        let ids = session.drop_at(&view, 2).unwrap().unwrap();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_drop_in_place_is_noop() {
        let view = displayed(&["a", "b"]);
        let session = DragSession::start("b", 1);
        assert_eq!(session.drop_at(&view, 1).unwrap(), None);
    }

    #[test]
    fn test_drop_rejects_bad_indices() {
        let view = displayed(&["a", "b"]);
        assert_eq!(
            DragSession::start("a", 5).drop_at(&view, 0),
            Err(ReorderError::SourceOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(
            DragSession::start("a", 0).drop_at(&view, 2),
            Err(ReorderError::TargetOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_drop_rejects_stale_session() {
        let view = displayed(&["a", "b"]);
        let session = DragSession::start("b", 0);
        assert!(matches!(session.drop_at(&view, 1), Err(ReorderError::Stale { .. })));
        assert_eq!(session.task_id(), "b");
        assert_eq!(session.source_index(), 0);
    }
}
