// In-memory entity store: tasks and categories in id-indexed collections

use crate::models::{
    self, Category, CategoryPatch, DEFAULT_CATEGORIES, NewCategory, NewTask, Task, TaskPatch, TaskWithCategory,
};
use crate::record::Record;
use crate::sort::collate;
use eyre::{Result, eyre};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};
use uuid::Uuid;

/// Owned table of records with id lookup
///
/// Records live in insertion-ordered slots; `index` maps an id to its slot. Iteration
/// yields records in insertion order, which gives stable tie-breaking to callers that sort.
#[derive(Debug, Clone)]
pub struct Collection<T: Record> {
    slots: BTreeMap<u64, T>,
    index: HashMap<String, u64>,
    next_slot: u64,
}

impl<T: Record> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Collection<T> {
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
            index: HashMap::new(),
            next_slot: 0,
        }
    }

    /// Insert a new record; ids are immutable so an existing id is rejected
    pub fn insert(&mut self, record: T) -> Result<()> {
        let id = record.id().to_string();
        validate_id(&id)?;

        if self.index.contains_key(&id) {
            return Err(eyre!("{} already contains id {}", T::collection_name(), id));
        }

        let slot = self.next_slot;
        self.next_slot += 1;
        self.index.insert(id, slot);
        self.slots.insert(slot, record);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).and_then(|slot| self.slots.get(slot))
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        let slot = self.index.get(id)?;
        self.slots.get_mut(slot)
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let slot = self.index.remove(id)?;
        self.slots.remove(&slot)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Records in insertion order
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.values_mut()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Validate record ID
fn validate_id(id: &str) -> Result<()> {
    // Check not empty or whitespace-only
    if id.trim().is_empty() {
        return Err(eyre!("Record ID cannot be empty or whitespace-only"));
    }

    // Check reasonable length (prevent DoS via huge IDs)
    if id.len() > 256 {
        return Err(eyre!("Record ID too long: {} chars (max 256)", id.len()));
    }

    Ok(())
}

/// Task and category store
///
/// All mutation goes through `&mut self`, so a caller holding the store behind a lock gets
/// each operation applied atomically.
#[derive(Debug, Clone, Default)]
pub struct Store {
    tasks: Collection<Task>,
    categories: Collection<Category>,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the default Work/Personal/Shopping categories
    pub fn with_default_categories() -> Result<Self> {
        let mut store = Self::new();
        store.seed_default_categories()?;
        Ok(store)
    }

    /// Add any default category whose id is not already present
    pub fn seed_default_categories(&mut self) -> Result<()> {
        let created_at = models::now();
        for (id, name, color) in DEFAULT_CATEGORIES {
            if self.categories.contains(id) {
                continue;
            }
            self.categories.insert(Category {
                id: id.to_string(),
                name: name.to_string(),
                color: color.to_string(),
                created_at,
            })?;
        }
        info!(count = self.categories.len(), "Seeded default categories");
        Ok(())
    }

    fn join(&self, task: &Task) -> TaskWithCategory {
        let category = task
            .category_id
            .as_deref()
            .and_then(|id| self.categories.get(id))
            .cloned();
        TaskWithCategory {
            task: task.clone(),
            category,
        }
    }

    // ========================================================================
    // Tasks
    // ========================================================================

    /// All tasks joined with their category, ascending by position
    ///
    /// Equal positions keep insertion order.
    pub fn list_tasks(&self) -> Vec<TaskWithCategory> {
        let mut tasks: Vec<&Task> = self.tasks.values().collect();
        tasks.sort_by_key(|task| task.position);
        tasks.into_iter().map(|task| self.join(task)).collect()
    }

    pub fn get_task(&self, id: &str) -> Option<TaskWithCategory> {
        self.tasks.get(id).map(|task| self.join(task))
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Create a task
    ///
    /// Without an explicit position the task goes after the current maximum (at least 1).
    pub fn create_task(&mut self, new: NewTask) -> Result<TaskWithCategory> {
        let now = models::now();
        let position = match new.position {
            Some(position) => position,
            None => self.max_position() + 1,
        };

        let task = Task {
            id: Uuid::now_v7().to_string(),
            title: new.title,
            description: new.description,
            completed: new.completed,
            priority: new.priority,
            category_id: new.category_id,
            due_date: new.due_date,
            position,
            created_at: now,
            updated_at: now,
        };

        debug!(collection = Task::collection_name(), id = %task.id, position, "create_task");
        let joined = self.join(&task);
        self.tasks.insert(task)?;
        Ok(joined)
    }

    fn max_position(&self) -> i64 {
        self.tasks.values().fold(0, |max, task| max.max(task.position))
    }

    /// Merge `patch` into a task; `None` if the id is unknown
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Option<TaskWithCategory> {
        let task = self.tasks.get_mut(id)?;
        patch.apply(task);
        task.updated_at = models::touch(task.updated_at);
        debug!(collection = Task::collection_name(), id, "update_task");

        let task = task.clone();
        Some(self.join(&task))
    }

    /// Remove a task; returns whether it existed
    pub fn delete_task(&mut self, id: &str) -> bool {
        let existed = self.tasks.remove(id).is_some();
        debug!(collection = Task::collection_name(), id, existed, "delete_task");
        existed
    }

    /// Flip `completed`; `None` if the id is unknown
    pub fn toggle_task_complete(&mut self, id: &str) -> Option<TaskWithCategory> {
        let task = self.tasks.get_mut(id)?;
        task.completed = !task.completed;
        task.updated_at = models::touch(task.updated_at);
        debug!(collection = Task::collection_name(), id, completed = task.completed, "toggle_task_complete");

        let task = task.clone();
        Some(self.join(&task))
    }

    /// Set each listed task's position to its index in `ordered_ids`
    ///
    /// Unknown ids are skipped but still consume their index. Unlisted tasks keep their
    /// position, so reordering a filtered subset can leave positions interleaved with hidden
    /// tasks. Returns how many tasks were rewritten.
    pub fn reorder_tasks<S: AsRef<str>>(&mut self, ordered_ids: &[S]) -> usize {
        let mut rewritten = 0;
        for (index, id) in ordered_ids.iter().enumerate() {
            if let Some(task) = self.tasks.get_mut(id.as_ref()) {
                task.position = index as i64;
                task.updated_at = models::touch(task.updated_at);
                rewritten += 1;
            }
        }
        debug!(
            collection = Task::collection_name(),
            submitted = ordered_ids.len(),
            rewritten,
            "reorder_tasks"
        );
        rewritten
    }

    // ========================================================================
    // Categories
    // ========================================================================

    /// All categories ordered by name (see [`collate`])
    pub fn list_categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self.categories.values().cloned().collect();
        categories.sort_by(|a, b| collate(&a.name, &b.name));
        categories
    }

    pub fn get_category(&self, id: &str) -> Option<Category> {
        self.categories.get(id).cloned()
    }

    pub fn has_category(&self, id: &str) -> bool {
        self.categories.contains(id)
    }

    pub fn create_category(&mut self, new: NewCategory) -> Result<Category> {
        let category = Category {
            id: Uuid::now_v7().to_string(),
            name: new.name,
            color: new.color,
            created_at: models::now(),
        };
        debug!(collection = Category::collection_name(), id = %category.id, "create_category");
        self.categories.insert(category.clone())?;
        Ok(category)
    }

    pub fn update_category(&mut self, id: &str, patch: CategoryPatch) -> Option<Category> {
        let category = self.categories.get_mut(id)?;
        patch.apply(category);
        debug!(collection = Category::collection_name(), id, "update_category");
        Some(category.clone())
    }

    /// Detach the category from every task referencing it, then remove it
    ///
    /// Returns whether the category existed. Tasks holding a dangling reference to `id` are
    /// detached either way.
    pub fn delete_category(&mut self, id: &str) -> bool {
        let mut detached = 0;
        for task in self.tasks.values_mut() {
            if task.category_id.as_deref() == Some(id) {
                task.category_id = None;
                task.updated_at = models::touch(task.updated_at);
                detached += 1;
            }
        }

        let existed = self.categories.remove(id).is_some();
        debug!(
            collection = Category::collection_name(),
            id, existed, detached, "delete_category"
        );
        existed
    }
}
