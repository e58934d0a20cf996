// View evaluation: filters and sort over a task snapshot

use crate::filter::{ActiveFilter, Filter, TaskFilter};
use crate::models::{Category, TaskWithCategory};
use crate::sort::SortBy;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Transient filter/sort selections held by a client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewState {
    #[serde(alias = "searchQuery")]
    pub search: String,
    #[serde(alias = "activeCategory")]
    pub category: Option<String>,
    #[serde(alias = "activeFilter")]
    pub filter: ActiveFilter,
    pub task_filter: TaskFilter,
    #[serde(alias = "sortBy")]
    pub sort: SortBy,
}

impl ViewState {
    /// Selected category id; an empty selection counts as none
    pub fn active_category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    /// The predicates this view applies; trivially-true ones are omitted
    pub fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();
        if !self.search.is_empty() {
            filters.push(Filter::Search(self.search.clone()));
        }
        if let Some(category) = self.active_category() {
            filters.push(Filter::Category(category.to_string()));
        }
        if self.filter != ActiveFilter::All {
            filters.push(Filter::Active(self.filter));
        }
        if self.task_filter != TaskFilter::All {
            filters.push(Filter::Task(self.task_filter));
        }
        filters
    }

    /// Heading for this view; `categories` resolves the active category's name
    pub fn title(&self, categories: &[Category]) -> String {
        if let Some(id) = self.active_category() {
            let name = categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.name.as_str())
                .unwrap_or("Category");
            return format!("{} Tasks", name);
        }
        match self.filter {
            ActiveFilter::All => "All Tasks",
            ActiveFilter::Today => "Today's Tasks",
            ActiveFilter::Upcoming => "Upcoming Tasks",
            ActiveFilter::Completed => "Completed Tasks",
        }
        .to_string()
    }

    pub fn description(&self) -> &'static str {
        if self.active_category().is_some() {
            return "Tasks in this category";
        }
        match self.filter {
            ActiveFilter::All => "Manage all your tasks in one place",
            ActiveFilter::Today => "Tasks due today",
            ActiveFilter::Upcoming => "Tasks coming up",
            ActiveFilter::Completed => "Tasks you've completed",
        }
    }
}

/// Filter then stably sort `tasks` according to `view`, evaluated at `now`
///
/// Pure: never touches the store.
pub fn apply_view<Tz: TimeZone>(
    tasks: &[TaskWithCategory],
    view: &ViewState,
    now: &DateTime<Tz>,
) -> Vec<TaskWithCategory> {
    let filters = view.filters();
    let mut visible: Vec<TaskWithCategory> = tasks
        .iter()
        .filter(|t| filters.iter().all(|f| f.matches(&t.task, now)))
        .cloned()
        .collect();
    view.sort.sort(&mut visible);
    visible
}

/// Sidebar counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    /// Completed share of all tasks, rounded to a whole percent
    pub progress_percent: u8,
    pub today: usize,
    pub upcoming: usize,
    /// Task count per referenced category id
    pub by_category: BTreeMap<String, usize>,
}

pub fn summarize<Tz: TimeZone>(tasks: &[TaskWithCategory], now: &DateTime<Tz>) -> TaskStats {
    let mut stats = TaskStats {
        total: tasks.len(),
        ..TaskStats::default()
    };

    for t in tasks {
        if t.task.completed {
            stats.completed += 1;
        }
        if ActiveFilter::Today.matches(&t.task, now) {
            stats.today += 1;
        }
        if ActiveFilter::Upcoming.matches(&t.task, now) {
            stats.upcoming += 1;
        }
        if let Some(id) = &t.task.category_id {
            *stats.by_category.entry(id.clone()).or_default() += 1;
        }
    }

    if stats.total > 0 {
        stats.progress_percent = ((stats.completed * 100 + stats.total / 2) / stats.total) as u8;
    }
    stats
}
