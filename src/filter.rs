// Task predicates for view filtering

use crate::models::{Priority, Task};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Primary navigation filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ActiveFilter {
    #[default]
    All,
    /// Incomplete and due on today's calendar date
    Today,
    /// Incomplete and due tomorrow, or later than now but not today
    Upcoming,
    Completed,
}

/// Secondary filter, composed with [`ActiveFilter`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    /// Incomplete and due strictly before now
    Overdue,
    HighPriority,
}

/// One predicate of a view
///
/// A view is the conjunction of its filters; each is independent of the others, so the
/// order they are applied in does not change the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Case-insensitive substring of title or description
    Search(String),
    /// Exact category id
    Category(String),
    Active(ActiveFilter),
    Task(TaskFilter),
}

impl Filter {
    /// Whether `task` passes this filter, evaluated at `now`
    ///
    /// Calendar dates are taken in `now`'s timezone.
    pub fn matches<Tz: TimeZone>(&self, task: &Task, now: &DateTime<Tz>) -> bool {
        match self {
            Filter::Search(query) => matches_search(task, query),
            Filter::Category(id) => task.category_id.as_deref() == Some(id.as_str()),
            Filter::Active(filter) => filter.matches(task, now),
            Filter::Task(filter) => filter.matches(task, now),
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::Search(query) => write!(f, "search={:?}", query),
            Filter::Category(id) => write!(f, "category={}", id),
            Filter::Active(filter) => write!(f, "filter={}", filter),
            Filter::Task(filter) => write!(f, "taskFilter={}", filter),
        }
    }
}

impl ActiveFilter {
    pub fn matches<Tz: TimeZone>(self, task: &Task, now: &DateTime<Tz>) -> bool {
        match self {
            ActiveFilter::All => true,
            ActiveFilter::Completed => task.completed,
            ActiveFilter::Today => !task.completed && task.due_date.is_some_and(|due| is_today(due, now)),
            ActiveFilter::Upcoming => {
                !task.completed
                    && task
                        .due_date
                        .is_some_and(|due| is_tomorrow(due, now) || (due > now.to_utc() && !is_today(due, now)))
            }
        }
    }
}

impl TaskFilter {
    pub fn matches<Tz: TimeZone>(self, task: &Task, now: &DateTime<Tz>) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => !task.completed,
            TaskFilter::Overdue => !task.completed && task.due_date.is_some_and(|due| due < now.to_utc()),
            TaskFilter::HighPriority => task.priority == Priority::High,
        }
    }
}

/// An empty query matches everything; whitespace is part of the query
pub fn matches_search(task: &Task, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    task.title.to_lowercase().contains(&query)
        || task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&query))
}

fn local_date<Tz: TimeZone>(instant: DateTime<Utc>, now: &DateTime<Tz>) -> NaiveDate {
    instant.with_timezone(&now.timezone()).date_naive()
}

fn is_today<Tz: TimeZone>(due: DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    local_date(due, now) == now.date_naive()
}

fn is_tomorrow<Tz: TimeZone>(due: DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    now.date_naive().succ_opt() == Some(local_date(due, now))
}

impl From<&str> for ActiveFilter {
    /// Unknown values fall back to `All`
    fn from(value: &str) -> Self {
        match value {
            "today" => ActiveFilter::Today,
            "upcoming" => ActiveFilter::Upcoming,
            "completed" => ActiveFilter::Completed,
            _ => ActiveFilter::All,
        }
    }
}

impl From<String> for ActiveFilter {
    fn from(value: String) -> Self {
        ActiveFilter::from(value.as_str())
    }
}

impl From<&str> for TaskFilter {
    /// Unknown values fall back to `All`
    fn from(value: &str) -> Self {
        match value {
            "pending" => TaskFilter::Pending,
            "overdue" => TaskFilter::Overdue,
            "high-priority" => TaskFilter::HighPriority,
            _ => TaskFilter::All,
        }
    }
}

impl From<String> for TaskFilter {
    fn from(value: String) -> Self {
        TaskFilter::from(value.as_str())
    }
}

impl std::fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActiveFilter::All => write!(f, "all"),
            ActiveFilter::Today => write!(f, "today"),
            ActiveFilter::Upcoming => write!(f, "upcoming"),
            ActiveFilter::Completed => write!(f, "completed"),
        }
    }
}

impl std::fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskFilter::All => write!(f, "all"),
            TaskFilter::Pending => write!(f, "pending"),
            TaskFilter::Overdue => write!(f, "overdue"),
            TaskFilter::HighPriority => write!(f, "high-priority"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    fn now() -> DateTime<FixedOffset> {
        // 2026-04-10 15:00 at UTC+02:00
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 4, 10, 15, 0, 0)
            .unwrap()
    }

    fn task(title: &str) -> Task {
        let at = now().to_utc();
        Task {
            id: title.to_string(),
            title: title.to_string(),
            description: None,
            completed: false,
            priority: Priority::Medium,
            category_id: None,
            due_date: None,
            position: 0,
            created_at: at,
            updated_at: at,
        }
    }

    fn due(title: &str, offset: Duration) -> Task {
        let mut t = task(title);
        t.due_date = Some(now().to_utc() + offset);
        t
    }

    #[test]
    fn test_search_title_and_description() {
        let foobar = task("Foobar");
        let mut described = task("Errand");
        described.description = Some("contains foo".to_string());
        let bar = task("bar");

        assert!(matches_search(&foobar, "foo"));
        assert!(matches_search(&described, "FOO"));
        assert!(!matches_search(&bar, "foo"));
        assert!(matches_search(&bar, ""));
    }

    #[test]
    fn test_search_keeps_whitespace() {
        let foobar = task("Foobar");
        let buy_foo = task("buy foo");
        let nospace = task("nospace");

        assert!(!matches_search(&foobar, " foo"));
        assert!(matches_search(&buy_foo, " foo"));
        assert!(!matches_search(&nospace, " "));
        assert!(matches_search(&buy_foo, " "));
        assert!(matches_search(&buy_foo, " FOO"));
    }

    #[test]
    fn test_category_filter_exact() {
        let mut t = task("Report");
        t.category_id = Some("work".to_string());
        let n = now();
        assert!(Filter::Category("work".to_string()).matches(&t, &n));
        assert!(!Filter::Category("wor".to_string()).matches(&t, &n));
        assert!(!Filter::Category("work".to_string()).matches(&task("Loose"), &n));
    }

    #[test]
    fn test_today_uses_local_calendar_date() {
        let n = now();
        // 23:30 local today is 21:30 UTC, still today
        assert!(ActiveFilter::Today.matches(&due("late", Duration::minutes(510)), &n));
        // 00:30 local tomorrow is 22:30 UTC today, not today locally
        assert!(!ActiveFilter::Today.matches(&due("past-midnight", Duration::minutes(570)), &n));
        // Earlier today still counts as today
        assert!(ActiveFilter::Today.matches(&due("morning", Duration::hours(-5)), &n));
        assert!(!ActiveFilter::Today.matches(&task("undated"), &n));

        let mut done = due("done", Duration::hours(1));
        done.completed = true;
        assert!(!ActiveFilter::Today.matches(&done, &n));
    }

    #[test]
    fn test_upcoming() {
        let n = now();
        assert!(ActiveFilter::Upcoming.matches(&due("tomorrow", Duration::days(1)), &n));
        assert!(ActiveFilter::Upcoming.matches(&due("next week", Duration::days(7)), &n));
        assert!(!ActiveFilter::Upcoming.matches(&due("later today", Duration::hours(2)), &n));
        assert!(!ActiveFilter::Upcoming.matches(&due("yesterday", Duration::days(-1)), &n));
        assert!(!ActiveFilter::Upcoming.matches(&task("undated"), &n));
    }

    #[test]
    fn test_completed_and_all() {
        let n = now();
        let mut done = task("done");
        done.completed = true;
        assert!(ActiveFilter::Completed.matches(&done, &n));
        assert!(!ActiveFilter::Completed.matches(&task("open"), &n));
        assert!(ActiveFilter::All.matches(&done, &n));
    }

    #[test]
    fn test_task_filters() {
        let n = now();
        let overdue = due("overdue", Duration::minutes(-1));
        let future = due("future", Duration::minutes(1));
        let mut high = task("high");
        high.priority = Priority::High;
        let mut done = due("done", Duration::days(-3));
        done.completed = true;

        assert!(TaskFilter::Overdue.matches(&overdue, &n));
        assert!(!TaskFilter::Overdue.matches(&future, &n));
        assert!(!TaskFilter::Overdue.matches(&done, &n));
        assert!(!TaskFilter::Overdue.matches(&task("undated"), &n));

        assert!(TaskFilter::Pending.matches(&future, &n));
        assert!(!TaskFilter::Pending.matches(&done, &n));

        assert!(TaskFilter::HighPriority.matches(&high, &n));
        assert!(!TaskFilter::HighPriority.matches(&future, &n));
    }

    #[test]
    fn test_filter_wire_names() {
        let parsed: TaskFilter = serde_json::from_str("\"high-priority\"").unwrap();
        assert_eq!(parsed, TaskFilter::HighPriority);
        assert_eq!(serde_json::to_string(&TaskFilter::HighPriority).unwrap(), "\"high-priority\"");
        let parsed: ActiveFilter = serde_json::from_str("\"upcoming\"").unwrap();
        assert_eq!(parsed, ActiveFilter::Upcoming);
        assert_eq!(ActiveFilter::from("nonsense"), ActiveFilter::All);
        assert_eq!(TaskFilter::from("nonsense"), TaskFilter::All);
    }

    #[test]
    fn test_filter_display() {
        assert_eq!(Filter::Active(ActiveFilter::Today).to_string(), "filter=today");
        assert_eq!(Filter::Task(TaskFilter::HighPriority).to_string(), "taskFilter=high-priority");
        assert_eq!(Filter::Category("work".to_string()).to_string(), "category=work");
    }
}
