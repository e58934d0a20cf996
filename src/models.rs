// Data models for TaskFlow

use crate::record::Record;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort rank, higher is more urgent
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// A to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub category_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }

    fn collection_name() -> &'static str {
        "tasks"
    }

    fn kind() -> &'static str {
        "task"
    }
}

/// A named, colored grouping label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl Record for Category {
    fn id(&self) -> &str {
        &self.id
    }

    fn collection_name() -> &'static str {
        "categories"
    }

    fn kind() -> &'static str {
        "category"
    }
}

/// Read model: a task joined with its resolved category
///
/// `category` is `None` when the task has no category or the reference is dangling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskWithCategory {
    #[serde(flatten)]
    pub task: Task,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// Rejected input, reported before anything reaches the store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be a hex color like #3b82f6, got {value:?}")]
    InvalidColor { field: &'static str, value: String },

    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

/// Fields accepted when creating a task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "due_date::deserialize")]
    pub due_date: Option<DateTime<Utc>>,
    /// Explicit position; when absent the store appends after the current maximum
    #[serde(default)]
    pub position: Option<i64>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Normalize and validate: trims the title, drops blank description and category
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.title = non_empty("title", &self.title)?;
        self.description = blank_to_none(self.description);
        self.category_id = blank_to_none(self.category_id);
        Ok(self)
    }
}

/// Partial task update
///
/// Outer `None` keeps the stored value. For nullable fields `Some(None)` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "present")]
    pub category_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "due_date::deserialize_patch")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub position: Option<i64>,
}

impl TaskPatch {
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        if let Some(title) = &self.title {
            self.title = Some(non_empty("title", title)?);
        }
        self.description = self.description.map(blank_to_none);
        self.category_id = self.category_id.map(blank_to_none);
        Ok(self)
    }

    /// Category id this patch assigns, if any
    pub fn assigned_category(&self) -> Option<&str> {
        self.category_id.as_ref().and_then(|c| c.as_deref())
    }

    /// Merge present fields into `task`; id and timestamps are left alone
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category_id) = self.category_id {
            task.category_id = category_id;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(position) = self.position {
            task.position = position;
        }
    }
}

/// Fields accepted when creating a category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    pub color: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }

    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.name = non_empty("name", &self.name)?;
        self.color = hex_color("color", &self.color)?;
        Ok(self)
    }
}

/// Partial category update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl CategoryPatch {
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        if let Some(name) = &self.name {
            self.name = Some(non_empty("name", name)?);
        }
        if let Some(color) = &self.color {
            self.color = Some(hex_color("color", color)?);
        }
        Ok(self)
    }

    pub fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(color) = self.color {
            category.color = color;
        }
    }
}

/// Categories a fresh store starts with: (id, name, color)
pub const DEFAULT_CATEGORIES: [(&str, &str, &str); 3] = [
    ("work", "Work", "#3b82f6"),
    ("personal", "Personal", "#10b981"),
    ("shopping", "Shopping", "#f59e0b"),
];

/// Current time, truncated to millisecond precision to survive a JSON round trip intact
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// Next `updated_at` for a record last touched at `previous`; never moves backwards
pub fn touch(previous: DateTime<Utc>) -> DateTime<Utc> {
    now().max(previous)
}

/// Parse a due date: RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC) or a plain
/// `YYYY-MM-DD` (midnight UTC)
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    Err(format!("invalid due date {:?}, expected ISO 8601 date or date-time", raw))
}

fn non_empty(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_string())
}

fn hex_color(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let valid = trimmed
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if !valid {
        return Err(ValidationError::InvalidColor {
            field,
            value: value.to_string(),
        });
    }
    Ok(trimmed.to_lowercase())
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Marks a nullable field as present: `null` becomes `Some(None)`, absence stays `None`
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

mod due_date {
    use super::parse_due_date;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, de};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.filter(|s| !s.trim().is_empty())
            .map(|s| parse_due_date(&s).map_err(de::Error::custom))
            .transpose()
    }

    pub fn deserialize_patch<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize(deserializer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_task() -> Task {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        Task {
            id: "t1".to_string(),
            title: "Write report".to_string(),
            description: Some("quarterly".to_string()),
            completed: false,
            priority: Priority::Medium,
            category_id: Some("work".to_string()),
            due_date: None,
            position: 1,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_priority_serialization() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        let p: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(p, Priority::Low);
        assert!(serde_json::from_str::<Priority>("\"urgent\"").is_err());
    }

    #[test]
    fn test_priority_rank() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let json = serde_json::to_value(sample_task()).unwrap();
        assert_eq!(json["categoryId"], "work");
        assert!(json["dueDate"].is_null());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("category_id").is_none());
    }

    #[test]
    fn test_task_with_category_flattens() {
        let joined = TaskWithCategory {
            task: sample_task(),
            category: None,
        };
        let json = serde_json::to_value(&joined).unwrap();
        assert_eq!(json["title"], "Write report");
        assert!(json.get("category").is_none());
    }

    #[test]
    fn test_new_task_defaults() {
        let new: NewTask = serde_json::from_str(r#"{"title":"Buy milk"}"#).unwrap();
        assert_eq!(new.priority, Priority::Medium);
        assert!(!new.completed);
        assert!(new.position.is_none());
        assert!(new.due_date.is_none());
    }

    #[test]
    fn test_new_task_requires_title() {
        assert!(serde_json::from_str::<NewTask>(r#"{"priority":"high"}"#).is_err());
        let blank = NewTask::titled("   ");
        assert_eq!(
            blank.validated().unwrap_err(),
            ValidationError::Empty { field: "title" }
        );
    }

    #[test]
    fn test_new_task_normalizes_blank_fields() {
        let new: NewTask =
            serde_json::from_str(r#"{"title":"  Call mom ","description":"","categoryId":"","dueDate":""}"#).unwrap();
        let new = new.validated().unwrap();
        assert_eq!(new.title, "Call mom");
        assert!(new.description.is_none());
        assert!(new.category_id.is_none());
        assert!(new.due_date.is_none());
    }

    #[test]
    fn test_parse_due_date_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 5, 4, 0, 0, 0).unwrap();
        assert_eq!(parse_due_date("2026-05-04").unwrap(), expected);
        assert_eq!(parse_due_date("2026-05-04T00:00:00Z").unwrap(), expected);
        assert_eq!(parse_due_date("2026-05-04T02:00:00+02:00").unwrap(), expected);
        assert_eq!(parse_due_date("2026-05-04T00:00:00.000").unwrap(), expected);
        assert!(parse_due_date("next tuesday").is_err());
    }

    #[test]
    fn test_patch_distinguishes_null_from_absent() {
        let patch: TaskPatch = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(patch.description, Some(None));
        assert!(patch.category_id.is_none());
        assert!(patch.due_date.is_none());

        let mut task = sample_task();
        patch.apply(&mut task);
        assert!(task.description.is_none());
        assert_eq!(task.category_id.as_deref(), Some("work"));
    }

    #[test]
    fn test_patch_apply_overwrites_present_fields() {
        let patch: TaskPatch =
            serde_json::from_str(r#"{"title":"Ship it","priority":"high","dueDate":"2026-06-01","categoryId":null}"#)
                .unwrap();
        let patch = patch.validated().unwrap();

        let mut task = sample_task();
        let created = task.created_at;
        patch.apply(&mut task);

        assert_eq!(task.id, "t1");
        assert_eq!(task.title, "Ship it");
        assert_eq!(task.priority, Priority::High);
        assert!(task.category_id.is_none());
        assert!(task.due_date.is_some());
        assert_eq!(task.created_at, created);
        assert_eq!(task.description.as_deref(), Some("quarterly"));
    }

    #[test]
    fn test_patch_rejects_blank_title() {
        let patch = TaskPatch {
            title: Some(" ".to_string()),
            ..TaskPatch::default()
        };
        assert!(patch.validated().is_err());
    }

    #[test]
    fn test_category_validation() {
        assert!(NewCategory::new("Errands", "#aabbcc").validated().is_ok());
        assert!(NewCategory::new("Errands", "#ABC").validated().is_ok());
        assert_eq!(
            NewCategory::new("Errands", "#ABC").validated().unwrap().color,
            "#abc"
        );
        assert!(NewCategory::new("", "#aabbcc").validated().is_err());
        assert!(NewCategory::new("Errands", "blue").validated().is_err());
        assert!(NewCategory::new("Errands", "#abcd").validated().is_err());
    }

    #[test]
    fn test_touch_never_goes_backwards() {
        let future = Utc.with_ymd_and_hms(2999, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(touch(future), future);
        let past = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        assert!(touch(past) > past);
    }
}
