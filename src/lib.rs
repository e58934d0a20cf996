// TaskFlow - personal task manager: in-memory store, view engine, REST API

pub mod api;
pub mod bulk;
pub mod config;
pub mod filter;
pub mod models;
pub mod record;
pub mod reorder;
pub mod sort;
pub mod store;
pub mod view;

// Re-export main types for convenience
pub use filter::{ActiveFilter, Filter, TaskFilter};
pub use models::{Category, NewCategory, NewTask, Priority, Task, TaskPatch, TaskWithCategory};
pub use record::Record;
pub use reorder::DragSession;
pub use sort::SortBy;
pub use store::Store;
pub use view::{ViewState, apply_view};
