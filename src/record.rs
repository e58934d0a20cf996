// Record trait for entities held in a store collection

use serde::{Deserialize, Serialize};

/// Core trait that any storable entity must implement
pub trait Record: Serialize + for<'de> Deserialize<'de> + Clone + Send + Sync + 'static {
    /// Unique identifier for this record
    fn id(&self) -> &str;

    /// Collection name for this record type (e.g., "tasks", "categories")
    /// Used as the `collection` field in store logs
    fn collection_name() -> &'static str
    where
        Self: Sized;

    /// Singular noun for this record type, used in not-found messages
    fn kind() -> &'static str
    where
        Self: Sized;
}
