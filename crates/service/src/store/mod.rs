use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::Update;
use crate::errors::ServiceError;

pub mod json_store;
pub mod orm_store;

pub use json_store::JsonUpdateStore;
pub use orm_store::OrmUpdateStore;

/// Uniform contract over the two persistence backends. Handlers never see
/// which one is behind it; the backend is picked once at startup from
/// configuration.
///
/// Writes are unconditional: ownership and allow-list checks happen in the
/// handler layer before the store is touched.
#[async_trait]
pub trait UpdateStore: Send + Sync {
    /// Every stored update, most-recent-first (timestamp descending).
    /// Never fails on missing backing storage; a fresh store is empty.
    async fn list_all(&self) -> Result<Vec<Update>, ServiceError>;

    /// Point lookup; `None` when no record matches (absence is not an error).
    async fn get(&self, id: &str) -> Result<Option<Update>, ServiceError>;

    async fn insert(&self, update: Update) -> Result<(), ServiceError>;

    /// Overwrite message and timestamp in place; `false` when the id is
    /// unknown. Authorship is immutable and not touched.
    async fn update_fields(
        &self,
        id: &str,
        message: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<bool, ServiceError>;

    /// Remove a record; `false` when the id is unknown.
    async fn delete(&self, id: &str) -> Result<bool, ServiceError>;
}
