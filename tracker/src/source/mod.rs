//! Data sources for escalation records
//!
//! The query engine treats a source as an async fetch of the complete
//! collection; there is no server-side filtering or pagination. Sources must
//! return stable identifiers: records are never keyed by position.
//!
//! Implementations:
//! - [`MemorySource`]: process-local, used by tests and demos
//! - [`JsonFileSource`]: single JSON document on disk
//! - [`HttpSource`]: REST backend over reqwest

pub mod file;
pub mod http;
pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::TrackerResult;
use crate::state::{CallerProfile, EscalationFields, EscalationId, EscalationRecord, Role};

pub use file::JsonFileSource;
pub use http::HttpSource;
pub use memory::MemorySource;

/// Shared reference to a data source
pub type SharedSource = Arc<dyn EscalationSource>;

/// CRUD and caller-metadata operations offered by a backend.
///
/// `create` and `update` take [`EscalationFields`], so the id, escalation
/// number and creation instant can only ever be set by the source itself.
#[async_trait]
pub trait EscalationSource: Send + Sync {
    /// Full collection
    async fn list(&self) -> TrackerResult<Vec<EscalationRecord>>;

    /// One record; `None` when the id is unknown
    async fn get(&self, id: EscalationId) -> TrackerResult<Option<EscalationRecord>>;

    /// Persist a new record and return its assigned id
    async fn create(&self, fields: EscalationFields) -> TrackerResult<EscalationId>;

    /// Replace the editable fields of a record
    async fn update(&self, id: EscalationId, fields: EscalationFields) -> TrackerResult<()>;

    async fn delete(&self, id: EscalationId) -> TrackerResult<()>;

    async fn caller_profile(&self, subject: &str) -> TrackerResult<Option<CallerProfile>>;

    async fn save_caller_profile(&self, subject: &str, profile: CallerProfile)
        -> TrackerResult<()>;

    async fn caller_role(&self, subject: &str) -> TrackerResult<Role>;
}
