//! Escalation Tracker Library
//!
//! This library provides:
//! - The escalation record model with write-once id, number and creation time
//! - Data sources (in-memory, JSON file, REST) behind one async trait
//! - The query engine: filter predicates, summary counts, stable sorting and
//!   derived escalation age
//! - An authenticated session that bootstraps the caller profile and keeps
//!   derived views in step with every mutation
//!
//! # Usage
//!
//! ```ignore
//! use escalation_tracker::{Identity, JsonFileSource, Session};
//! use std::sync::Arc;
//!
//! let source = Arc::new(JsonFileSource::open("escalations.json"));
//! let mut session = Session::new(source, Identity::authenticated("jane"));
//! session.bootstrap().await?;
//! session.refresh().await?;
//!
//! session.query_mut().update_criteria(|c| c.business_group = Some("Finance".into()));
//! let view = session.view();
//! println!("{} escalations, {} red", view.rows.len(), view.summary.status_count("Red"));
//! ```

#![allow(clippy::uninlined_format_args)]

pub mod age;
pub mod config;
pub mod error;
pub mod filter;
pub mod form;
pub mod query;
pub mod session;
pub mod sort;
pub mod source;
pub mod state;
pub mod summary;

pub use age::{days_since, Age, Clock, FixedClock, SystemClock};
pub use config::{SourceConfig, TrackerConfig};
pub use error::{TrackerError, TrackerResult};
pub use filter::{FilterCriteria, FilterOptions};
pub use form::{EscalationForm, FormTarget};
pub use query::{derive_view, EscalationQuery, EscalationRow, EscalationView};
pub use session::{Bootstrap, Identity, LoadState, Session};
pub use sort::{sort_records, SortDirection, SortField, SortKey};
pub use source::{EscalationSource, HttpSource, JsonFileSource, MemorySource, SharedSource};
pub use state::{
    CallerProfile, DraftId, EscalationFields, EscalationId, EscalationNumber, EscalationRecord,
    EscalationStatus, EscalationTrend, EscalationType, Role, StoreSnapshot,
};
pub use summary::{ranked, SummaryCounts, UNSPECIFIED};
