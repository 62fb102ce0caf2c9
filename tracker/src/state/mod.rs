//! Escalation data model
//!
//! - `types`: records, identifiers, enumerated fields, caller profile and role
//! - `store`: the serializable record store backing the local data sources
//! - `schema`: REST paths and snapshot versioning
//!
//! # Record lifecycle
//!
//! A record starts as a client-only draft (identified by a [`DraftId`]),
//! becomes persisted when the data source assigns its [`EscalationId`],
//! [`EscalationNumber`] and creation instant, may be edited any number of
//! times (only [`EscalationFields`] change), and is finally deleted. There is
//! no soft-delete state.

pub mod schema;
pub mod store;
pub mod types;

pub use store::StoreSnapshot;
pub use types::{
    CallerProfile, DraftId, EscalationFields, EscalationId, EscalationNumber, EscalationRecord,
    EscalationStatus, EscalationTrend, EscalationType, Role,
};
