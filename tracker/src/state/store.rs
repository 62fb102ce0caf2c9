//! Record store shared by the local data sources
//!
//! `StoreSnapshot` owns the records and the id/number allocators. It is
//! serializable as one JSON document so the file source can persist it as is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::schema::SNAPSHOT_VERSION;
use super::types::*;

/// Complete contents of a local store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub version: u32,

    /// Next id to hand out; ids are never reused
    pub next_id: u64,

    /// Next escalation-number sequence; never reused
    pub next_sequence: u64,

    #[serde(default)]
    pub records: BTreeMap<EscalationId, EscalationRecord>,

    #[serde(default)]
    pub profiles: BTreeMap<String, CallerProfile>,

    #[serde(default)]
    pub roles: BTreeMap<String, Role>,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            next_id: 1,
            next_sequence: 1,
            records: BTreeMap::new(),
            profiles: BTreeMap::new(),
            roles: BTreeMap::new(),
        }
    }
}

impl StoreSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in id order
    pub fn list(&self) -> Vec<EscalationRecord> {
        self.records.values().cloned().collect()
    }

    pub fn get(&self, id: EscalationId) -> Option<&EscalationRecord> {
        self.records.get(&id)
    }

    /// Insert a new record, assigning id, escalation number and timestamp
    pub fn insert(&mut self, fields: EscalationFields, now: DateTime<Utc>) -> &EscalationRecord {
        let id = EscalationId(self.next_id);
        self.next_id += 1;

        let number = EscalationNumber::generate(now, self.next_sequence);
        self.next_sequence += 1;

        let record = EscalationRecord {
            id,
            escalation_number: number,
            created_at: Some(now),
            fields,
        };
        self.records.entry(id).or_insert(record)
    }

    /// Replace the editable fields of an existing record.
    ///
    /// Returns `false` when the id is unknown.
    pub fn update(&mut self, id: EscalationId, fields: EscalationFields) -> bool {
        match self.records.get_mut(&id) {
            Some(record) => {
                record.apply(fields);
                true
            }
            None => false,
        }
    }

    /// Remove a record. Returns `false` when the id is unknown.
    pub fn remove(&mut self, id: EscalationId) -> bool {
        self.records.remove(&id).is_some()
    }

    pub fn profile(&self, subject: &str) -> Option<&CallerProfile> {
        self.profiles.get(subject)
    }

    pub fn put_profile(&mut self, subject: &str, profile: CallerProfile) {
        self.profiles.insert(subject.to_string(), profile);
    }

    /// Role for a subject; subjects without an assignment are viewers
    pub fn role(&self, subject: &str) -> Role {
        self.roles.get(subject).cloned().unwrap_or_default()
    }

    pub fn put_role(&mut self, subject: &str, role: Role) {
        self.roles.insert(subject.to_string(), role);
    }
}
