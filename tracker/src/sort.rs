//! Sort engine for escalation listings
//!
//! Ordering is stable in both directions: descending reverses the comparator,
//! not the sequence, so equal keys keep their incoming relative order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::state::EscalationRecord;

/// Sortable column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Title,
    CustomerName,
    EscalationStatus,
    CreatedDate,
    EscalationNumber,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::CustomerName => "customer",
            Self::EscalationStatus => "status",
            Self::CreatedDate => "created",
            Self::EscalationNumber => "number",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "customer" | "customer_name" => Ok(Self::CustomerName),
            "status" | "escalation_status" => Ok(Self::EscalationStatus),
            "created" | "created_date" | "date" => Ok(Self::CreatedDate),
            "number" | "escalation_number" => Ok(Self::EscalationNumber),
            other => Err(format!("unknown sort field: {}", other)),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(format!("unknown sort direction: {}", other)),
        }
    }
}

/// Active sort column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortKey {
    /// Newest first
    fn default() -> Self {
        Self {
            field: SortField::CreatedDate,
            direction: SortDirection::Descending,
        }
    }
}

impl SortKey {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Column header click: same field flips, a new field starts ascending
    pub fn select(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Ascending;
        }
    }

    /// Compare two records under this key
    pub fn compare(&self, a: &EscalationRecord, b: &EscalationRecord) -> Ordering {
        let ordering = compare_field(self.field, a, b);
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Parses `field` or `field:direction`, e.g. `created:desc`
impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((field, direction)) => Ok(Self::new(field.parse()?, direction.parse()?)),
            None => Ok(Self::new(s.parse()?, SortDirection::Ascending)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        write!(f, "{}:{}", self.field, direction)
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn compare_field(field: SortField, a: &EscalationRecord, b: &EscalationRecord) -> Ordering {
    match field {
        SortField::Title => compare_text(&a.fields.title, &b.fields.title),
        SortField::CustomerName => compare_text(&a.fields.customer_name, &b.fields.customer_name),
        SortField::EscalationStatus => compare_text(
            a.fields.escalation_status.as_str(),
            b.fields.escalation_status.as_str(),
        ),
        SortField::CreatedDate => a.created_instant().cmp(&b.created_instant()),
        SortField::EscalationNumber => {
            compare_text(a.escalation_number.as_str(), b.escalation_number.as_str())
        }
    }
}

/// Stable in-place sort
pub fn sort_records(records: &mut [EscalationRecord], key: SortKey) {
    records.sort_by(|a, b| key.compare(a, b));
}

/// Stable sort over borrowed records
pub fn sort_refs(records: &mut [&EscalationRecord], key: SortKey) {
    records.sort_by(|a, b| key.compare(a, b));
}
