//! Filter predicate engine
//!
//! A record passes when every non-empty criterion holds. Absent or blank
//! criteria place no constraint on their dimension.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::state::EscalationRecord;

/// Active filter constraints for a viewing session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Exact, case-sensitive
    pub status: Option<String>,
    /// Exact, case-sensitive
    pub functional_area: Option<String>,
    /// Exact, case-sensitive
    pub business_group: Option<String>,
    /// Case-insensitive substring
    pub customer_name: Option<String>,
    /// Case-insensitive substring of the escalation manager
    pub manager: Option<String>,
    /// Inclusive lower bound on creation date
    pub created_from: Option<NaiveDate>,
    /// Inclusive upper bound on creation date
    pub created_to: Option<NaiveDate>,
}

fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn exact(criterion: &Option<String>, value: &str) -> bool {
    match active(criterion) {
        Some(wanted) => value.trim() == wanted,
        None => true,
    }
}

fn contains_ignore_case(criterion: &Option<String>, value: &str) -> bool {
    match active(criterion) {
        Some(needle) => value.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_functional_area(mut self, area: impl Into<String>) -> Self {
        self.functional_area = Some(area.into());
        self
    }

    pub fn with_business_group(mut self, group: impl Into<String>) -> Self {
        self.business_group = Some(group.into());
        self
    }

    pub fn with_customer_name(mut self, customer: impl Into<String>) -> Self {
        self.customer_name = Some(customer.into());
        self
    }

    pub fn with_manager(mut self, manager: impl Into<String>) -> Self {
        self.manager = Some(manager.into());
        self
    }

    pub fn with_created_from(mut self, from: NaiveDate) -> Self {
        self.created_from = Some(from);
        self
    }

    pub fn with_created_to(mut self, to: NaiveDate) -> Self {
        self.created_to = Some(to);
        self
    }

    /// Reset every criterion
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Number of criteria currently constraining the result
    pub fn active_count(&self) -> usize {
        [
            &self.status,
            &self.functional_area,
            &self.business_group,
            &self.customer_name,
            &self.manager,
        ]
        .into_iter()
        .filter(|c| active(c).is_some())
        .count()
            + usize::from(self.created_from.is_some())
            + usize::from(self.created_to.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Whether `record` satisfies every active criterion
    pub fn matches(&self, record: &EscalationRecord) -> bool {
        let fields = record.fields();

        exact(&self.status, fields.escalation_status.as_str())
            && exact(&self.functional_area, &fields.functional_area)
            && exact(&self.business_group, &fields.business_group)
            && contains_ignore_case(&self.customer_name, &fields.customer_name)
            && contains_ignore_case(&self.manager, &fields.escalation_manager)
            && self.matches_date(record)
    }

    fn matches_date(&self, record: &EscalationRecord) -> bool {
        if self.created_from.is_none() && self.created_to.is_none() {
            return true;
        }
        let Some(created) = record.created_date() else {
            return false;
        };

        self.created_from.map_or(true, |from| created >= from)
            && self.created_to.map_or(true, |to| created <= to)
    }

    /// Records that satisfy the criteria, in their original order
    pub fn apply<'a>(&self, records: &'a [EscalationRecord]) -> Vec<&'a EscalationRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Choices for the exact-match criteria: sorted, distinct, non-blank values
/// present in the collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub statuses: Vec<String>,
    pub functional_areas: Vec<String>,
    pub business_groups: Vec<String>,
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl FilterOptions {
    /// Built from the unfiltered collection so choices never narrow as
    /// criteria are applied
    pub fn from_records(records: &[EscalationRecord]) -> Self {
        let fields = || records.iter().map(EscalationRecord::fields);
        Self {
            statuses: distinct(fields().map(|f| f.escalation_status.as_str())),
            functional_areas: distinct(fields().map(|f| f.functional_area.as_str())),
            business_groups: distinct(fields().map(|f| f.business_group.as_str())),
        }
    }
}
