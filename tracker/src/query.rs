//! Escalation query facade
//!
//! Composes filter → summarize → sort over the raw collection. The derived
//! view is a pure function of `(records, criteria, sort key, now)`; the
//! facade memoizes the last result by a generation counter that every input
//! change bumps, but nothing depends on the cache being present.
//!
//! Summaries are computed from the filtered subset before sorting, so the
//! display order never affects counts.

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::age::{days_since, Age};
use crate::filter::{FilterCriteria, FilterOptions};
use crate::sort::{sort_refs, SortField, SortKey};
use crate::state::{EscalationId, EscalationRecord};
use crate::summary::SummaryCounts;

/// One display row: a record plus its derived age
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationRow {
    pub record: EscalationRecord,
    pub age: Age,
}

/// Derived view over the current collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationView {
    /// Filtered rows in display order
    pub rows: Vec<EscalationRow>,
    /// Counts over the same filtered rows
    pub summary: SummaryCounts,
    /// Size of the unfiltered collection
    pub total_records: usize,
    pub sort: SortKey,
    pub evaluated_at: DateTime<Utc>,
}

impl EscalationView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ids(&self) -> Vec<EscalationId> {
        self.rows.iter().map(|row| row.record.id).collect()
    }
}

/// Build the derived view from scratch
pub fn derive_view(
    records: &[EscalationRecord],
    criteria: &FilterCriteria,
    sort: SortKey,
    now: DateTime<Utc>,
) -> EscalationView {
    let mut filtered = criteria.apply(records);
    let summary = SummaryCounts::from_records(filtered.iter().copied());
    sort_refs(&mut filtered, sort);

    let rows = filtered
        .into_iter()
        .map(|record| EscalationRow {
            age: days_since(record.created_instant(), now),
            record: record.clone(),
        })
        .collect();

    EscalationView {
        rows,
        summary,
        total_records: records.len(),
        sort,
        evaluated_at: now,
    }
}

/// Session-held query state: raw collection, criteria and sort key
#[derive(Debug, Default)]
pub struct EscalationQuery {
    records: Vec<EscalationRecord>,
    criteria: FilterCriteria,
    sort: SortKey,
    generation: u64,
    cached: Option<(u64, DateTime<Utc>, EscalationView)>,
}

impl EscalationQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.cached = None;
    }

    /// Replace the raw collection with a fresh fetch
    pub fn set_records(&mut self, records: Vec<EscalationRecord>) {
        self.records = records;
        self.invalidate();
    }

    /// Drop the raw collection (no partial data after a failed fetch)
    pub fn clear_records(&mut self) {
        self.records.clear();
        self.invalidate();
    }

    pub fn records(&self) -> &[EscalationRecord] {
        &self.records
    }

    pub fn find(&self, id: EscalationId) -> Option<&EscalationRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.invalidate();
    }

    /// Edit criteria in place
    pub fn update_criteria(&mut self, f: impl FnOnce(&mut FilterCriteria)) {
        f(&mut self.criteria);
        self.invalidate();
    }

    pub fn clear_criteria(&mut self) {
        self.criteria.clear();
        self.invalidate();
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.invalidate();
    }

    /// Column selection: same field flips direction, new field starts ascending
    pub fn select_sort(&mut self, field: SortField) {
        self.sort.select(field);
        self.invalidate();
    }

    /// Bumped by every input change
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a memoized view exists for the current inputs at `now`
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        matches!(
            &self.cached,
            Some((generation, at, _)) if *generation == self.generation && *at == now
        )
    }

    /// Distinct filter choices over the unfiltered collection
    pub fn options(&self) -> FilterOptions {
        FilterOptions::from_records(&self.records)
    }

    /// Current derived view, recomputed when any input changed
    pub fn view(&mut self, now: DateTime<Utc>) -> &EscalationView {
        if !self.is_current(now) {
            self.cached = None;
        }

        let generation = self.generation;
        let (_, _, view) = self.cached.get_or_insert_with(|| {
            trace!(generation, "Recomputing escalation view");
            (
                generation,
                now,
                derive_view(&self.records, &self.criteria, self.sort, now),
            )
        });
        view
    }
}
