//! Summary counts over a filtered escalation set
//!
//! Blank category values are counted under [`UNSPECIFIED`] so every record
//! lands in exactly one bucket per dimension.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::state::EscalationRecord;

/// Bucket label for blank category values
pub const UNSPECIFIED: &str = "Unspecified";

/// Per-dimension record counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCounts {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_functional_area: BTreeMap<String, usize>,
    pub by_business_group: BTreeMap<String, usize>,
}

fn bucket(map: &mut BTreeMap<String, usize>, value: &str) {
    let key = match value.trim() {
        "" => UNSPECIFIED,
        key => key,
    };
    *map.entry(key.to_string()).or_insert(0) += 1;
}

impl SummaryCounts {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a EscalationRecord>,
    {
        let mut summary = Self::default();
        for record in records {
            let fields = record.fields();
            summary.total += 1;
            bucket(&mut summary.by_status, fields.escalation_status.as_str());
            bucket(&mut summary.by_functional_area, &fields.functional_area);
            bucket(&mut summary.by_business_group, &fields.business_group);
        }
        summary
    }

    /// Count for one status label, zero if absent
    pub fn status_count(&self, status: &str) -> usize {
        self.by_status.get(status).copied().unwrap_or(0)
    }

    /// Every dimension sums to the total
    pub fn is_consistent(&self) -> bool {
        [
            &self.by_status,
            &self.by_functional_area,
            &self.by_business_group,
        ]
        .iter()
        .all(|map| map.values().sum::<usize>() == self.total)
    }
}

/// Buckets ordered by count, highest first; equal counts keep label order
pub fn ranked(counts: &BTreeMap<String, usize>) -> Vec<(&str, usize)> {
    let mut ranked: Vec<(&str, usize)> = counts
        .iter()
        .map(|(label, count)| (label.as_str(), *count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}
