//! Query engine property tests: deterministic sweeps over generated
//! collections and criteria combinations.
//!
//! Tests verify:
//! - Adding a filter constraint never grows the matching set
//! - Every summary dimension sums to the filtered record count
//! - Sorting is idempotent and stable for every field and direction
//! - Escalation age is reproducible under a frozen clock
//! - The documented filter and sort scenarios

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use escalation_tracker::{
    days_since, derive_view, sort_records, Age, EscalationFields, EscalationId, EscalationNumber,
    EscalationRecord, EscalationStatus, FilterCriteria, SortDirection, SortField, SortKey,
    SummaryCounts, UNSPECIFIED,
};

const STATUSES: &[&str] = &["Red", "Yellow", "Green", "Assessment", "Resolved", ""];
const AREAS: &[&str] = &["Network", "Storage", "Billing", ""];
const GROUPS: &[&str] = &["Finance", "Sales", "Ops"];
const CUSTOMERS: &[&str] = &["ACME Corp", "acme", "Globex", "Initech", ""];
const MANAGERS: &[&str] = &["Dana Whitfield", "Lee Park", ""];
const TITLES: &[&str] = &["Login outage", "billing drift", "Latency", "latency", "Backup gap"];

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
}

/// Build N records cycling through the value tables at co-prime strides.
fn collection(count: usize) -> Vec<EscalationRecord> {
    (0..count)
        .map(|i| {
            let created = if i % 11 == 10 {
                None
            } else {
                Some(now() - Duration::hours((i as i64 * 17) % 400))
            };
            EscalationRecord {
                id: EscalationId(i as u64 + 1),
                escalation_number: EscalationNumber::generate(now(), (i as u64 * 7) % 13),
                created_at: created,
                fields: EscalationFields {
                    title: TITLES[i % TITLES.len()].to_string(),
                    escalation_status: EscalationStatus::from(STATUSES[i % STATUSES.len()]),
                    functional_area: AREAS[(i * 3) % AREAS.len()].to_string(),
                    business_group: GROUPS[(i * 5) % GROUPS.len()].to_string(),
                    customer_name: CUSTOMERS[(i * 7) % CUSTOMERS.len()].to_string(),
                    escalation_manager: MANAGERS[i % MANAGERS.len()].to_string(),
                    ..Default::default()
                },
            }
        })
        .collect()
}

type Constraint = Box<dyn Fn(FilterCriteria) -> FilterCriteria>;

/// Constraints applied one at a time, in order
fn constraint_chain() -> Vec<Constraint> {
    let day = |d| NaiveDate::from_ymd_opt(2026, 10, d).unwrap();

    let mut chain: Vec<Constraint> = Vec::new();
    chain.push(Box::new(|c: FilterCriteria| c.with_business_group("Finance")));
    chain.push(Box::new(|c: FilterCriteria| c.with_customer_name("ac")));
    chain.push(Box::new(move |c: FilterCriteria| c.with_created_from(day(4))));
    chain.push(Box::new(|c: FilterCriteria| c.with_manager("dana")));
    chain.push(Box::new(move |c: FilterCriteria| c.with_created_to(day(15))));
    chain.push(Box::new(|c: FilterCriteria| c.with_status("Red")));
    chain.push(Box::new(|c: FilterCriteria| c.with_functional_area("Network")));
    chain
}

fn matching_ids(records: &[EscalationRecord], criteria: &FilterCriteria) -> Vec<u64> {
    criteria.apply(records).iter().map(|r| r.id.0).collect()
}

// ── Property: filtering is monotonic ───────────────────────────────

#[test]
fn prop_adding_constraint_never_grows_match_set() {
    let records = collection(120);
    let chain = constraint_chain();

    // Every starting offset so each constraint is also tested first
    for start in 0..chain.len() {
        let mut criteria = FilterCriteria::new();
        let mut previous = matching_ids(&records, &criteria);
        assert_eq!(previous.len(), records.len());

        for step in 0..chain.len() {
            let add = &chain[(start + step) % chain.len()];
            criteria = add(criteria);
            let current = matching_ids(&records, &criteria);

            assert!(current.len() <= previous.len());
            assert!(
                current.iter().all(|id| previous.contains(id)),
                "constraint {} widened the match set",
                (start + step) % chain.len()
            );
            previous = current;
        }
    }
}

// ── Property: summary closure ──────────────────────────────────────

#[test]
fn prop_summary_dimensions_sum_to_filtered_count() {
    for count in [0, 1, 7, 30, 120] {
        let records = collection(count);
        let mut criteria = FilterCriteria::new();

        for add in constraint_chain() {
            let filtered = criteria.apply(&records);
            let summary = SummaryCounts::from_records(filtered.iter().copied());

            assert_eq!(summary.total, filtered.len());
            assert_eq!(summary.by_status.values().sum::<usize>(), filtered.len());
            assert_eq!(summary.by_functional_area.values().sum::<usize>(), filtered.len());
            assert_eq!(summary.by_business_group.values().sum::<usize>(), filtered.len());
            assert!(summary.is_consistent());

            criteria = add(criteria);
        }
    }
}

#[test]
fn prop_view_summary_independent_of_sort() {
    let records = collection(60);
    let criteria = FilterCriteria::new().with_customer_name("a");
    let baseline = derive_view(&records, &criteria, SortKey::default(), now()).summary;

    for field in all_fields() {
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let view = derive_view(&records, &criteria, SortKey::new(field, direction), now());
            assert_eq!(view.summary, baseline);
        }
    }
}

#[test]
fn prop_summary_bucket_drills_down_to_same_count() {
    let mut records = collection(80);
    // Stray whitespace must not split a bucket from its filter
    for (i, record) in records.iter_mut().enumerate() {
        if i % 4 == 0 {
            record.fields.business_group.push(' ');
            record.fields.functional_area.insert(0, ' ');
        }
    }
    let summary = SummaryCounts::from_records(records.iter());

    for (group, count) in summary.by_business_group.iter().filter(|(k, _)| *k != UNSPECIFIED) {
        let criteria = FilterCriteria::new().with_business_group(group.as_str());
        assert_eq!(criteria.apply(&records).len(), *count, "group {:?}", group);
    }
    for (area, count) in summary.by_functional_area.iter().filter(|(k, _)| *k != UNSPECIFIED) {
        let criteria = FilterCriteria::new().with_functional_area(area.as_str());
        assert_eq!(criteria.apply(&records).len(), *count, "area {:?}", area);
    }
    for (status, count) in summary.by_status.iter().filter(|(k, _)| *k != UNSPECIFIED) {
        let criteria = FilterCriteria::new().with_status(status.as_str());
        assert_eq!(criteria.apply(&records).len(), *count, "status {:?}", status);
    }
}

// ── Property: sorting is idempotent and stable ─────────────────────

fn all_fields() -> [SortField; 5] {
    [
        SortField::Title,
        SortField::CustomerName,
        SortField::EscalationStatus,
        SortField::CreatedDate,
        SortField::EscalationNumber,
    ]
}

#[test]
fn prop_sort_is_idempotent() {
    let records = collection(90);
    for field in all_fields() {
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let key = SortKey::new(field, direction);
            let mut once = records.clone();
            sort_records(&mut once, key);
            let mut twice = once.clone();
            sort_records(&mut twice, key);
            assert_eq!(once, twice, "{:?} {:?} not idempotent", field, direction);
        }
    }
}

#[test]
fn prop_sort_ties_keep_input_order() {
    let records = collection(90);
    for field in all_fields() {
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let key = SortKey::new(field, direction);
            let mut sorted = records.clone();
            sort_records(&mut sorted, key);

            for pair in sorted.windows(2) {
                assert_ne!(key.compare(&pair[0], &pair[1]), std::cmp::Ordering::Greater);
                if key.compare(&pair[0], &pair[1]) == std::cmp::Ordering::Equal {
                    // ids were assigned in input order
                    assert!(pair[0].id < pair[1].id, "tie reordered under {:?}", key);
                }
            }
        }
    }
}

#[test]
fn prop_toggle_reverses_distinct_keys_exactly() {
    let mut records = collection(5);
    for (i, record) in records.iter_mut().enumerate() {
        record.fields.title = format!("title-{}", i);
    }

    let mut key = SortKey::new(SortField::Title, SortDirection::Ascending);
    let mut ascending = records.clone();
    sort_records(&mut ascending, key);

    key.select(SortField::Title);
    let mut descending = records;
    sort_records(&mut descending, key);

    descending.reverse();
    assert_eq!(ascending, descending);
}

// ── Property: age is reproducible ──────────────────────────────────

#[test]
fn prop_age_deterministic_under_frozen_clock() {
    for record in collection(50) {
        let first = days_since(record.created_at, now());
        let second = days_since(record.created_at, now());
        assert_eq!(first, second);
        match record.created_at {
            None => assert_eq!(first, Age::NotCreated),
            Some(ts) => assert_eq!(first.days(), Some(((now() - ts).num_hours() / 24) as u64)),
        }
    }
}

// ── Scenarios ──────────────────────────────────────────────────────

#[test]
fn scenario_three_days_two_hours() {
    let created = now() - Duration::days(3) - Duration::hours(2);
    let age = days_since(Some(created), now());
    assert_eq!(age, Age::Days(3));
    assert_eq!(age.to_string(), "3 days");
}

#[test]
fn scenario_unset_created_at() {
    let age = days_since(None, now());
    assert_eq!(age, Age::NotCreated);
    assert_eq!(age.to_string(), "Not yet created");
}

#[test]
fn scenario_finance_acme_filter() {
    let make = |id, group: &str, customer: &str| EscalationRecord {
        id: EscalationId(id),
        escalation_number: EscalationNumber::generate(now(), id),
        created_at: Some(now()),
        fields: EscalationFields {
            business_group: group.to_string(),
            customer_name: customer.to_string(),
            ..Default::default()
        },
    };
    let records = vec![
        make(1, "Finance", "ACME Corp"),
        make(2, "Finance", "Other"),
        make(3, "Sales", "Acme"),
    ];
    let criteria = FilterCriteria::new()
        .with_business_group("Finance")
        .with_customer_name("acme");

    assert_eq!(matching_ids(&records, &criteria), vec![1]);
}

#[test]
fn scenario_status_sort_and_toggle() {
    let records: Vec<EscalationRecord> = ["Yellow", "Red", "Green"]
        .iter()
        .enumerate()
        .map(|(i, status)| EscalationRecord {
            id: EscalationId(i as u64 + 1),
            escalation_number: EscalationNumber::generate(now(), i as u64 + 1),
            created_at: Some(now()),
            fields: EscalationFields {
                escalation_status: EscalationStatus::from(*status),
                ..Default::default()
            },
        })
        .collect();

    let statuses = |rs: &[EscalationRecord]| -> Vec<String> {
        rs.iter()
            .map(|r| r.fields.escalation_status.to_string())
            .collect()
    };

    let mut key = SortKey::default();
    key.select(SortField::EscalationStatus);
    let mut sorted = records.clone();
    sort_records(&mut sorted, key);
    assert_eq!(statuses(&sorted), vec!["Green", "Red", "Yellow"]);

    key.select(SortField::EscalationStatus);
    sort_records(&mut sorted, key);
    assert_eq!(statuses(&sorted), vec!["Yellow", "Red", "Green"]);
}
