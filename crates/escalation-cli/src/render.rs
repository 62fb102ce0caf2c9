//! Terminal and JSON output

use escalation_tracker::{
    days_since, ranked, EscalationRecord, EscalationRow, EscalationView, FilterOptions,
    SummaryCounts, UNSPECIFIED,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;

const TITLE_WIDTH: usize = 32;
const CUSTOMER_WIDTH: usize = 20;

fn or_unspecified(value: &str) -> &str {
    if value.trim().is_empty() {
        UNSPECIFIED
    } else {
        value
    }
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let kept: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

pub fn row_json(row: &EscalationRow) -> Value {
    json!({
        "id": row.record.id,
        "escalationNumber": row.record.escalation_number,
        "title": row.record.fields.title,
        "escalationStatus": row.record.fields.escalation_status,
        "customerName": row.record.fields.customer_name,
        "businessGroup": row.record.fields.business_group,
        "functionalArea": row.record.fields.functional_area,
        "escalationManager": row.record.fields.escalation_manager,
        "createdAt": row.record.created_at,
        "ageDays": row.age.days(),
        "age": row.age.to_string(),
    })
}

pub fn summary_json(summary: &SummaryCounts) -> Value {
    json!({
        "total": summary.total,
        "byStatus": summary.by_status,
        "byFunctionalArea": summary.by_functional_area,
        "byBusinessGroup": summary.by_business_group,
    })
}

pub fn view_json(view: &EscalationView) -> Value {
    json!({
        "sort": view.sort.to_string(),
        "totalRecords": view.total_records,
        "rows": view.rows.iter().map(row_json).collect::<Vec<_>>(),
        "summary": summary_json(&view.summary),
    })
}

pub fn table(view: &EscalationView) -> String {
    let mut out = format!(
        "{:<6} {:<18} {:<w$} {:<10} {:<c$} {:<12} {}\n",
        "ID",
        "NUMBER",
        "TITLE",
        "STATUS",
        "CUSTOMER",
        "GROUP",
        "AGE",
        w = TITLE_WIDTH,
        c = CUSTOMER_WIDTH,
    );
    for row in &view.rows {
        let fields = &row.record.fields;
        out.push_str(&format!(
            "{:<6} {:<18} {:<w$} {:<10} {:<c$} {:<12} {}\n",
            row.record.id.to_string(),
            row.record.escalation_number.as_str(),
            clip(&fields.title, TITLE_WIDTH),
            or_unspecified(fields.escalation_status.as_str()),
            clip(&fields.customer_name, CUSTOMER_WIDTH),
            clip(or_unspecified(&fields.business_group), 12),
            row.age,
            w = TITLE_WIDTH,
            c = CUSTOMER_WIDTH,
        ));
    }
    out.push_str(&format!(
        "{} of {} escalations (sorted by {})\n",
        view.rows.len(),
        view.total_records,
        view.sort
    ));
    out
}

fn section(out: &mut String, heading: &str, counts: &BTreeMap<String, usize>) {
    out.push_str(heading);
    out.push('\n');
    for (key, count) in ranked(counts) {
        out.push_str(&format!("  {:<24} {:>5}\n", key, count));
    }
}

pub fn summary_text(summary: &SummaryCounts) -> String {
    let mut out = format!("Total: {}\n", summary.total);
    section(&mut out, "By status", &summary.by_status);
    section(&mut out, "By functional area", &summary.by_functional_area);
    section(&mut out, "By business group", &summary.by_business_group);
    out
}

fn choices(out: &mut String, heading: &str, values: &[String]) {
    let listed = if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    };
    out.push_str(&format!("{:<18} {}\n", format!("{}:", heading), listed));
}

pub fn options_text(options: &FilterOptions) -> String {
    let mut out = String::new();
    choices(&mut out, "Statuses", &options.statuses);
    choices(&mut out, "Functional areas", &options.functional_areas);
    choices(&mut out, "Business groups", &options.business_groups);
    out
}

/// Full record card for `show`
pub fn detail(record: &EscalationRecord, now: chrono::DateTime<chrono::Utc>) -> String {
    let fields = &record.fields;
    let lines = [
        ("Number", record.escalation_number.to_string()),
        ("Title", fields.title.clone()),
        ("Status", or_unspecified(fields.escalation_status.as_str()).to_string()),
        ("Trend", or_unspecified(fields.escalation_trend.as_str()).to_string()),
        ("Type", or_unspecified(fields.escalation_type.as_str()).to_string()),
        ("Age", days_since(record.created_instant(), now).to_string()),
        ("Customer", fields.customer_name.clone()),
        ("Project", fields.project_name.clone()),
        ("Reference", fields.reference_number.clone()),
        ("Business group", fields.business_group.clone()),
        ("Functional area", fields.functional_area.clone()),
        ("Product", fields.product.clone()),
        ("Manager", fields.escalation_manager.clone()),
        ("Main contact", fields.main_contact.clone()),
        ("Reason", fields.reason.clone()),
        ("De-escalation", fields.de_escalation_criteria.clone()),
        ("Current status", fields.current_status.clone()),
    ];

    let mut out = format!("#{}\n", record.id);
    for (label, value) in lines {
        out.push_str(&format!("{:<16} {}\n", format!("{}:", label), value));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use escalation_tracker::{derive_view, EscalationFields, EscalationId, EscalationNumber};
    use escalation_tracker::{FilterCriteria, SortKey};

    fn record(id: u64, title: &str) -> EscalationRecord {
        let created = Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap();
        EscalationRecord {
            id: EscalationId(id),
            escalation_number: EscalationNumber::generate(created, id),
            created_at: Some(created),
            fields: EscalationFields::titled(title),
        }
    }

    #[test]
    fn test_table_lists_rows_and_footer() {
        let now = Utc.with_ymd_and_hms(2026, 10, 3, 9, 0, 0).unwrap();
        let records = vec![record(1, "Invoice outage"), record(2, "Slow reports")];
        let view = derive_view(&records, &FilterCriteria::new(), SortKey::default(), now);

        let text = table(&view);
        assert!(text.contains("Invoice outage"));
        assert!(text.contains("2 days"));
        assert!(text.contains("2 of 2 escalations"));
        assert!(text.contains(UNSPECIFIED));
    }

    #[test]
    fn test_row_json_carries_age() {
        let now = Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap() + Duration::days(1);
        let records = vec![record(9, "Login loop")];
        let view = derive_view(&records, &FilterCriteria::new(), SortKey::default(), now);

        let value = row_json(&view.rows[0]);
        assert_eq!(value["id"], 9);
        assert_eq!(value["ageDays"], 1);
        assert_eq!(value["age"], "1 day");
    }

    #[test]
    fn test_summary_text_lists_largest_bucket_first() {
        let mut records = vec![record(1, "a"), record(2, "b"), record(3, "c")];
        records[0].fields.business_group = "Sales".to_string();
        records[1].fields.business_group = "Finance".to_string();
        records[2].fields.business_group = "Sales".to_string();
        let summary = SummaryCounts::from_records(&records);

        let text = summary_text(&summary);
        let sales = text.find("Sales").unwrap();
        let finance = text.find("Finance").unwrap();
        assert!(sales < finance, "{}", text);
    }

    #[test]
    fn test_options_text() {
        let mut records = vec![record(1, "a"), record(2, "b")];
        records[0].fields.business_group = "Sales".to_string();
        records[1].fields.business_group = "Finance".to_string();
        let text = options_text(&FilterOptions::from_records(&records));
        assert!(text.contains("Finance, Sales"));
        assert!(text.contains("(none)"));
    }

    #[test]
    fn test_clip_long_values() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("abcdefghijkl", 5).chars().count(), 5);
    }
}
