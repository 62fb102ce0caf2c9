use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use escalation_tracker::{
    EscalationFields, EscalationId, FilterCriteria, SortDirection, SortField, SortKey,
};
use std::path::PathBuf;

/// Track customer escalations from the terminal.
#[derive(Parser, Debug)]
#[command(name = "escalations", author, version, about, long_about = None)]
pub struct Cli {
    /// TOML config file (values are overridden by ESCALATIONS_* env vars)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit JSON instead of tables
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List escalations matching the filters
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Sort column: title, customer, status, created, number
        #[arg(long)]
        sort: Option<SortField>,

        /// Sort descending
        #[arg(long, conflicts_with = "asc")]
        desc: bool,

        /// Sort ascending
        #[arg(long)]
        asc: bool,
    },
    /// Counts by status, functional area and business group
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show one escalation
    Show { id: EscalationId },
    /// Create an escalation
    Create {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Edit an escalation's editable fields
    Edit {
        id: EscalationId,

        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete an escalation (asks for confirmation)
    Delete {
        id: EscalationId,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y', default_value_t = false)]
        yes: bool,
    },
    /// Distinct statuses, functional areas and business groups to filter on
    Options,
    /// Save the caller profile (required on first use)
    Profile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Default business group for new escalations
        #[arg(long)]
        group: Option<String>,
        /// Default functional area for new escalations
        #[arg(long)]
        area: Option<String>,
    },
    /// Show the caller identity, role and profile
    Whoami,
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Exact status (Red, Yellow, Green, Assessment, Resolved)
    #[arg(long)]
    pub status: Option<String>,
    /// Exact functional area
    #[arg(long)]
    pub area: Option<String>,
    /// Exact business group
    #[arg(long)]
    pub group: Option<String>,
    /// Customer name contains (case-insensitive)
    #[arg(long)]
    pub customer: Option<String>,
    /// Escalation manager contains (case-insensitive)
    #[arg(long)]
    pub manager: Option<String>,
    /// Created on or after (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Created on or before (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl FilterArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            status: self.status.clone(),
            functional_area: self.area.clone(),
            business_group: self.group.clone(),
            customer_name: self.customer.clone(),
            manager: self.manager.clone(),
            created_from: self.from,
            created_to: self.to,
        }
    }
}

/// Editable fields; omitted flags leave the current value unchanged
#[derive(Args, Debug, Default)]
pub struct FieldArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub reason: Option<String>,
    #[arg(long = "de-escalation")]
    pub de_escalation_criteria: Option<String>,
    /// Current-status narrative
    #[arg(long = "narrative")]
    pub current_status: Option<String>,
    #[arg(long)]
    pub manager: Option<String>,
    #[arg(long)]
    pub area: Option<String>,
    /// Up, Down or NoChange
    #[arg(long)]
    pub trend: Option<String>,
    /// Red, Yellow, Green, Assessment or Resolved
    #[arg(long)]
    pub status: Option<String>,
    /// Corp, Proactive, Other or free text
    #[arg(long = "type")]
    pub escalation_type: Option<String>,
    #[arg(long)]
    pub contact: Option<String>,
    #[arg(long)]
    pub customer: Option<String>,
    #[arg(long)]
    pub project: Option<String>,
    #[arg(long)]
    pub reference: Option<String>,
    #[arg(long)]
    pub group: Option<String>,
    #[arg(long)]
    pub product: Option<String>,
}

fn set(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

impl FieldArgs {
    pub fn apply(&self, fields: &mut EscalationFields) {
        set(&mut fields.title, &self.title);
        set(&mut fields.reason, &self.reason);
        set(&mut fields.de_escalation_criteria, &self.de_escalation_criteria);
        set(&mut fields.current_status, &self.current_status);
        set(&mut fields.escalation_manager, &self.manager);
        set(&mut fields.functional_area, &self.area);
        set(&mut fields.main_contact, &self.contact);
        set(&mut fields.customer_name, &self.customer);
        set(&mut fields.project_name, &self.project);
        set(&mut fields.reference_number, &self.reference);
        set(&mut fields.business_group, &self.group);
        set(&mut fields.product, &self.product);

        if let Some(trend) = &self.trend {
            fields.escalation_trend = trend.as_str().into();
        }
        if let Some(status) = &self.status {
            fields.escalation_status = status.as_str().into();
        }
        if let Some(kind) = &self.escalation_type {
            fields.escalation_type = kind.as_str().into();
        }
    }
}

/// Only an explicit yes confirms a destructive action
pub fn confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Resolve the listing order from flags and the configured default
pub fn resolve_sort(default: SortKey, field: Option<SortField>, desc: bool, asc: bool) -> SortKey {
    let mut key = match field {
        Some(field) => SortKey::new(field, SortDirection::Ascending),
        None => default,
    };
    if desc {
        key.direction = SortDirection::Descending;
    } else if asc {
        key.direction = SortDirection::Ascending;
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use escalation_tracker::EscalationStatus;

    #[test]
    fn test_parse_list_with_filters() {
        let cli = Cli::parse_from([
            "escalations",
            "list",
            "--group",
            "Finance",
            "--customer",
            "acme",
            "--from",
            "2026-10-01",
            "--sort",
            "status",
            "--desc",
        ]);
        match cli.command {
            Command::List {
                filter, sort, desc, ..
            } => {
                let criteria = filter.criteria();
                assert_eq!(criteria.business_group.as_deref(), Some("Finance"));
                assert_eq!(criteria.customer_name.as_deref(), Some("acme"));
                assert_eq!(criteria.created_from, NaiveDate::from_ymd_opt(2026, 10, 1));
                assert_eq!(sort, Some(SortField::EscalationStatus));
                assert!(desc);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_field_args_only_touch_given_flags() {
        let mut fields = EscalationFields::titled("Keep");
        fields.product = "Ledger".to_string();

        let args = FieldArgs {
            status: Some("Yellow".to_string()),
            customer: Some("Globex".to_string()),
            ..Default::default()
        };
        args.apply(&mut fields);

        assert_eq!(fields.title, "Keep");
        assert_eq!(fields.product, "Ledger");
        assert_eq!(fields.customer_name, "Globex");
        assert_eq!(fields.escalation_status, EscalationStatus::Yellow);
    }

    #[test]
    fn test_resolve_sort() {
        let default = SortKey::default();
        assert_eq!(resolve_sort(default, None, false, false), default);
        assert_eq!(
            resolve_sort(default, None, false, true).direction,
            SortDirection::Ascending
        );
        assert_eq!(
            resolve_sort(default, Some(SortField::Title), false, false),
            SortKey::new(SortField::Title, SortDirection::Ascending)
        );
    }

    #[test]
    fn test_delete_confirms_unless_yes() {
        let cli = Cli::parse_from(["escalations", "delete", "7"]);
        assert!(matches!(cli.command, Command::Delete { yes: false, .. }));

        let cli = Cli::parse_from(["escalations", "delete", "7", "--yes"]);
        assert!(matches!(cli.command, Command::Delete { id, yes: true } if id == EscalationId(7)));
    }

    #[test]
    fn test_confirmation_answers() {
        assert!(confirmed("y\n"));
        assert!(confirmed(" YES "));
        assert!(!confirmed("\n"));
        assert!(!confirmed("no"));
    }

    #[test]
    fn test_show_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["escalations", "show", "abc"]).is_err());
    }
}
