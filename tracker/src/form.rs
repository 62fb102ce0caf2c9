//! Draft and edit form state
//!
//! A form only ever holds [`EscalationFields`]; editing an existing record
//! copies its editable projection, so the id, escalation number and creation
//! instant cannot travel back to the source.

use crate::error::{TrackerError, TrackerResult};
use crate::state::{CallerProfile, DraftId, EscalationFields, EscalationId, EscalationRecord};

/// What the form is editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    /// Client-only record, not yet persisted
    Draft(DraftId),
    /// Existing record
    Existing(EscalationId),
}

/// Form state for creating or editing an escalation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationForm {
    pub target: FormTarget,
    pub fields: EscalationFields,
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

impl EscalationForm {
    /// Blank draft, pre-filled with the caller's default group and area
    pub fn new_draft(profile: Option<&CallerProfile>) -> Self {
        let mut fields = EscalationFields::default();
        if let Some(profile) = profile {
            fields.business_group = profile.default_business_group.clone().unwrap_or_default();
            fields.functional_area = profile.default_functional_area.clone().unwrap_or_default();
        }
        Self {
            target: FormTarget::Draft(DraftId::new()),
            fields,
        }
    }

    /// Form for an existing record, carrying only its editable fields
    pub fn edit(record: &EscalationRecord) -> Self {
        Self {
            target: FormTarget::Existing(record.id),
            fields: record.fields().clone(),
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self.target, FormTarget::Draft(_))
    }

    /// Trim every text field and check required ones
    pub fn validate(&self) -> TrackerResult<EscalationFields> {
        let f = &self.fields;
        let fields = EscalationFields {
            title: trimmed(&f.title),
            reason: trimmed(&f.reason),
            de_escalation_criteria: trimmed(&f.de_escalation_criteria),
            current_status: trimmed(&f.current_status),
            escalation_manager: trimmed(&f.escalation_manager),
            functional_area: trimmed(&f.functional_area),
            escalation_trend: f.escalation_trend.clone(),
            escalation_status: f.escalation_status.clone(),
            escalation_type: f.escalation_type.clone(),
            main_contact: trimmed(&f.main_contact),
            customer_name: trimmed(&f.customer_name),
            project_name: trimmed(&f.project_name),
            reference_number: trimmed(&f.reference_number),
            business_group: trimmed(&f.business_group),
            product: trimmed(&f.product),
        };

        if fields.title.is_empty() {
            return Err(TrackerError::validation("title", "is required"));
        }
        Ok(fields)
    }
}
