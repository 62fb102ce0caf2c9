//! Core types for escalation records
//!
//! These types cross the data-source boundary. Enumerated fields are closed
//! enums with a fallback variant that keeps unrecognized wire values intact.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Persisted identifier assigned by the data source at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EscalationId(pub u64);

impl fmt::Display for EscalationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EscalationId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(EscalationId)
    }
}

/// Client-side marker for a record that has not been persisted yet.
///
/// Deliberately not convertible into an [`EscalationId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DraftId(uuid::Uuid);

impl DraftId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for DraftId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "draft-{}", self.0)
    }
}

/// Human-facing display identifier, e.g. `ESC-20261016-0007`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EscalationNumber(String);

impl EscalationNumber {
    /// Build the number for the `sequence`-th record created on `created_at`'s date.
    pub fn generate(created_at: DateTime<Utc>, sequence: u64) -> Self {
        Self(format!("ESC-{}-{:04}", created_at.format("%Y%m%d"), sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EscalationNumber {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for EscalationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escalation health status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EscalationStatus {
    Red,
    Yellow,
    Green,
    Assessment,
    Resolved,
    /// Unrecognized value as received; empty means unspecified
    Unknown(String),
}

impl EscalationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Red => "Red",
            Self::Yellow => "Yellow",
            Self::Green => "Green",
            Self::Assessment => "Assessment",
            Self::Resolved => "Resolved",
            Self::Unknown(raw) => raw,
        }
    }
}

impl Default for EscalationStatus {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl From<&str> for EscalationStatus {
    fn from(value: &str) -> Self {
        match value.trim() {
            "Red" => Self::Red,
            "Yellow" => Self::Yellow,
            "Green" => Self::Green,
            "Assessment" => Self::Assessment,
            "Resolved" => Self::Resolved,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for EscalationStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<EscalationStatus> for String {
    fn from(value: EscalationStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for EscalationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction the escalation is heading
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EscalationTrend {
    Up,
    Down,
    NoChange,
    Unknown(String),
}

impl EscalationTrend {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::NoChange => "NoChange",
            Self::Unknown(raw) => raw,
        }
    }
}

impl Default for EscalationTrend {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl From<&str> for EscalationTrend {
    fn from(value: &str) -> Self {
        match value.trim() {
            "Up" => Self::Up,
            "Down" => Self::Down,
            "NoChange" | "No Change" => Self::NoChange,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for EscalationTrend {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<EscalationTrend> for String {
    fn from(value: EscalationTrend) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for EscalationTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Origin of the escalation. Free text outside the known values is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EscalationType {
    Corp,
    Proactive,
    Other,
    Custom(String),
}

impl EscalationType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Corp => "Corp",
            Self::Proactive => "Proactive",
            Self::Other => "Other",
            Self::Custom(raw) => raw,
        }
    }
}

impl Default for EscalationType {
    fn default() -> Self {
        Self::Custom(String::new())
    }
}

impl From<&str> for EscalationType {
    fn from(value: &str) -> Self {
        match value.trim() {
            "Corp" => Self::Corp,
            "Proactive" => Self::Proactive,
            "Other" => Self::Other,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for EscalationType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<EscalationType> for String {
    fn from(value: EscalationType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for EscalationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The editable part of a record.
///
/// Used as the create and update payload. It carries no id, number or
/// creation timestamp, so those can never be overwritten by an edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EscalationFields {
    pub title: String,
    pub reason: String,
    pub de_escalation_criteria: String,
    pub current_status: String,
    pub escalation_manager: String,
    pub functional_area: String,
    pub escalation_trend: EscalationTrend,
    pub escalation_status: EscalationStatus,
    pub escalation_type: EscalationType,
    pub main_contact: String,
    pub customer_name: String,
    pub project_name: String,
    pub reference_number: String,
    pub business_group: String,
    pub product: String,
}

impl EscalationFields {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// A persisted escalation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationRecord {
    pub id: EscalationId,

    /// Write-once display identifier
    pub escalation_number: EscalationNumber,

    /// Write-once creation instant; `None` when the source never set it
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub fields: EscalationFields,
}

impl EscalationRecord {
    /// Editable projection of this record
    pub fn fields(&self) -> &EscalationFields {
        &self.fields
    }

    /// Replace the editable fields, leaving id, number and timestamp untouched
    pub fn apply(&mut self, fields: EscalationFields) {
        self.fields = fields;
    }

    /// Creation instant, with the epoch-zero wire sentinel read as unset
    pub fn created_instant(&self) -> Option<DateTime<Utc>> {
        self.created_at.filter(|ts| ts.timestamp_millis() != 0)
    }

    /// Calendar date of creation (UTC)
    pub fn created_date(&self) -> Option<NaiveDate> {
        self.created_instant().map(|ts| ts.date_naive())
    }
}

/// Caller profile captured during bootstrap
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerProfile {
    pub display_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_business_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_functional_area: Option<String>,
}

/// Caller role as reported by the data source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Manager,
    Viewer,
    Unknown(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Viewer => "Viewer",
            Self::Unknown(raw) => raw,
        }
    }

    /// Whether this role may create, edit or delete records
    pub fn can_write(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Viewer
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value.trim() {
            "Admin" => Self::Admin,
            "Manager" => Self::Manager,
            "Viewer" => Self::Viewer,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
