use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a single form inside a container.
///
/// The server owns the set of statuses; values this client does not know
/// about are preserved verbatim in `Other` so they still take part in
/// change detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FormStatus {
    Open,
    Answered,
    Validated,
    Canceled,
    Unsubstantial,
    Other(String),
}

impl From<String> for FormStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "open" => FormStatus::Open,
            "answered" => FormStatus::Answered,
            "validated" => FormStatus::Validated,
            "canceled" => FormStatus::Canceled,
            "unsubstantial" => FormStatus::Unsubstantial,
            _ => FormStatus::Other(value),
        }
    }
}

impl From<&str> for FormStatus {
    fn from(value: &str) -> Self {
        FormStatus::from(value.to_string())
    }
}

impl From<FormStatus> for String {
    fn from(status: FormStatus) -> Self {
        status.as_str().to_string()
    }
}

impl FormStatus {
    pub fn as_str(&self) -> &str {
        match self {
            FormStatus::Open => "open",
            FormStatus::Answered => "answered",
            FormStatus::Validated => "validated",
            FormStatus::Canceled => "canceled",
            FormStatus::Unsubstantial => "unsubstantial",
            FormStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A form as it appears in a list row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSummary {
    #[serde(alias = "id")]
    pub form_id: u64,
    pub status: FormStatus,
    /// Reminder/escalation step the server's workflow placed the form in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_step: Option<String>,
}

/// One row of the dashboard table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSummary {
    pub id: u64,
    pub access_token: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub validated: bool,
    #[serde(default)]
    pub escalate: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub forms: Vec<FormSummary>,
}

impl ContainerSummary {
    /// Status shown in the table: the most recent form's status, with its
    /// workflow step taking over while the form is still open.
    pub fn display_status(&self) -> String {
        match self.forms.last() {
            Some(form) => match (&form.status, &form.workflow_step) {
                (FormStatus::Open, Some(step)) => step.clone(),
                (status, _) => status.to_string(),
            },
            None => "-".to_string(),
        }
    }
}

/// A question inside a form, with the responder's answer if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub label: String,
    /// Input kind as sent by the server (text, radio, checkbox, select, ...).
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default = "default_required")]
    pub is_required: bool,
    #[serde(default)]
    pub response: Option<serde_json::Value>,
}

fn default_required() -> bool {
    true
}

/// A form as it appears in the detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDetail {
    #[serde(alias = "id")]
    pub form_id: u64,
    pub status: FormStatus,
    #[serde(default)]
    pub cancel_comment: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Full container as rendered by the detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerDetail {
    pub id: u64,
    pub access_token: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub validated: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub forms: Vec<FormDetail>,
}

/// One event in a container's history, oldest first on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub form_container_id: u64,
    pub form_id: u64,
    pub event: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default, deserialize_with = "timeline_timestamp")]
    pub timestamp: Option<NaiveDateTime>,
}

/// Timeline timestamps come as HTTP dates (`Fri, 01 Mar 2024 09:30:00 GMT`)
/// rather than ISO strings. Both are accepted; anything else reads as `None`.
fn timeline_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        s.parse::<NaiveDateTime>().ok().or_else(|| {
            DateTime::parse_from_rfc2822(&s)
                .ok()
                .map(|dt| dt.naive_utc())
        })
    }))
}
