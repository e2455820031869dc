use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::snapshots::ContainerSummary;

/// Creation-date ordering of the list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive creation-date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Query parameters of the list endpoint.
///
/// Empty collections and `None` fields are left out of the query string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListFilter {
    pub app_ids: Vec<String>,
    pub status: Option<String>,
    pub page: u32,
    pub limit: u32,
    pub sort: SortOrder,
    pub title: Option<String>,
    pub user_email: Option<String>,
    pub campaign_ids: Vec<String>,
    pub references: Vec<String>,
    pub expired: bool,
    pub date_range: Option<DateRange>,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            app_ids: Vec::new(),
            status: None,
            page: 1,
            limit: 50,
            sort: SortOrder::Desc,
            title: None,
            user_email: None,
            campaign_ids: Vec::new(),
            references: Vec::new(),
            expired: false,
            date_range: None,
        }
    }
}

impl ListFilter {
    /// Encode as query-string pairs in the server's parameter names.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("app_ids", self.app_ids.join(",")),
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("sort", self.sort.to_string()),
        ];

        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        if let Some(title) = self.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            pairs.push(("title", title.to_string()));
        }
        if let Some(email) = self
            .user_email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
        {
            pairs.push(("user_email", email.to_string()));
        }
        if !self.campaign_ids.is_empty() {
            pairs.push(("campaign_ids", self.campaign_ids.join(",")));
        }
        if !self.references.is_empty() {
            pairs.push(("references", self.references.join(",")));
        }
        if self.expired {
            pairs.push(("expired", "true".to_string()));
        }
        if let Some(range) = &self.date_range {
            pairs.push((
                "dateRange",
                format!(
                    "{},{}",
                    range.start.format("%Y-%m-%dT%H:%M:%S"),
                    range.end.format("%Y-%m-%dT%H:%M:%S")
                ),
            ));
        }

        pairs
    }
}

/// One page of the list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerPage {
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub form_containers: Vec<ContainerSummary>,
}

fn first_page() -> u32 {
    1
}

/// A question to create when adding a form to a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(rename = "isRequired")]
    pub is_required: bool,
}

/// Payload for creating a container together with its first form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContainer {
    pub app_id: String,
    pub title: String,
    pub description: String,
    pub user_email: String,
    pub reference: Option<String>,
    pub escalate: bool,
    pub campaign_id: Option<u64>,
    /// Questions of the first form.
    pub questions: Vec<NewQuestion>,
}

/// What the server hands back for a created container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedContainer {
    pub container_id: u64,
    pub form_id: u64,
    pub access_token: String,
}

/// A responder's answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "id")]
    pub question_id: u64,
    pub response: serde_json::Value,
}

/// Server-side state changes the client can request.
///
/// From the polling layer's point of view these are fire-and-forget; a
/// successful mutation is followed by an immediate refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Validate {
        container_id: u64,
        form_id: u64,
        /// Archive immediately instead of after the server's retention delay.
        archive: bool,
    },
    Cancel {
        container_id: u64,
        form_id: u64,
        comment: String,
    },
    AddForm {
        container_id: u64,
        app_id: String,
        questions: Vec<NewQuestion>,
    },
    SubmitResponse {
        access_token: String,
        app_id: String,
        form_id: u64,
        answers: Vec<Answer>,
    },
}

impl Mutation {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::Validate { .. } => "validate",
            Mutation::Cancel { .. } => "cancel",
            Mutation::AddForm { .. } => "add_form",
            Mutation::SubmitResponse { .. } => "submit_response",
        }
    }
}
