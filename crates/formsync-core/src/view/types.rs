use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::FormsyncConfig;
use crate::snapshots::ListDiff;

/// Registry key of the dashboard list.
pub const TABLE_POLLING_KEY: &str = "tablePolling";

pub const UPDATE_NOTICE_MESSAGE: &str = "The form has been updated, click to refresh";

/// Which screen a coordinator is showing. Each state owns at most one
/// polling key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Loading,
    /// Container list; polls [`TABLE_POLLING_KEY`].
    Table,
    /// One container's questions; polls its access token.
    Questions,
    /// Form builder; no polling.
    CreateForm,
}

impl ViewState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::Table => "table",
            ViewState::Questions => "questions",
            ViewState::CreateForm => "create_form",
        }
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation input. A route with an access token opens that container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    pub access_token: Option<String>,
}

impl Route {
    pub fn table() -> Self {
        Self::default()
    }

    pub fn questions(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
        }
    }
}

/// Sticky "remote data changed" banner. Stays up until the user refreshes
/// or leaves the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateNotice {
    pub key: String,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl UpdateNotice {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: UPDATE_NOTICE_MESSAGE.to_string(),
            raised_at: Utc::now(),
        }
    }
}

/// Polling cadence and diff policy of a coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub table_interval: Duration,
    pub detail_interval: Duration,
    pub list_diff: ListDiff,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::from_config(&FormsyncConfig::default())
    }
}

impl ViewSettings {
    pub fn from_config(config: &FormsyncConfig) -> Self {
        Self {
            table_interval: config.polling.table_interval(),
            detail_interval: config.polling.detail_interval(),
            list_diff: config.polling.list_diff_policy(),
        }
    }
}
