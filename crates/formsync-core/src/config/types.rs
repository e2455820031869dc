//! Configuration type definitions for formsync.
//!
//! These types are serialized/deserialized from TOML config files. Every
//! field is optional so that a project config can override a single value
//! of the user config; accessors in [`super::defaults`] resolve the
//! built-in fallback.
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "https://forms.example.com/api/v1"
//! timeout_secs = 10
//!
//! [polling]
//! table_interval_ms = 15000
//! detail_interval_ms = 15000
//! list_diff = "structural"
//!
//! [table]
//! status = "answered"
//! page_size = 10
//! sort = "desc"
//! app_ids = ["billing", "hr"]
//! ```

use serde::{Deserialize, Serialize};

/// Main configuration loaded from TOML config files.
///
/// Loaded from:
/// 1. User config: `~/.formsync/config.toml`
/// 2. Project config: `./.formsync/config.toml`
///
/// Project config values override user config values.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FormsyncConfig {
    /// Form-container API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Polling intervals and change-detection policy
    #[serde(default)]
    pub polling: PollingConfig,

    /// Default query for the table view
    #[serde(default)]
    pub table: TableConfig,
}

/// API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the API, including the version prefix.
    /// Default: `http://localhost:5000/api/v1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Bearer token sent with every request.
    /// `FORMSYNC_API_TOKEN` overrides this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Per-request timeout in seconds.
    /// Default: 10 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Polling configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PollingConfig {
    /// Interval between list refreshes in the table view.
    /// Default: 15000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_interval_ms: Option<u64>,

    /// Interval between change checks in the detail view.
    /// Default: 15000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_interval_ms: Option<u64>,

    /// How the table decides a fetched list differs from the displayed one.
    /// Options: structural, length. Default: structural.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_diff: Option<String>,
}

/// Default query used by the table view.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TableConfig {
    /// Form status to filter on (e.g. answered, open, reminder, escalate).
    /// Default: answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Rows per page.
    /// Default: 10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Creation-date ordering: asc or desc.
    /// Default: desc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,

    /// Applications whose containers are listed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_ids: Option<Vec<String>>,
}
