//! Built-in fallback values and the accessors that apply them.

use std::time::Duration;

use crate::api::types::{ListFilter, SortOrder};
use crate::config::types::{ApiConfig, PollingConfig, TableConfig};
use crate::snapshots::ListDiff;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/v1";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// List refresh cadence of the dashboard table.
pub const DEFAULT_TABLE_INTERVAL_MS: u64 = 15_000;

pub const DEFAULT_DETAIL_INTERVAL_MS: u64 = 15_000;

pub const DEFAULT_TABLE_STATUS: &str = "answered";

pub const DEFAULT_PAGE_SIZE: u32 = 10;

impl ApiConfig {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

impl PollingConfig {
    pub fn table_interval(&self) -> Duration {
        Duration::from_millis(self.table_interval_ms.unwrap_or(DEFAULT_TABLE_INTERVAL_MS))
    }

    pub fn detail_interval(&self) -> Duration {
        Duration::from_millis(
            self.detail_interval_ms
                .unwrap_or(DEFAULT_DETAIL_INTERVAL_MS),
        )
    }

    /// Resolved diff policy. Unknown values fall back to structural;
    /// `validate_config` rejects them before this is reached.
    pub fn list_diff_policy(&self) -> ListDiff {
        self.list_diff
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl TableConfig {
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_TABLE_STATUS)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn app_ids(&self) -> &[String] {
        self.app_ids.as_deref().unwrap_or(&[])
    }

    /// First-page query the table view starts from.
    pub fn initial_filter(&self) -> ListFilter {
        ListFilter {
            app_ids: self.app_ids().to_vec(),
            status: Some(self.status().to_string()),
            page: 1,
            limit: self.page_size(),
            sort: self.sort(),
            ..ListFilter::default()
        }
    }
}
