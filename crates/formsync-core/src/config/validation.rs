//! Configuration validation logic.

use crate::api::types::SortOrder;
use crate::config::types::FormsyncConfig;
use crate::errors::ConfigError;
use crate::snapshots::ListDiff;

/// Validate a FormsyncConfig, returning an error if any values are invalid.
///
/// # Validation Rules
///
/// - `api.base_url`, if set, must be an http(s) URL
/// - Polling intervals, if set, must be greater than zero
/// - `polling.list_diff`, if set, must be `structural` or `length`
/// - `table.page_size`, if set, must be greater than zero
/// - `table.sort`, if set, must be `asc` or `desc`
pub fn validate_config(config: &FormsyncConfig) -> Result<(), ConfigError> {
    if let Some(ref url) = config.api.base_url
        && !(url.starts_with("http://") || url.starts_with("https://"))
    {
        return Err(ConfigError::InvalidConfiguration {
            message: format!("Invalid api.base_url '{}': must start with http:// or https://", url),
        });
    }

    if config.polling.table_interval_ms == Some(0) {
        return Err(ConfigError::InvalidInterval {
            field: "polling.table_interval_ms".to_string(),
        });
    }

    if config.polling.detail_interval_ms == Some(0) {
        return Err(ConfigError::InvalidInterval {
            field: "polling.detail_interval_ms".to_string(),
        });
    }

    if let Some(ref policy) = config.polling.list_diff
        && policy.parse::<ListDiff>().is_err()
    {
        return Err(ConfigError::InvalidListDiff {
            value: policy.clone(),
        });
    }

    if config.table.page_size == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "Invalid table.page_size: must be greater than 0".to_string(),
        });
    }

    if let Some(ref sort) = config.table.sort
        && sort.parse::<SortOrder>().is_err()
    {
        return Err(ConfigError::InvalidConfiguration {
            message: format!("Invalid table.sort '{}'. Valid options: asc, desc", sort),
        });
    }

    Ok(())
}
