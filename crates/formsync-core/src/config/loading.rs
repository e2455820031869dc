//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.formsync/config.toml` (global user preferences)
//! 3. **Project config** - `./.formsync/config.toml` (project-specific overrides)
//! 4. **Environment** - `FORMSYNC_API_TOKEN`
//! 5. **CLI arguments** - Command-line flags (highest priority)

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::types::{ApiConfig, FormsyncConfig, PollingConfig, TableConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;

/// Environment variable holding the API bearer token.
pub const TOKEN_ENV_VAR: &str = "FORMSYNC_API_TOKEN";

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be parsed, or if the
/// merged configuration fails validation. Missing config files are not errors.
pub fn load_hierarchy() -> Result<FormsyncConfig, ConfigError> {
    let mut config = FormsyncConfig::default();

    for path in [user_config_path(), project_config_path()]
        .into_iter()
        .flatten()
    {
        match load_config_file(&path) {
            Ok(file_config) => config = merge_configs(config, file_config),
            Err(ConfigError::ConfigNotFound { .. }) => {
                debug!(event = "core.config.file_not_found", path = %path.display());
            }
            Err(e) => return Err(e),
        }
    }

    let config = apply_token_override(config, std::env::var(TOKEN_ENV_VAR).ok());
    validate_config(&config)?;

    Ok(config)
}

/// Load configuration from one explicit file on top of the defaults.
///
/// Unlike [`load_hierarchy`], a missing file is an error here.
pub fn load_from_path(path: &Path) -> Result<FormsyncConfig, ConfigError> {
    let file_config = load_config_file(path)?;
    let config = merge_configs(FormsyncConfig::default(), file_config);
    let config = apply_token_override(config, std::env::var(TOKEN_ENV_VAR).ok());
    validate_config(&config)?;
    Ok(config)
}

/// Built-in defaults plus the environment token, for when the config files
/// cannot be used.
pub fn load_fallback() -> FormsyncConfig {
    apply_token_override(FormsyncConfig::default(), std::env::var(TOKEN_ENV_VAR).ok())
}

fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".formsync").join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".formsync").join("config.toml"))
}

/// Load a configuration file from the given path.
fn load_config_file(path: &Path) -> Result<FormsyncConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::ConfigNotFound {
                path: path.display().to_string(),
            }
        } else {
            ConfigError::IoError { source: e }
        }
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// A non-empty token from the environment replaces the configured one.
pub fn apply_token_override(mut config: FormsyncConfig, token: Option<String>) -> FormsyncConfig {
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        config.api.token = Some(token);
    }
    config
}

/// Merge two configurations, with override_config taking precedence.
///
/// Override values replace base values only if present.
pub fn merge_configs(base: FormsyncConfig, override_config: FormsyncConfig) -> FormsyncConfig {
    FormsyncConfig {
        api: ApiConfig {
            base_url: override_config.api.base_url.or(base.api.base_url),
            token: override_config.api.token.or(base.api.token),
            timeout_secs: override_config.api.timeout_secs.or(base.api.timeout_secs),
        },
        polling: PollingConfig {
            table_interval_ms: override_config
                .polling
                .table_interval_ms
                .or(base.polling.table_interval_ms),
            detail_interval_ms: override_config
                .polling
                .detail_interval_ms
                .or(base.polling.detail_interval_ms),
            list_diff: override_config.polling.list_diff.or(base.polling.list_diff),
        },
        table: TableConfig {
            status: override_config.table.status.or(base.table.status),
            page_size: override_config.table.page_size.or(base.table.page_size),
            sort: override_config.table.sort.or(base.table.sort),
            app_ids: override_config.table.app_ids.or(base.table.app_ids),
        },
    }
}
