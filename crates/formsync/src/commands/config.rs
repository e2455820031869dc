use clap::ArgMatches;
use tracing::info;

use formsync_core::FormsyncConfig;
use formsync_core::config::{ApiConfig, PollingConfig, TableConfig};

use super::helpers;

const REDACTED: &str = "<redacted>";

pub(crate) fn handle_config_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = helpers::load_config(matches)?;

    print!("{}", toml::to_string_pretty(&effective(&config))?);
    info!(event = "cli.config_completed");
    Ok(())
}

/// `config` with every default filled in and the token hidden.
fn effective(config: &FormsyncConfig) -> FormsyncConfig {
    FormsyncConfig {
        api: ApiConfig {
            base_url: Some(config.api.base_url().to_string()),
            token: config.api.token.as_ref().map(|_| REDACTED.to_string()),
            timeout_secs: Some(config.api.timeout().as_secs()),
        },
        polling: PollingConfig {
            table_interval_ms: Some(config.polling.table_interval().as_millis() as u64),
            detail_interval_ms: Some(config.polling.detail_interval().as_millis() as u64),
            list_diff: Some(config.polling.list_diff_policy().as_str().to_string()),
        },
        table: TableConfig {
            status: Some(config.table.status().to_string()),
            page_size: Some(config.table.page_size()),
            sort: Some(config.table.sort().to_string()),
            app_ids: Some(config.table.app_ids().to_vec()),
        },
    }
}
