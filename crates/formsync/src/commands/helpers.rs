//! Shared plumbing for command handlers: configuration, API client and
//! runtime.

use std::path::PathBuf;

use clap::ArgMatches;
use tracing::{error, warn};

use formsync_core::{FormsyncConfig, HttpFormApi, events};

/// Effective configuration for a command.
///
/// An explicit `--config` file must load; the default hierarchy falls back
/// to built-in defaults with a warning. `--base-url` wins over both.
pub fn load_config(matches: &ArgMatches) -> Result<FormsyncConfig, Box<dyn std::error::Error>> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => FormsyncConfig::load_from_path(path).inspect_err(|e| {
            eprintln!("Failed to load config '{}': {}", path.display(), e);
            error!(event = "cli.config.load_failed", path = %path.display(), error = %e);
        })?,
        None => load_config_with_warning(),
    };

    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config.api.base_url = Some(base_url.clone());
        config.validate()?;
    }

    Ok(config)
}

fn load_config_with_warning() -> FormsyncConfig {
    match FormsyncConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.formsync/config.toml and ./.formsync/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            FormsyncConfig::load_fallback()
        }
    }
}

pub fn build_api(config: &FormsyncConfig) -> Result<HttpFormApi, Box<dyn std::error::Error>> {
    HttpFormApi::new(&config.api).map_err(|e| {
        events::log_app_error(&e);
        e.into()
    })
}

/// Runtime for commands that talk to the API.
pub fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

/// Report a failed command the same way everywhere and hand the error back.
pub fn fail(
    command: &'static str,
    e: impl std::error::Error + Send + Sync + 'static,
) -> Box<dyn std::error::Error> {
    eprintln!("❌ {} failed: {}", command, e);
    error!(event = "cli.command_failed", command = command, error = %e);
    events::log_app_error(&e);
    Box::new(e)
}
