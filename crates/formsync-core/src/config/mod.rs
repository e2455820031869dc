//! # Configuration System
//!
//! Hierarchical TOML configuration for formsync.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.formsync/config.toml`
//! 3. **Project config** - `./.formsync/config.toml`
//! 4. **Environment** - `FORMSYNC_API_TOKEN`
//! 5. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use formsync_core::config::FormsyncConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FormsyncConfig::load_hierarchy()?;
//!     let interval = config.polling.table_interval();
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use loading::{TOKEN_ENV_VAR, merge_configs};
pub use types::{ApiConfig, FormsyncConfig, PollingConfig, TableConfig};
pub use validation::validate_config;

impl FormsyncConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Load configuration from an explicit file.
    ///
    /// See [`loading::load_from_path`] for details.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, crate::errors::ConfigError> {
        loading::load_from_path(path)
    }

    /// Defaults with the environment token applied.
    ///
    /// See [`loading::load_fallback`] for details.
    pub fn load_fallback() -> Self {
        loading::load_fallback()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
