use crate::errors::FormsyncError;

#[derive(Debug, thiserror::Error)]
pub enum PollingError {
    #[error("Invalid interval for polling key '{key}': must be greater than 0")]
    InvalidInterval { key: String },

    #[error("Cannot start polling key '{key}': no tokio runtime is running")]
    NoRuntime { key: String },
}

impl FormsyncError for PollingError {
    fn error_code(&self) -> &'static str {
        match self {
            PollingError::InvalidInterval { .. } => "POLLING_INVALID_INTERVAL",
            PollingError::NoRuntime { .. } => "POLLING_NO_RUNTIME",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, PollingError::InvalidInterval { .. })
    }
}
