use crate::api::ApiError;
use crate::errors::FormsyncError;
use crate::polling::PollingError;

use super::types::ViewState;

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Polling(#[from] PollingError),

    #[error("Nothing to refresh while the view is in state '{state}'")]
    NothingToRefresh { state: ViewState },
}

impl FormsyncError for ViewError {
    fn error_code(&self) -> &'static str {
        match self {
            ViewError::Api(e) => e.error_code(),
            ViewError::Polling(e) => e.error_code(),
            ViewError::NothingToRefresh { .. } => "VIEW_NOTHING_TO_REFRESH",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            ViewError::Api(e) => e.is_user_error(),
            ViewError::Polling(e) => e.is_user_error(),
            ViewError::NothingToRefresh { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_keep_their_codes() {
        let err = ViewError::from(ApiError::Status {
            url: "http://x/form-containers/tok".to_string(),
            status: 401,
            message: "expired token".to_string(),
        });
        assert_eq!(err.error_code(), "API_UNAUTHORIZED");
        assert!(err.is_user_error());

        let err = ViewError::NothingToRefresh {
            state: ViewState::CreateForm,
        };
        assert_eq!(
            err.to_string(),
            "Nothing to refresh while the view is in state 'create_form'"
        );
    }
}
