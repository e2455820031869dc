use crate::errors::FormsyncError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request to '{url}' failed: {message}")]
    Request { url: String, message: String },

    #[error("Server returned {status} for '{url}': {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Failed to decode response from '{url}': {message}")]
    Decode { url: String, message: String },

    #[error("Invalid API base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },
}

impl ApiError {
    /// Map a transport-level reqwest error onto the taxonomy.
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ApiError::Request {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl FormsyncError for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            ApiError::Request { .. } => "API_REQUEST_FAILED",
            ApiError::Status { status: 401, .. } => "API_UNAUTHORIZED",
            ApiError::Status { status: 404, .. } => "API_NOT_FOUND",
            ApiError::Status { .. } => "API_STATUS_ERROR",
            ApiError::Decode { .. } => "API_DECODE_ERROR",
            ApiError::InvalidBaseUrl { .. } => "API_INVALID_BASE_URL",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            ApiError::Status { status, .. } => (400..500).contains(status),
            ApiError::InvalidBaseUrl { .. } => true,
            ApiError::Request { .. } | ApiError::Decode { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_codes() {
        let err = ApiError::Status {
            url: "http://x/form-containers/abc".to_string(),
            status: 404,
            message: "not found".to_string(),
        };
        assert_eq!(err.error_code(), "API_NOT_FOUND");
        assert!(err.is_user_error());
        assert_eq!(err.status(), Some(404));

        let err = ApiError::Status {
            url: "http://x".to_string(),
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.error_code(), "API_STATUS_ERROR");
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_decode_error_display() {
        let err = ApiError::Decode {
            url: "http://x/form-containers".to_string(),
            message: "missing field `id`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to decode response from 'http://x/form-containers': missing field `id`"
        );
        assert!(!err.is_user_error());
    }
}
