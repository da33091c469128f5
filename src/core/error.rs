use thiserror::Error;

/// Errors produced by the HTTP client layer.
///
/// The resolver classifies double failures by status code, so non-2xx
/// responses keep their status instead of being collapsed into a string.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend answered with a non-2xx status. `message` carries the body's
    /// `error` field when the backend supplied one.
    #[error("API error: HTTP {status}")]
    Api { status: u16, message: Option<String> },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl AppError {
    /// True when the backend rejected the request with HTTP 403.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, AppError::Api { status: 403, .. })
    }

    /// The backend-supplied error message, if the response body carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AppError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// User-facing outcomes for the report thread screen.
///
/// `PermissionDenied` and `FetchFailed` are terminal for a load attempt;
/// `SubmissionFailed` is shown inline next to the compose form with the
/// draft preserved; `RefreshFailed` means the reply was accepted server-side
/// and only the local view is stale, so it must read softer than a
/// submission failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ThreadError {
    #[error("You must be an admin, the report creator, a president, or a prior replier to view this report thread.")]
    PermissionDenied,

    #[error("Failed to fetch the report thread, please try again later.")]
    FetchFailed,

    #[error("{0}")]
    SubmissionFailed(String),

    #[error("Reply sent, but the thread could not be refreshed. Please reload the page.")]
    RefreshFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_classification() {
        let forbidden = AppError::Api {
            status: 403,
            message: None,
        };
        assert!(forbidden.is_forbidden());

        let server_error = AppError::Api {
            status: 500,
            message: Some("boom".to_string()),
        };
        assert!(!server_error.is_forbidden());
        assert!(!AppError::Transport("connection refused".to_string()).is_forbidden());
    }

    #[test]
    fn test_server_message_only_from_api_body() {
        let with_body = AppError::Api {
            status: 400,
            message: Some("Reply content is required".to_string()),
        };
        assert_eq!(with_body.server_message(), Some("Reply content is required"));

        let without_body = AppError::Api {
            status: 400,
            message: None,
        };
        assert_eq!(without_body.server_message(), None);
        assert_eq!(
            AppError::Decode("unexpected end of input".to_string()).server_message(),
            None
        );
    }
}
