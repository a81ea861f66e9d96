use thiserror::Error;

/// Failure taxonomy for upstream fetches.
///
/// Variants carry rendered messages rather than source errors so the enum
/// stays `Clone`: a failed single-flight population hands the same error
/// to every waiter on the key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Requested asset or zone is absent. Never retried automatically.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Upstream unreachable, timed out, or returned a non-2xx status.
    /// Never cached; the next read for the same key fetches again.
    #[error("Transient network error: {0}")]
    Transient(String),

    /// Malformed payload or a programming fault. Not retried.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        // Cut on a char boundary; a multibyte character spanning the
        // limit must not panic the slice.
        let cut = (0..=MAX_ERROR_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..cut],
            body.len()
        )
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            404 => ApiError::NotFound(truncated),
            _ => ApiError::Transient(format!("status {}: {}", status, truncated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_not_found() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, "no such zone");
        assert_eq!(err, ApiError::NotFound("no such zone".into()));
    }

    #[test]
    fn test_from_status_server_error_is_transient() {
        let err = ApiError::from_status(StatusCode::SERVICE_UNAVAILABLE, "down");
        assert!(matches!(err, ApiError::Transient(_)));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // A multibyte character straddling the truncation limit must not
        // panic the byte slice.
        let body = format!("{}é{}", "a".repeat(MAX_ERROR_BODY_LENGTH - 1), "x".repeat(100));
        assert!(!body.is_char_boundary(MAX_ERROR_BODY_LENGTH));

        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, &body);
        let message = err.to_string();
        assert!(message.contains(&format!("truncated, {} total bytes", body.len())));
        assert!(message.contains(&"a".repeat(MAX_ERROR_BODY_LENGTH - 1)));
    }

    #[test]
    fn test_long_body_truncated() {
        let body = "x".repeat(2000);
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, &body);
        let message = err.to_string();
        assert!(message.contains("truncated, 2000 total bytes"));
        assert!(message.len() < body.len());
    }
}
