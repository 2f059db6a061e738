//! Born 2 Ride API error types.

/// Errors that can occur when talking to the Born 2 Ride backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived (connect, timeout, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("HTTP error! status: {status}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// A configured header value could not be encoded
    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

impl ApiError {
    /// True when the request never reached the backend.
    ///
    /// Browsers surface these as rejected fetches; the reporter shows a
    /// "backend is not running" toast for them.
    pub fn is_connection(&self) -> bool {
        match self {
            ApiError::Http(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }

    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ApiError::Status {
            status: 404,
            body: "{\"detail\":\"Not found.\"}".into(),
        };
        assert_eq!(err.to_string(), "HTTP error! status: 404");
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_connection());

        let err = ApiError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert_eq!(err.status(), None);

        let err = ApiError::InvalidHeader("content-type".into());
        assert_eq!(err.to_string(), "invalid header: content-type");
    }
}
