//! Error types for database queries.

use thiserror::Error;

/// Result type alias using QueryError.
pub type QueryResult<T> = Result<T, QueryError>;

#[derive(Debug, Error)]
pub enum QueryError {
    // === Request Errors ===
    #[error("All parameters ({0}) are required")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Upstream Errors ===
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database query failed ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    // === Setup Errors ===
    #[error("Configuration error: {0}")]
    Config(String),
}

impl QueryError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            QueryError::MissingParameter(_) | QueryError::InvalidParameter { .. } => 400,
            QueryError::Http(_)
            | QueryError::Upstream { .. }
            | QueryError::Decode(_)
            | QueryError::Config(_) => 500,
        }
    }

    /// Whether the caller sent a bad request.
    pub fn is_client_error(&self) -> bool {
        self.http_status_code() == 400
    }

    pub(crate) fn invalid(param: &str, message: impl Into<String>) -> Self {
        QueryError::InvalidParameter {
            param: param.to_string(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(QueryError::MissingParameter("sex1".into()).http_status_code(), 400);
        assert_eq!(QueryError::invalid("minAge1", "not a number").http_status_code(), 400);
        assert_eq!(
            QueryError::Upstream {
                status: 404,
                message: "function not found".into()
            }
            .http_status_code(),
            500
        );
        assert_eq!(QueryError::Decode("x".into()).http_status_code(), 500);
    }

    #[test]
    fn test_missing_message() {
        let err = QueryError::MissingParameter("minAge2, maxAge2, sex2".into());
        assert_eq!(err.to_string(), "All parameters (minAge2, maxAge2, sex2) are required");
    }
}
