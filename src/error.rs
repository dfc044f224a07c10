//! Error taxonomy shared by the client, the endpoint mappers and the MCP tools.
//!
//! Every failure carries a stable [`ErrorKind`] so MCP callers can branch on it
//! without parsing messages.

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SchoolDiggerError>;

/// Maximum number of characters of an upstream body kept in an error.
pub const BODY_EXCERPT_LIMIT: usize = 256;

#[derive(Debug, Error)]
pub enum SchoolDiggerError {
    /// Missing or unusable process configuration. Fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Caller input rejected before any network traffic.
    #[error("invalid parameter '{field}': {message}")]
    Validation { field: &'static str, message: String },

    /// Network level failure after all retry attempts were used.
    #[error("transport error after {attempts} attempt(s): {cause}")]
    Transport { cause: String, attempts: u32 },

    /// SchoolDigger answered with a non-2xx status.
    #[error("SchoolDigger returned HTTP {status_code}: {body_excerpt}")]
    Upstream {
        status_code: u16,
        body_excerpt: String,
    },

    /// The upstream body was not the JSON we expected.
    #[error("failed to parse SchoolDigger response: {0}")]
    Parse(String),

    /// A detail lookup produced no usable record.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Stable, machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ConfigurationError,
    ValidationError,
    TransportError,
    UpstreamError,
    ParseError,
    NotFound,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ConfigurationError => "configuration_error",
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::TransportError => "transport_error",
            ErrorKind::UpstreamError => "upstream_error",
            ErrorKind::ParseError => "parse_error",
            ErrorKind::NotFound => "not_found",
        }
    }
}

impl SchoolDiggerError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Missing required parameter.
    pub fn missing(field: &'static str) -> Self {
        Self::validation(field, "is required")
    }

    pub fn upstream(status_code: u16, body: &str) -> Self {
        Self::Upstream {
            status_code,
            body_excerpt: excerpt(body),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::ConfigurationError,
            Self::Validation { .. } => ErrorKind::ValidationError,
            Self::Transport { .. } => ErrorKind::TransportError,
            Self::Upstream { .. } => ErrorKind::UpstreamError,
            Self::Parse(_) => ErrorKind::ParseError,
            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }

    /// Only transport failures are worth another attempt; HTTP statuses are
    /// assumed deterministic.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// JSON payload returned to MCP callers for a failed tool call.
    pub fn to_payload(&self) -> Value {
        let mut error = json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        match self {
            Self::Validation { field, .. } => {
                error["field"] = json!(field);
            }
            Self::Upstream {
                status_code,
                body_excerpt,
            } => {
                error["status_code"] = json!(status_code);
                error["body_excerpt"] = json!(body_excerpt);
            }
            Self::Transport { attempts, .. } => {
                error["attempts"] = json!(attempts);
            }
            _ => {}
        }
        json!({ "error": error })
    }
}

impl From<serde_json::Error> for SchoolDiggerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Truncate a body to [`BODY_EXCERPT_LIMIT`] characters without splitting a
/// UTF-8 sequence.
pub fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_EXCERPT_LIMIT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_serialize_snake_case() {
        let err = SchoolDiggerError::missing("state");
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert_eq!(
            serde_json::to_value(err.kind()).unwrap(),
            json!("validation_error")
        );
        assert_eq!(ErrorKind::UpstreamError.as_str(), "upstream_error");
    }

    #[test]
    fn validation_payload_names_field() {
        let payload = SchoolDiggerError::missing("zip").to_payload();
        assert_eq!(payload["error"]["kind"], "validation_error");
        assert_eq!(payload["error"]["field"], "zip");
    }

    #[test]
    fn upstream_payload_carries_status() {
        let payload = SchoolDiggerError::upstream(500, "boom").to_payload();
        assert_eq!(payload["error"]["status_code"], 500);
        assert_eq!(payload["error"]["body_excerpt"], "boom");
    }

    #[test]
    fn excerpt_truncates_on_char_boundary() {
        let body = "é".repeat(BODY_EXCERPT_LIMIT + 10);
        let cut = excerpt(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), BODY_EXCERPT_LIMIT + 3);

        assert_eq!(excerpt("  short  "), "short");
    }

    #[test]
    fn only_transport_errors_retry() {
        assert!(SchoolDiggerError::Transport {
            cause: "reset".into(),
            attempts: 1
        }
        .is_retryable());
        assert!(!SchoolDiggerError::upstream(503, "").is_retryable());
        assert!(!SchoolDiggerError::Parse("x".into()).is_retryable());
    }
}
