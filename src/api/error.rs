//! API Error Types
//!
//! Maps transport failures and HTTP status codes onto the three failure
//! categories callers act on: transport, not-found and validation.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::Id;

/// Errors returned by the resource client
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection refused, DNS failure, reset
    #[error("API unavailable: {0}")]
    Unavailable(String),

    #[error("Request timeout")]
    Timeout,

    /// Any other reqwest failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered 5xx
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// The server answered 404
    #[error("{resource} not found{}", .id.map(|id| format!(": {}", id)).unwrap_or_default())]
    NotFound {
        resource: &'static str,
        id: Option<Id>,
    },

    /// The server rejected the request body (4xx other than 404)
    #[error("Validation error {status}: {message}")]
    Validation {
        status: u16,
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    /// The response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Upload payload had no content
    #[error("Refusing to upload empty file {0}")]
    EmptyUpload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Failure category, used to decide how a page reacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    NotFound,
    Validation,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::Validation { .. } | ApiError::EmptyUpload(_) => ErrorKind::Validation,
            ApiError::Unavailable(_)
            | ApiError::Timeout
            | ApiError::Request(_)
            | ApiError::Server { .. }
            | ApiError::Decode(_)
            | ApiError::Io(_)
            | ApiError::Config(_) => ErrorKind::Transport,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Classify a reqwest send error
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Unavailable(err.to_string())
        } else {
            ApiError::Request(err)
        }
    }

    /// Build the error for a non-success status and its body text
    pub(crate) fn from_status(
        status: u16,
        body: String,
        resource: &'static str,
        id: Option<Id>,
    ) -> Self {
        match status {
            404 => ApiError::NotFound { resource, id },
            400..=499 => {
                let fields = parse_field_errors(&body);
                let message = if fields.is_empty() {
                    non_empty_or(body, "request rejected")
                } else {
                    summarize_fields(&fields)
                };
                ApiError::Validation {
                    status,
                    message,
                    fields,
                }
            }
            _ => ApiError::Server {
                status,
                message: non_empty_or(body, "no details"),
            },
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Parse the usual `{"field": ["message", ...]}` rejection body.
///
/// A bare string value (`{"detail": "..."}`) counts as a single message.
fn parse_field_errors(body: &str) -> BTreeMap<String, Vec<String>> {
    let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body)
    else {
        return BTreeMap::new();
    };

    map.into_iter()
        .filter_map(|(field, value)| {
            let messages: Vec<String> = match value {
                serde_json::Value::String(s) => vec![s],
                serde_json::Value::Array(items) => items
                    .into_iter()
                    .filter_map(|item| match item {
                        serde_json::Value::String(s) => Some(s),
                        serde_json::Value::Null => None,
                        other => Some(other.to_string()),
                    })
                    .collect(),
                _ => return None,
            };
            (!messages.is_empty()).then_some((field, messages))
        })
        .collect()
}

fn summarize_fields(fields: &BTreeMap<String, Vec<String>>) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}

fn non_empty_or(body: String, fallback: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ApiError::from_status(404, String::new(), "client", Some(9));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "client not found: 9");

        let err = ApiError::from_status(503, String::new(), "client", None);
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.to_string(), "Server error 503: no details");

        let err = ApiError::from_status(400, "bad".to_string(), "client", None);
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_field_errors_preserved() {
        let body = r#"{"name": ["This field is required."], "week_end": ["Date has wrong format."]}"#;
        let err = ApiError::from_status(400, body.to_string(), "timesheet", None);

        match err {
            ApiError::Validation { fields, message, .. } => {
                assert_eq!(fields["name"], vec!["This field is required."]);
                assert_eq!(
                    message,
                    "name: This field is required.; week_end: Date has wrong format."
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_detail_string_and_plain_body() {
        let fields = parse_field_errors(r#"{"detail": "Method not allowed"}"#);
        assert_eq!(fields["detail"], vec!["Method not allowed"]);

        assert!(parse_field_errors("<html>Bad Request</html>").is_empty());
        assert!(parse_field_errors(r#"["a"]"#).is_empty());
    }

    #[test]
    fn test_not_found_without_id() {
        let err = ApiError::NotFound {
            resource: "invoice",
            id: None,
        };
        assert_eq!(err.to_string(), "invoice not found");
        assert!(err.is_not_found());
    }
}
