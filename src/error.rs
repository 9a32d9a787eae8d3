//! Error Types
//!
//! Failure taxonomy shared by the client, the session store and the forms.

use reqwest::StatusCode;
use thiserror::Error;

/// Durable storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// How a request failed before a response arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// The fixed request timeout elapsed
    Timeout,
    /// No response was received (connection refused, DNS, reset)
    Network,
}

/// REST client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Transport error ({kind:?}): {message}")]
    Transport { kind: TransportKind, message: String },

    /// The server answered with a non-success status
    #[error("Server returned {status}")]
    Status {
        status: StatusCode,
        body: Option<serde_json::Value>,
    },

    /// The response body did not match the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// The request could not be built (bad URL, bad body)
    #[error("Invalid request: {0}")]
    Request(String),
}

impl ApiError {
    /// Classify a reqwest failure
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Transport {
                kind: TransportKind::Timeout,
                message: err.to_string(),
            }
        } else if err.is_connect() || err.is_request() {
            ApiError::Transport {
                kind: TransportKind::Network,
                message: err.to_string(),
            }
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if err.is_builder() {
            ApiError::Request(err.to_string())
        } else {
            ApiError::Transport {
                kind: TransportKind::Network,
                message: err.to_string(),
            }
        }
    }

    /// HTTP status when the server answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// True when no response was received
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }

    /// Server-provided `detail` as a plain string, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { body: Some(body), .. } => body.get("detail")?.as_str(),
            _ => None,
        }
    }

    /// Server-provided validation items (`detail: [{msg: ...}]`)
    pub fn detail_messages(&self) -> Option<Vec<String>> {
        match self {
            ApiError::Status { body: Some(body), .. } => {
                let items = body.get("detail")?.as_array()?;
                Some(
                    items
                        .iter()
                        .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                        .map(str::to_string)
                        .collect(),
                )
            }
            _ => None,
        }
    }
}

/// Local validation failure; blocks submission
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: Option<String>,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            field: field.map(str::to_string),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status_error(status: u16, body: serde_json::Value) -> ApiError {
        ApiError::Status {
            status: StatusCode::from_u16(status).unwrap(),
            body: Some(body),
        }
    }

    #[test]
    fn test_detail_string() {
        let err = status_error(400, json!({"detail": "Username o email ya registrado"}));
        assert_eq!(err.detail(), Some("Username o email ya registrado"));
        assert!(err.detail_messages().is_none());
    }

    #[test]
    fn test_detail_list() {
        let err = status_error(
            400,
            json!({"detail": [{"msg": "field required"}, {"msg": "value is not a valid email"}]}),
        );
        assert!(err.detail().is_none());
        assert_eq!(
            err.detail_messages().unwrap(),
            vec!["field required", "value is not a valid email"]
        );
    }

    #[test]
    fn test_unauthorized() {
        assert!(status_error(401, json!({})).is_unauthorized());
        assert!(!status_error(403, json!({})).is_unauthorized());

        let transport = ApiError::Transport {
            kind: TransportKind::Timeout,
            message: "timed out".into(),
        };
        assert!(transport.is_transport());
        assert!(transport.status().is_none());
    }
}
