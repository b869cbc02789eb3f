//! Error types for quill.
//!
//! Transport failures are kept apart from HTTP-level failures: a caller can
//! always tell "could not reach the server" from "the server said no".

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// The unified error type for quill operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never completed (DNS, connect, TLS, timeout, broken body).
    #[error("network unavailable: {0}")]
    NetworkUnavailable(#[from] TransportError),

    /// Authentication errors (bad login, no usable refresh token).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The server answered with a non-success status.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Input validation errors.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Credential store failures.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A success response whose body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl Error {
    /// Returns true if the server could not be reached at all.
    pub fn is_network_unavailable(&self) -> bool {
        matches!(self, Error::NetworkUnavailable(_))
    }

    /// Returns the HTTP status for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(err) => Some(err.status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection could not be established (includes DNS and TLS failures).
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// The response body could not be read to completion.
    #[error("failed to read response body: {message}")]
    Body { message: String },

    /// Any other transport failure.
    #[error("transport failure: {message}")]
    Other { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The server rejected the username/password pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No refresh token is stored, or the server refused it.
    #[error("refresh token invalid")]
    RefreshTokenInvalid,

    /// The operation needs a logged-in user.
    #[error("not authenticated")]
    NotAuthenticated,
}

/// A non-success HTTP response surfaced by the typed API layer.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// The parsed error body.
    pub body: ErrorBody,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, body: ErrorBody) -> Self {
        Self { status, body }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(message) = self.body.message() {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// An error response body, parsed as JSON when possible.
///
/// The backend usually answers with `{"detail": "..."}` or a map of field
/// names to message lists, but proxies and crashed workers send HTML or
/// plain text. Both shapes are kept so callers can branch on them.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// No body, or only whitespace.
    Empty,
    /// A JSON document.
    Structured(Value),
    /// Anything that is not JSON, decoded lossily as UTF-8.
    Raw(String),
}

impl ErrorBody {
    /// Parse a response body.
    pub fn parse(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return ErrorBody::Empty;
        }
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => ErrorBody::Structured(value),
            Err(_) => ErrorBody::Raw(String::from_utf8_lossy(bytes).trim().to_string()),
        }
    }

    /// Returns the `detail` field of a structured body.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ErrorBody::Structured(value) => value.get("detail").and_then(Value::as_str),
            _ => None,
        }
    }

    /// Returns per-field validation messages of a structured body.
    ///
    /// Each field's messages are joined with `"; "`. The `detail` key is
    /// excluded. Fields are returned in key order.
    pub fn field_errors(&self) -> Vec<(String, String)> {
        let ErrorBody::Structured(Value::Object(map)) = self else {
            return Vec::new();
        };

        let mut fields: Vec<(String, String)> = map
            .iter()
            .filter(|(key, _)| key.as_str() != "detail")
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Array(items) => items
                        .iter()
                        .map(|item| match item {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect::<Vec<_>>()
                        .join("; "),
                    Value::Null => return None,
                    other => other.to_string(),
                };
                Some((key.clone(), text))
            })
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        fields
    }

    /// A human-readable summary of the body.
    pub fn message(&self) -> Option<String> {
        match self {
            ErrorBody::Empty => None,
            ErrorBody::Raw(text) => Some(text.clone()),
            ErrorBody::Structured(value) => {
                if let Some(detail) = self.detail() {
                    return Some(detail.to_string());
                }
                let fields = self.field_errors();
                if !fields.is_empty() {
                    return Some(
                        fields
                            .iter()
                            .map(|(field, msg)| format!("{}: {}", field, msg))
                            .collect::<Vec<_>>()
                            .join(", "),
                    );
                }
                Some(value.to_string())
            }
        }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API base URL '{value}': {reason}")]
    ApiBase { value: String, reason: String },

    /// A value that cannot be sent as an HTTP header.
    #[error("invalid value for header '{name}': {reason}")]
    HeaderValue { name: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Credential store errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The backing file exists but cannot be decoded.
    #[error("corrupt credential file {path}: {message}")]
    Corrupt { path: String, message: String },
}
