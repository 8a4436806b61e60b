//! # Client Error Types
//!
//! Error types for every operation that leaves the process.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Pre-flight     │  │   Transport     │  │     Server              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Validation     │  │  Transport      │  │  Status (401, 404, ...) │ │
//! │  │                 │  │                 │  │  Decode                 │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────────────────────────────────┐  │
//! │  │    Storage      │  │     Configuration                           │  │
//! │  │                 │  │                                             │  │
//! │  │  Storage        │  │  InvalidUrl, InvalidConfig,                 │  │
//! │  │                 │  │  ConfigLoadFailed                           │  │
//! │  └─────────────────┘  └─────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors are returned as produced: nothing here retries or rewrites a
//! server failure. A 401 is still a `Status` error after the session has
//! been torn down.

use backoffice_core::{ServiceKind, ValidationError};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::storage::StorageError;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering every failure a service call can report.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Pre-flight Errors
    // =========================================================================
    /// Required fields missing; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // =========================================================================
    // Network Errors
    // =========================================================================
    /// The request never produced a response (DNS, refused, reset, ...).
    #[error("{service} service request failed: {source}")]
    Transport {
        service: ServiceKind,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status.
    ///
    /// ## When This Occurs
    /// ```text
    /// GET /sales/99
    ///      │
    ///      ▼
    /// 404 {"error": "Sale not found"}
    ///      │
    ///      ▼
    /// Status { service: Sales, status: 404, body: {"error": ...} }
    /// ```
    /// `body` is the decoded JSON when the response was JSON, the raw text
    /// as a string otherwise, and `null` when empty.
    #[error("{service} service returned {status}{}", format_server_message(.body))]
    Status {
        service: ServiceKind,
        status: StatusCode,
        body: Value,
    },

    /// A success response could not be decoded into the expected type.
    #[error("{service} service sent an unreadable response: {message}")]
    Decode {
        service: ServiceKind,
        message: String,
    },

    // =========================================================================
    // Local State Errors
    // =========================================================================
    /// A value could not be serialized to JSON.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Persisted storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// A service base URL is malformed or not http(s).
    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),

    /// Configuration is structurally valid but unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),
}

fn format_server_message(body: &Value) -> String {
    match message_of(body) {
        Some(msg) => format!(": {}", msg),
        None => String::new(),
    }
}

fn message_of(body: &Value) -> Option<&str> {
    match body {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Object(map) => map.get("error").and_then(Value::as_str),
        _ => None,
    }
}

impl ClientError {
    /// True for a 401 response from any service.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// HTTP status for server errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The `error` string from a JSON error body, if the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Status {
                body: Value::Object(map),
                ..
            } => map.get("error").and_then(Value::as_str),
            _ => None,
        }
    }

    /// Service the failed call targeted, when known.
    pub fn service(&self) -> Option<ServiceKind> {
        match self {
            ClientError::Transport { service, .. }
            | ClientError::Status { service, .. }
            | ClientError::Decode { service, .. } => Some(*service),
            _ => None,
        }
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::SerializationFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
