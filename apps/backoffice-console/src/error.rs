//! # Command Error Type
//!
//! Unified error type for console commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  commands::dispatch ──► Result<(), CommandError>                        │
//! │         │                                                               │
//! │         ├── ClientError::Validation ─────► VALIDATION_ERROR   (exit 2)  │
//! │         ├── bad --data JSON ─────────────► INVALID_INPUT      (exit 2)  │
//! │         ├── 401 / login failure ─────────► UNAUTHORIZED       (exit 3)  │
//! │         ├── 404 / unknown route ─────────► NOT_FOUND          (exit 4)  │
//! │         ├── other status / bad body ─────► SERVER_ERROR       (exit 5)  │
//! │         ├── transport ───────────────────► NETWORK_ERROR      (exit 6)  │
//! │         ├── config / URL ────────────────► CONFIG_ERROR       (exit 7)  │
//! │         ├── storage ─────────────────────► STORAGE_ERROR      (exit 8)  │
//! │         └── anything else ───────────────► INTERNAL           (exit 1)  │
//! │                                                                         │
//! │  stderr: error[UNAUTHORIZED]: users service returned 401 ...            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::process::ExitCode;

use backoffice_client::ClientError;
use serde::Serialize;

/// Error reported by a console command.
///
/// ## Serialization
/// With `--json-errors` the shell prints:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "sales service returned 404 Not Found: Sale not found"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Required fields missing, nothing was sent
    ValidationError,

    /// Command arguments could not be understood
    InvalidInput,

    /// Session rejected or login failed
    Unauthorized,

    /// Record or route does not exist
    NotFound,

    /// Service answered with an error or an unreadable body
    ServerError,

    /// Service unreachable
    NetworkError,

    /// Configuration unusable
    ConfigError,

    /// Session storage failed
    StorageError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ServerError => "SERVER_ERROR",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// Process exit status for this code.
    pub fn exit_status(&self) -> u8 {
        match self {
            ErrorCode::Internal => 1,
            ErrorCode::ValidationError | ErrorCode::InvalidInput => 2,
            ErrorCode::Unauthorized => 3,
            ErrorCode::NotFound => 4,
            ErrorCode::ServerError => 5,
            ErrorCode::NetworkError => 6,
            ErrorCode::ConfigError => 7,
            ErrorCode::StorageError => 8,
        }
    }
}

impl CommandError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CommandError {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CommandError::new(ErrorCode::InvalidInput, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        CommandError::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        CommandError::new(ErrorCode::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CommandError::new(ErrorCode::Internal, message)
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code.exit_status())
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for CommandError {}

/// Converts client errors to command errors.
impl From<ClientError> for CommandError {
    fn from(err: ClientError) -> Self {
        let code = match &err {
            ClientError::Validation(_) => ErrorCode::ValidationError,
            ClientError::Status { status, .. } if status.as_u16() == 401 => ErrorCode::Unauthorized,
            ClientError::Status { status, .. } if status.as_u16() == 404 => ErrorCode::NotFound,
            ClientError::Status { .. } | ClientError::Decode { .. } => ErrorCode::ServerError,
            ClientError::Transport { .. } => ErrorCode::NetworkError,
            ClientError::Storage(_) => ErrorCode::StorageError,
            ClientError::InvalidUrl(_)
            | ClientError::InvalidConfig(_)
            | ClientError::ConfigLoadFailed(_) => ErrorCode::ConfigError,
            ClientError::SerializationFailed(_) => ErrorCode::Internal,
        };
        CommandError::new(code, err.to_string())
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        CommandError::invalid_input(format!("invalid JSON: {}", err))
    }
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::internal(format!("output failed: {}", err))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
