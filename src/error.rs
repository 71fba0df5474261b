//! Error types for policy validation.
//!
//! This module defines [`PolicyError`], the primary error type used throughout
//! the crate, the stable [`ErrorCode`] taxonomy surfaced to callers, and a
//! [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration-level failures are fatal and name the offending path, id or rule
//! - Per-file scan failures never surface here; they are recorded on
//!   [`FileImports`](crate::scan::FileImports) instead
//! - Use `anyhow::Error` (via `PolicyError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes exposed to callers and reporters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Malformed policy document or unsupported inheritance.
    ConfigurationParseError,
    /// A referenced policy file does not exist.
    FileNotFound,
    /// Invalid rule configuration or duplicate registration.
    ValidationError,
    /// A validator factory produced an object that does not match its descriptor.
    InvalidValidator,
    /// Filesystem failure outside of per-file scanning.
    IoError,
    /// Anything else.
    InternalError,
}

impl ErrorCode {
    /// The upper-case string form used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigurationParseError => "CONFIGURATION_PARSE_ERROR",
            ErrorCode::FileNotFound => "FILE_NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidValidator => "INVALID_VALIDATOR",
            ErrorCode::IoError => "IO_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core error type for policy loading, scanning and registry operations.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Failed to parse a policy document, or the document uses unsupported features.
    #[error("Failed to parse policy at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A policy file, its `extends` target, or a scan root does not exist.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Invalid rule configuration or discovery settings.
    #[error("Invalid configuration: {message}")]
    ValidationError { message: String },

    /// A validator with the same id is already registered.
    #[error("Invalid configuration: duplicate validator_id '{validator_id}'")]
    DuplicateValidator { validator_id: String },

    /// A validator factory produced an object that does not satisfy the contract.
    #[error("Validator '{validator_id}' is not a valid validator: {message}")]
    InvalidValidator {
        validator_id: String,
        message: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PolicyError {
    /// Map this error onto the stable taxonomy.
    pub fn code(&self) -> ErrorCode {
        match self {
            PolicyError::ConfigParseError { .. } => ErrorCode::ConfigurationParseError,
            PolicyError::FileNotFound { .. } => ErrorCode::FileNotFound,
            PolicyError::ValidationError { .. } | PolicyError::DuplicateValidator { .. } => {
                ErrorCode::ValidationError
            }
            PolicyError::InvalidValidator { .. } => ErrorCode::InvalidValidator,
            PolicyError::Io(_) => ErrorCode::IoError,
            PolicyError::Other(_) => ErrorCode::InternalError,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        PolicyError::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        PolicyError::ValidationError {
            message: message.into(),
        }
    }
}

/// Result type alias for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;
