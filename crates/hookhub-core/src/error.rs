//! Unified error types for HookHub.
//!
//! Registries and plugins map their failures into [`HooksError`] so that a
//! mis-registration at load time can be propagated with `?` all the way to
//! the host's startup routine.

use std::fmt;
use thiserror::Error;

/// Error kind categorization used across the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A registration broke the registry's contract (wrong shape, not
    /// abstract, already an index, ...). Programmer error, never retried.
    Contract,
    /// A lookup that the caller asked to be strict about found nothing.
    NotFound,
    /// Two contributions collide (duplicate plugin id, duplicate field).
    Conflict,
    /// Input validation failed.
    Validation,
    /// A registered member failed while the registry fanned out to it.
    Member,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contract => write!(f, "CONTRACT"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Member => write!(f, "MEMBER"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified error used throughout HookHub.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct HooksError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl HooksError {
    /// Create a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a contract-violation error.
    pub fn contract(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Contract, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a member-failure error.
    pub fn member(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Member, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns whether this error is a registration contract violation.
    pub fn is_contract(&self) -> bool {
        self.kind == ErrorKind::Contract
    }
}

impl Clone for HooksError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for HooksError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for HooksError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
