//! Structured error types for configuration resolution.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authoring errors in directory-level files (abort the run)
    InvalidMergePolicy,
    MalformedConfig,
    SchemaViolation,

    // Per-item errors
    NoConfigFound,
    MissingBindingReference,
    UnknownBinding,
    MalformedOverride,

    // Storage errors
    IoError,
    WalkError,

    // Raised by the sink writer, not by resolution
    SinkError,
}

/// Everything that can go wrong while building the store or resolving an item.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Not supported way to join configs: {0}")]
    InvalidMergePolicy(String),

    #[error("Malformed config {}: {reason}", path.display())]
    MalformedConfig { path: PathBuf, reason: String },

    #[error("No config found for {}", .0.display())]
    NoConfigFound(PathBuf),

    #[error("No db referenced by {}", .0.display())]
    MissingBindingReference(PathBuf),

    #[error("The DB {name} was not found for {}", item.display())]
    UnknownBinding { item: PathBuf, name: String },

    #[error("Schema violation in {}: {reason}", path.display())]
    SchemaViolation { path: PathBuf, reason: String },

    #[error("Malformed override {}: {reason}", path.display())]
    MalformedOverride { path: PathBuf, reason: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {}: {reason}", root.display())]
    Walk { root: PathBuf, reason: String },
}

impl ResolveError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidMergePolicy(_) => ErrorCode::InvalidMergePolicy,
            Self::MalformedConfig { .. } => ErrorCode::MalformedConfig,
            Self::NoConfigFound(_) => ErrorCode::NoConfigFound,
            Self::MissingBindingReference(_) => ErrorCode::MissingBindingReference,
            Self::UnknownBinding { .. } => ErrorCode::UnknownBinding,
            Self::SchemaViolation { .. } => ErrorCode::SchemaViolation,
            Self::MalformedOverride { .. } => ErrorCode::MalformedOverride,
            Self::Io { .. } => ErrorCode::IoError,
            Self::Walk { .. } => ErrorCode::WalkError,
        }
    }

    // Convenience constructors

    pub fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::MalformedConfig {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn schema_violation(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::SchemaViolation {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Serializable view of a failure, as it appears in batch reports.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding: Option<String>,
}

impl ErrorReport {
    pub fn sink(err: &anyhow::Error) -> Self {
        Self {
            code: ErrorCode::SinkError,
            message: format!("{:#}", err),
            binding: None,
        }
    }
}

impl From<&ResolveError> for ErrorReport {
    fn from(err: &ResolveError) -> Self {
        let binding = match err {
            ResolveError::UnknownBinding { name, .. } => Some(name.clone()),
            _ => None,
        };
        Self {
            code: err.code(),
            message: err.to_string(),
            binding,
        }
    }
}

/// Result type for resolution operations.
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;
