//! Custom error types for the task list.
//!
//! Every operation on [`HistoryManager`](crate::history::HistoryManager)
//! either applies completely or is rejected with one of these errors; none
//! of the task-level variants leave partial state behind.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a mark-complete request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidStateReason {
    /// No task carries the requested description
    NotFound,
    /// The task exists but is already completed
    AlreadyCompleted,
}

impl fmt::Display for InvalidStateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidStateReason::NotFound => write!(f, "not found"),
            InvalidStateReason::AlreadyCompleted => write!(f, "already completed"),
        }
    }
}

/// Direction of a history step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Undo,
    Redo,
}

impl fmt::Display for HistoryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryDirection::Undo => write!(f, "undo"),
            HistoryDirection::Redo => write!(f, "redo"),
        }
    }
}

/// Coarse classification of a [`TaskListError`], used by the presentation
/// layer to pick a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    DuplicateTask,
    NotFound,
    InvalidState,
    InvalidArgument,
    NoHistory,
    Config,
    Io,
}

/// Main error type for task list operations
#[derive(Error, Debug)]
pub enum TaskListError {
    // =========================================================================
    // Task Errors
    // =========================================================================
    /// Bad input when constructing a task
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// A task with the same description is already in the list
    #[error("Task already exists: {description}")]
    DuplicateTask { description: String },

    /// No task with the given description
    #[error("No task found with description: {description}")]
    NotFound { description: String },

    /// Task cannot be completed in its current state
    #[error("Cannot complete task '{description}': {reason}")]
    InvalidState {
        description: String,
        reason: InvalidStateReason,
    },

    /// Unrecognised argument value
    #[error("Invalid {argument}: {value}")]
    InvalidArgument { argument: String, value: String },

    /// Nothing left to undo or redo
    #[error("No actions to {direction}")]
    NoHistory { direction: HistoryDirection },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Failed to load configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// IO error wrapper
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl TaskListError {
    // =========================================================================
    // Constructor helpers
    // =========================================================================

    /// Create a validation error
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a duplicate task error
    pub fn duplicate(description: impl Into<String>) -> Self {
        Self::DuplicateTask {
            description: description.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(description: impl Into<String>) -> Self {
        Self::NotFound {
            description: description.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(description: impl Into<String>, reason: InvalidStateReason) -> Self {
        Self::InvalidState {
            description: description.into(),
            reason,
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(argument: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            value: value.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path
    pub fn config_with_path(message: impl Into<String>, path: PathBuf) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path),
        }
    }

    // =========================================================================
    // Classification helpers
    // =========================================================================

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::DuplicateTask { .. } => ErrorKind::DuplicateTask,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::NoHistory { .. } => ErrorKind::NoHistory,
            Self::Config { .. } | Self::Json(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Check if this error is recoverable within a session
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::DuplicateTask { .. }
                | Self::NotFound { .. }
                | Self::InvalidState { .. }
                | Self::InvalidArgument { .. }
                | Self::NoHistory { .. }
        )
    }

    /// Get error code for exit status
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } | Self::Json(_) => 7,
            Self::Io(_) => 6,
            Self::Validation { .. } | Self::InvalidArgument { .. } => 2,
            _ => 1,
        }
    }
}

/// Type alias for task list results
pub type Result<T> = std::result::Result<T, TaskListError>;
