//! Error types for the sub-editor crate
//!
//! Provides the main `EditorError` enum that wraps `CoreError` from sub-core
//! and adds the document, action and history failure cases:
//! - stale or out-of-range row indices are rejected, never clamped
//! - malformed actions are rejected at construction
//! - no-op edits are not errors and never reach this type

use core::fmt;
use sub_core::CoreError;
use thiserror::Error;

/// Main error type for sub-editor operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    /// Errors from sub-core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Row index outside the document
    #[error("Row out of bounds: {row} (document length: {length})")]
    RowOutOfBounds { row: usize, length: usize },

    /// Parallel inputs of different length
    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Register name not one of the six known registers
    #[error("Invalid register: {name}")]
    InvalidRegister { name: String },

    /// Action failed a construction check
    #[error("Invalid action: {message}")]
    InvalidAction { message: String },

    /// Action carries no inverse operation
    #[error("Action '{description}' cannot be reverted")]
    NotRevertible { description: String },

    /// Undo/redo bookkeeping failed
    #[error("History operation failed: {message}")]
    HistoryError { message: String },

    /// No operation to undo
    #[error("Nothing to undo")]
    NothingToUndo,

    /// No operation to redo
    #[error("Nothing to redo")]
    NothingToRedo,

    /// Edit input rejected before touching the document
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    /// Event channel error
    #[error("Event channel error: {message}")]
    EventChannelError { message: String },
}

impl EditorError {
    /// Create a new row out of bounds error
    #[must_use]
    pub const fn row_out_of_bounds(row: usize, length: usize) -> Self {
        Self::RowOutOfBounds { row, length }
    }

    /// Create a new invalid action error
    pub fn invalid_action<T: fmt::Display>(message: T) -> Self {
        Self::InvalidAction {
            message: message.to_string(),
        }
    }

    /// Create a new history error
    pub fn history<T: fmt::Display>(message: T) -> Self {
        Self::HistoryError {
            message: message.to_string(),
        }
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(message: T) -> Self {
        Self::ValidationError {
            message: message.to_string(),
        }
    }

    /// Create a new event channel error
    pub fn event_channel<T: fmt::Display>(message: T) -> Self {
        Self::EventChannelError {
            message: message.to_string(),
        }
    }

    /// Check if error is recoverable
    ///
    /// History corruption is the only unrecoverable case: the stacks no
    /// longer describe the document.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Core(core_err) => core_err.is_recoverable(),
            Self::RowOutOfBounds { .. }
            | Self::LengthMismatch { .. }
            | Self::InvalidRegister { .. }
            | Self::InvalidAction { .. }
            | Self::NotRevertible { .. }
            | Self::NothingToUndo
            | Self::NothingToRedo
            | Self::ValidationError { .. }
            | Self::EventChannelError { .. } => true,
            Self::HistoryError { .. } => false,
        }
    }

    /// Check if this is a row index error
    #[must_use]
    pub const fn is_row_error(&self) -> bool {
        matches!(self, Self::RowOutOfBounds { .. })
    }

    /// Check if this is a history-related error
    #[must_use]
    pub const fn is_history_error(&self) -> bool {
        matches!(
            self,
            Self::HistoryError { .. }
                | Self::NothingToUndo
                | Self::NothingToRedo
                | Self::NotRevertible { .. }
        )
    }

    /// Get the underlying core error if this wraps one
    #[must_use]
    pub const fn as_core_error(&self) -> Option<&CoreError> {
        match self {
            Self::Core(core_err) => Some(core_err),
            _ => None,
        }
    }
}

/// Result type alias for editor operations
pub type Result<T> = core::result::Result<T, EditorError>;
