//! Error types for position arithmetic
//!
//! Follows the same philosophy as the rest of the workspace:
//! - `thiserror` for structured errors, no `anyhow`
//! - errors carry the offending input so callers can report it
//!
//! # Examples
//!
//! ```rust
//! use sub_core::CoreError;
//!
//! let err = CoreError::invalid_time("1:2", "expected HH:MM:SS.mmm");
//! assert!(err.is_recoverable());
//! assert!(err.suggestion().is_some());
//! ```

use core::fmt;
use thiserror::Error;

/// Main error type for `sub-core` operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Time string could not be parsed
    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    /// Framerate value is not positive or not finite
    #[error("Invalid framerate: {0}")]
    InvalidFramerate(String),

    /// Value failed a domain check
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    /// Create time error from invalid format
    pub fn invalid_time<T: fmt::Display>(time: T, reason: &str) -> Self {
        Self::InvalidTime(format!("'{time}': {reason}"))
    }

    /// Create framerate error from an offending value
    pub fn invalid_framerate<T: fmt::Display>(value: T) -> Self {
        Self::InvalidFramerate(format!("{value}"))
    }

    /// Create validation error
    pub fn validation<T: fmt::Display>(message: T) -> Self {
        Self::Validation(format!("{message}"))
    }

    /// Check if error is recoverable
    ///
    /// All core errors come from bad input, so callers can always retry
    /// with a corrected value.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidTime(_) | Self::InvalidFramerate(_) | Self::Validation(_) => true,
        }
    }

    /// Get suggested action for this error
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidTime(_) => Some("Use format like '00:01:30.500' for times"),
            Self::InvalidFramerate(_) => Some("Use a positive, finite frames-per-second value"),
            Self::Validation(_) => None,
        }
    }
}

/// Result type alias for core operations
pub type Result<T> = core::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_time_message_contains_input() {
        let err = CoreError::invalid_time("12:xx", "bad minutes");
        assert_eq!(err.to_string(), "Invalid time format: '12:xx': bad minutes");
    }

    #[test]
    fn suggestions() {
        assert!(CoreError::invalid_framerate(-1.0).suggestion().is_some());
        assert!(CoreError::validation("x").suggestion().is_none());
    }
}
