//! Core types of the editor
//!
//! - [`document`]: the ordered four-column row store
//! - [`action`]: registers, recorded actions and their inverses
//! - [`history`]: undo/redo stacks, grouping and merged notifications
//! - [`project`]: the façade tying them together
//! - [`errors`]: error type for everything above

pub mod action;
pub mod document;
pub mod errors;
pub mod history;
pub mod project;

// Re-export commonly used types
pub use action::{Action, ActionBuilder, ActionGroup, Register, RevertOp, RowDeltas};
pub use document::{Doc, Document, Documents, RowData, SubtitleRow};
pub use errors::{EditorError, Result};
pub use history::{
    compute_merged_notification, History, HistoryConfig, HistoryEntry, HistoryStats, Stack,
};
pub use project::{Project, ProjectConfig, DEFAULT_DURATION};
