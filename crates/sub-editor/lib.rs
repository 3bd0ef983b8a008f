//! Undoable editing of ordered subtitle documents
//!
//! `sub-editor` keeps subtitle rows in four parallel, position-sorted
//! columns and records every change as a reversible [`Action`]. Several
//! actions can be undone or redone at once, in which case observers get one
//! merged notification whose row indices are rebased to the final document.
//!
//! # Features
//!
//! - **Ordered store**: rows stay sorted by their time triple; editing a show
//!   moves the row and reports the touched range
//! - **Dual positions**: times and frames are kept in step through
//!   [`sub_core::Calculator`]; inverses are recorded in the document's native
//!   unit so undo is exact
//! - **Undo/redo**: groups, transactions, multi-step reverts and an optional
//!   history cap
//! - **Notifications**: handlers with priorities and filters, per-kind
//!   blocking, optional `mpsc` forwarding
//! - **Serde**: optional serialization of configuration and value types
//!
//! # Example
//!
//! ```
//! use sub_editor::{Column, Doc, Project, Register, TimeCode};
//!
//! let mut project = Project::new();
//! project.insert_rows(&[0, 1, 2], None, Some(Register::Do))?;
//! project.set_text(0, Doc::Main, "First", Some(Register::Do))?;
//!
//! // Moving the first row past the others resorts it
//! let row = project.set_time(0, Column::Show, TimeCode::from_millis(7_000), Some(Register::Do))?;
//! assert_eq!(row, 2);
//! assert_eq!(project.document().main_texts()[2], "First");
//!
//! // Undo both edits in one go
//! project.undo(2)?;
//! assert_eq!(project.document().main_texts()[0], "");
//! assert_eq!(project.history().redo_count(), 2);
//! # Ok::<(), sub_editor::EditorError>(())
//! ```

#![deny(unsafe_code)]

pub mod commands;
pub mod core;
pub mod events;
pub mod formats;

// Re-export sub-core types as first-class citizens
pub use sub_core::{
    Calculator, Column, FrameCount, Framerate, Mode, Position, PositionTriple, TimeCode,
};

// Public API exports
pub use commands::{DurationAdjustment, Shift};
pub use crate::core::{
    compute_merged_notification, Action, ActionBuilder, ActionGroup, Doc, Document, Documents,
    EditorError, History, HistoryConfig, HistoryEntry, HistoryStats, Project, ProjectConfig,
    Register, Result, RevertOp, RowData, RowDeltas, Stack, SubtitleRow, DEFAULT_DURATION,
};
pub use events::{EventChannel, EventFilter, EventHandler, EventKind, EventStats, ProjectEvent};
pub use formats::{NativePositions, SubtitleData};

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
