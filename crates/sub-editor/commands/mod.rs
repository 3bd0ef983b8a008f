//! Edit operations
//!
//! Every operation is a method on [`Project`] that takes an
//! `Option<Register>`. With `Some(register)` the change is recorded as an
//! [`crate::Action`] in that register; with `None` the document is changed
//! silently. Primitives live in:
//!
//! - [`rows`]: inserting and removing rows
//! - [`positions`]: single and bulk position edits, framerate changes
//! - [`texts`]: single and bulk text edits
//!
//! and [`compound`] builds grouped edits out of them. Each primitive's
//! inverse is a [`RevertOp`] dispatched below.

pub mod compound;
pub mod positions;
pub mod rows;
pub mod texts;

pub use positions::{DurationAdjustment, Shift};

use crate::core::action::{Register, RevertOp};
use crate::core::errors::{EditorError, Result};
use crate::core::project::Project;

impl RevertOp {
    /// Replay this inverse on `project` in `register`
    pub(crate) fn apply(self, project: &mut Project, register: Register) -> Result<()> {
        let register = Some(register);
        match self {
            Self::InsertRows { rows, data } => project.insert_rows(&rows, Some(data), register),
            Self::RemoveRows { rows } => project.remove_rows(&rows, register),
            Self::SetText { row, doc, value } => project.set_text(row, doc, value, register),
            Self::SetTime { row, column, value } => {
                project.set_time(row, column, value, register).map(drop)
            }
            Self::SetFrame { row, column, value } => {
                project.set_frame(row, column, value, register).map(drop)
            }
            Self::ReplacePositions {
                rows,
                times,
                frames,
            } => project.replace_positions(&rows, times, frames, register),
            Self::ReplaceTexts { rows, doc, texts } => {
                project.replace_texts(&rows, doc, texts, register)
            }
            Self::ReplaceFramerate {
                framerate,
                times,
                frames,
            } => project.replace_framerate(framerate, times, frames, register),
        }
    }
}

/// Sorted, de-duplicated copy of `rows`
pub(crate) fn normalize_rows(rows: &[usize]) -> Vec<usize> {
    let mut rows = rows.to_vec();
    rows.sort_unstable();
    rows.dedup();
    rows
}

/// Reject duplicates in a row list that pairs with a value list
pub(crate) fn check_unique(rows: &[usize]) -> Result<()> {
    let normalized = normalize_rows(rows);
    if normalized.len() == rows.len() {
        Ok(())
    } else {
        Err(EditorError::validation("row list contains duplicates"))
    }
}

/// Reject a value list that does not pair with `rows`
pub(crate) fn check_paired(what: &'static str, rows: &[usize], values: usize) -> Result<()> {
    if rows.len() == values {
        Ok(())
    } else {
        Err(EditorError::LengthMismatch {
            what,
            expected: rows.len(),
            actual: values,
        })
    }
}

/// `rows`, or every row if `None`
pub(crate) fn rows_or_all(project: &Project, rows: Option<&[usize]>) -> Result<Vec<usize>> {
    match rows {
        Some(rows) => {
            let rows = normalize_rows(rows);
            for &row in &rows {
                project.document.check_row(row)?;
            }
            Ok(rows)
        }
        None => Ok((0..project.document.len()).collect()),
    }
}
