//! Action model
//!
//! An [`Action`] is a value describing one completed mutation: which
//! register it was made in, which documents it touched, which rows changed
//! and how, and the [`RevertOp`] that undoes it. Actions are built through
//! [`ActionBuilder`], which validates them and normalizes the row lists.

use crate::core::document::{Doc, Documents, RowData};
use crate::core::errors::{EditorError, Result};
use crate::core::project::Project;
use core::fmt;
use core::str::FromStr;
use sub_core::{Column, FrameCount, Framerate, PositionTriple, TimeCode};

/// Direction an action was made in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Register {
    Do,
    Undo,
    Redo,
    DoMultiple,
    UndoMultiple,
    RedoMultiple,
}

impl Register {
    /// All registers, in declaration order
    pub const ALL: [Self; 6] = [
        Self::Do,
        Self::Undo,
        Self::Redo,
        Self::DoMultiple,
        Self::UndoMultiple,
        Self::RedoMultiple,
    ];

    /// Register the inverse of an action made in `self` is made in
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Do | Self::Redo => Self::Undo,
            Self::Undo => Self::Redo,
            Self::DoMultiple | Self::RedoMultiple => Self::UndoMultiple,
            Self::UndoMultiple => Self::RedoMultiple,
        }
    }

    /// Grouped counterpart of this register
    #[must_use]
    pub const fn multiple(self) -> Self {
        match self {
            Self::Do | Self::DoMultiple => Self::DoMultiple,
            Self::Undo | Self::UndoMultiple => Self::UndoMultiple,
            Self::Redo | Self::RedoMultiple => Self::RedoMultiple,
        }
    }

    /// Ungrouped counterpart of this register
    #[must_use]
    pub const fn single(self) -> Self {
        match self {
            Self::Do | Self::DoMultiple => Self::Do,
            Self::Undo | Self::UndoMultiple => Self::Undo,
            Self::Redo | Self::RedoMultiple => Self::Redo,
        }
    }

    /// Change-counter delta: `+1` for do and redo, `-1` for undo
    #[must_use]
    pub const fn shift(self) -> i32 {
        match self.single() {
            Self::Undo => -1,
            _ => 1,
        }
    }

    /// Whether actions in this register land on the undo stack
    #[must_use]
    pub const fn targets_undo_stack(self) -> bool {
        !matches!(self.single(), Self::Undo)
    }

    /// Whether registering in this register discards the redo stack
    #[must_use]
    pub const fn clears_redo(self) -> bool {
        matches!(self.single(), Self::Do)
    }

    /// Canonical upper-case name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Do => "DO",
            Self::Undo => "UNDO",
            Self::Redo => "REDO",
            Self::DoMultiple => "DO_MULTIPLE",
            Self::UndoMultiple => "UNDO_MULTIPLE",
            Self::RedoMultiple => "REDO_MULTIPLE",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Register {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|register| register.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| EditorError::InvalidRegister {
                name: s.to_string(),
            })
    }
}

/// Inverse of a primitive edit, with the arguments to replay it
///
/// Each variant maps onto exactly one primitive edit operation. Replaying it
/// in the inverse register registers the next inverse, so an undone action
/// can be redone and so on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RevertOp {
    /// Re-insert removed rows verbatim
    InsertRows { rows: Vec<usize>, data: RowData },
    /// Remove inserted rows
    RemoveRows { rows: Vec<usize> },
    /// Restore one text
    SetText { row: usize, doc: Doc, value: String },
    /// Restore one position from its time
    SetTime {
        row: usize,
        column: Column,
        value: TimeCode,
    },
    /// Restore one position from its frame
    SetFrame {
        row: usize,
        column: Column,
        value: FrameCount,
    },
    /// Restore positions of several rows
    ReplacePositions {
        rows: Vec<usize>,
        times: Vec<PositionTriple<TimeCode>>,
        frames: Vec<PositionTriple<FrameCount>>,
    },
    /// Restore texts of several rows
    ReplaceTexts {
        rows: Vec<usize>,
        doc: Doc,
        texts: Vec<String>,
    },
    /// Restore a framerate together with every position
    ReplaceFramerate {
        framerate: Framerate,
        times: Vec<PositionTriple<TimeCode>>,
        frames: Vec<PositionTriple<FrameCount>>,
    },
}

impl RevertOp {
    /// Name of the primitive this replays
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InsertRows { .. } => "insert_rows",
            Self::RemoveRows { .. } => "remove_rows",
            Self::SetText { .. } => "set_text",
            Self::SetTime { .. } => "set_time",
            Self::SetFrame { .. } => "set_frame",
            Self::ReplacePositions { .. } => "replace_positions",
            Self::ReplaceTexts { .. } => "replace_texts",
            Self::ReplaceFramerate { .. } => "replace_framerate",
        }
    }
}

/// Row-index deltas of one action, each sorted and free of duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowDeltas {
    pub inserted_rows: Vec<usize>,
    pub removed_rows: Vec<usize>,
    pub updated_rows: Vec<usize>,
    pub updated_positions: Vec<usize>,
    pub updated_main_texts: Vec<usize>,
    pub updated_tran_texts: Vec<usize>,
}

impl RowDeltas {
    pub(crate) fn lists_mut(&mut self) -> [&mut Vec<usize>; 6] {
        [
            &mut self.inserted_rows,
            &mut self.removed_rows,
            &mut self.updated_rows,
            &mut self.updated_positions,
            &mut self.updated_main_texts,
            &mut self.updated_tran_texts,
        ]
    }

    pub(crate) fn normalize(&mut self) {
        for list in self.lists_mut() {
            list.sort_unstable();
            list.dedup();
        }
    }

    /// Check whether every list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserted_rows.is_empty()
            && self.removed_rows.is_empty()
            && self.updated_rows.is_empty()
            && self.updated_positions.is_empty()
            && self.updated_main_texts.is_empty()
            && self.updated_tran_texts.is_empty()
    }
}

/// One completed, possibly revertible mutation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    register: Register,
    documents: Documents,
    description: String,
    revert: Option<RevertOp>,
    deltas: RowDeltas,
}

impl Action {
    /// Start building an action
    pub fn builder(register: Register, description: impl Into<String>) -> ActionBuilder {
        ActionBuilder::new(register, description)
    }

    #[must_use]
    pub const fn register(&self) -> Register {
        self.register
    }

    #[must_use]
    pub const fn documents(&self) -> Documents {
        self.documents
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = description;
    }

    /// Inverse operation, `None` for notification-only actions
    #[must_use]
    pub const fn revert_op(&self) -> Option<&RevertOp> {
        self.revert.as_ref()
    }

    /// Check whether this action can be reverted
    #[must_use]
    pub const fn is_revertible(&self) -> bool {
        self.revert.is_some()
    }

    #[must_use]
    pub const fn deltas(&self) -> &RowDeltas {
        &self.deltas
    }

    #[must_use]
    pub fn inserted_rows(&self) -> &[usize] {
        &self.deltas.inserted_rows
    }

    #[must_use]
    pub fn removed_rows(&self) -> &[usize] {
        &self.deltas.removed_rows
    }

    #[must_use]
    pub fn updated_rows(&self) -> &[usize] {
        &self.deltas.updated_rows
    }

    #[must_use]
    pub fn updated_positions(&self) -> &[usize] {
        &self.deltas.updated_positions
    }

    #[must_use]
    pub fn updated_main_texts(&self) -> &[usize] {
        &self.deltas.updated_main_texts
    }

    #[must_use]
    pub fn updated_tran_texts(&self) -> &[usize] {
        &self.deltas.updated_tran_texts
    }

    /// Updated text rows of one document
    #[must_use]
    pub fn updated_texts(&self, doc: Doc) -> &[usize] {
        match doc {
            Doc::Main => &self.deltas.updated_main_texts,
            Doc::Tran => &self.deltas.updated_tran_texts,
        }
    }

    /// Undo this action's effect on `project`
    ///
    /// Replays the stored [`RevertOp`] in the inverse register, which
    /// registers the inverse action on the opposite stack. The description
    /// carries over so that redo reads the same as undo.
    pub fn revert(self, project: &mut Project) -> Result<()> {
        let register = self.register.inverse().single();
        let Some(op) = self.revert else {
            return Err(EditorError::NotRevertible {
                description: self.description,
            });
        };
        project.revert_with(op, register, self.description)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.description, self.register)
    }
}

/// Builder for [`Action`]
///
/// # Example
///
/// ```
/// use sub_editor::{Action, Documents, Register};
///
/// let action = Action::builder(Register::Do, "Removing subtitles")
///     .documents(Documents::all())
///     .removed_rows([4, 2, 2])
///     .build()?;
/// assert_eq!(action.removed_rows(), &[2, 4]);
/// assert!(!action.is_revertible());
/// # Ok::<(), sub_editor::EditorError>(())
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct ActionBuilder {
    register: Register,
    documents: Documents,
    description: String,
    revert: Option<RevertOp>,
    deltas: RowDeltas,
}

impl ActionBuilder {
    pub fn new(register: Register, description: impl Into<String>) -> Self {
        Self {
            register,
            documents: Documents::empty(),
            description: description.into(),
            revert: None,
            deltas: RowDeltas::default(),
        }
    }

    pub fn documents(mut self, documents: impl Into<Documents>) -> Self {
        self.documents = documents.into();
        self
    }

    pub fn revert(mut self, op: RevertOp) -> Self {
        self.revert = Some(op);
        self
    }

    pub fn inserted_rows(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.deltas.inserted_rows.extend(rows);
        self
    }

    pub fn removed_rows(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.deltas.removed_rows.extend(rows);
        self
    }

    pub fn updated_rows(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.deltas.updated_rows.extend(rows);
        self
    }

    pub fn updated_positions(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.deltas.updated_positions.extend(rows);
        self
    }

    pub fn updated_texts(mut self, doc: Doc, rows: impl IntoIterator<Item = usize>) -> Self {
        match doc {
            Doc::Main => self.deltas.updated_main_texts.extend(rows),
            Doc::Tran => self.deltas.updated_tran_texts.extend(rows),
        }
        self
    }

    pub fn deltas(mut self, deltas: RowDeltas) -> Self {
        self.deltas = deltas;
        self
    }

    /// Validate and build
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidAction`] if no document is affected.
    pub fn build(self) -> Result<Action> {
        if self.documents.is_empty() {
            return Err(EditorError::invalid_action(format!(
                "'{}' affects no documents",
                self.description
            )));
        }
        let mut deltas = self.deltas;
        deltas.normalize();
        Ok(Action {
            register: self.register,
            documents: self.documents,
            description: self.description,
            revert: self.revert,
            deltas,
        })
    }
}

/// Several actions occupying one stack slot
///
/// Actions are kept oldest first, the order they were made in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionGroup {
    actions: Vec<Action>,
    description: String,
}

impl ActionGroup {
    pub(crate) fn new(actions: Vec<Action>, description: String) -> Self {
        Self {
            actions,
            description,
        }
    }

    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub(crate) fn into_actions(self) -> Vec<Action> {
        self.actions
    }
}
