//! Project: one document with its history and notifications
//!
//! [`Project`] composes the ordered [`Document`], the position
//! [`Calculator`], the [`History`] and the [`EventChannel`]. Edit operations
//! are implemented on it in [`crate::commands`]; this module holds the
//! undo/redo engine that drives them in reverse.
//!
//! # Example
//!
//! ```
//! use sub_editor::{Project, Register};
//!
//! let mut project = Project::new();
//! project.insert_rows(&[0, 1], None, Some(Register::Do))?;
//! project.set_text(1, sub_editor::Doc::Main, "Hello", Some(Register::Do))?;
//! assert_eq!(project.history().undo_count(), 2);
//!
//! project.undo(2)?;
//! assert!(project.document().is_empty());
//! project.redo(1)?;
//! assert_eq!(project.document().len(), 2);
//! # Ok::<(), sub_editor::EditorError>(())
//! ```

use crate::core::action::{Action, Register, RevertOp};
use crate::core::document::{Doc, Document, Documents};
use crate::core::errors::{EditorError, Result};
use crate::core::history::{compute_merged_notification, History, HistoryConfig, HistoryEntry, Stack};
use crate::events::{EventChannel, EventKind, ProjectEvent};
use crate::formats::SubtitleData;
use sub_core::{Calculator, Framerate, Mode};

/// Seconds a blank row appended at the end of a document lasts
pub const DEFAULT_DURATION: f64 = 3.0;

/// Settings a project is created with
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectConfig {
    /// Framerate positions are converted with
    pub framerate: Framerate,
    /// Native position unit
    pub mode: Mode,
    /// Seconds per blank row when inserting past the last row
    pub default_duration: f64,
    /// History settings
    pub history: HistoryConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            framerate: Framerate::default(),
            mode: Mode::default(),
            default_duration: DEFAULT_DURATION,
            history: HistoryConfig::default(),
        }
    }
}

/// A subtitle document with undoable edits
#[derive(Debug)]
pub struct Project {
    pub(crate) document: Document,
    pub(crate) calc: Calculator,
    pub(crate) mode: Mode,
    pub(crate) default_duration: f64,
    history: History,
    events: EventChannel,
    revert_description: Option<String>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    /// Create an empty project with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ProjectConfig::default())
    }

    /// Create an empty project with custom settings
    #[must_use]
    pub fn with_config(config: ProjectConfig) -> Self {
        Self {
            document: Document::new(),
            calc: Calculator::new(config.framerate),
            mode: config.mode,
            default_duration: config.default_duration,
            history: History::with_config(config.history),
            events: EventChannel::new(),
            revert_description: None,
        }
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub const fn calculator(&self) -> &Calculator {
        &self.calc
    }

    #[must_use]
    pub const fn framerate(&self) -> Framerate {
        self.calc.framerate()
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch the native position unit
    ///
    /// Only affects how later edits record their inverse and how blank rows
    /// and exports are computed. Not undoable.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Change the history cap
    pub fn set_undo_limit(&mut self, undo_limit: Option<usize>) {
        self.history.set_undo_limit(undo_limit);
    }

    #[must_use]
    pub const fn events(&self) -> &EventChannel {
        &self.events
    }

    /// Channel to register handlers on
    pub fn events_mut(&mut self) -> &mut EventChannel {
        &mut self.events
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Check whether `doc` has unsaved changes
    #[must_use]
    pub fn is_changed(&self, doc: Doc) -> bool {
        self.history.is_changed(doc)
    }

    /// Mark `documents` as saved in their current state
    pub fn mark_saved(&mut self, documents: Documents) {
        self.history.mark_saved(documents);
    }

    /// Drop all undo and redo steps
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Record a completed action and notify observers
    ///
    /// Called by every edit operation made with a register. While a revert
    /// is in progress the action takes over the reverted action's
    /// description.
    pub fn register_action(&mut self, mut action: Action) {
        if let Some(description) = self.revert_description.take() {
            action.set_description(description);
        }
        let kind = EventKind::for_register(action.register());
        let event = ProjectEvent::new(kind, action.clone());
        self.history.push(action);
        self.emit(&event);
    }

    /// Collapse the top `amount` entries of the destination stack of
    /// `register` into one undo step
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::HistoryError`] if the stack is too shallow.
    pub fn group_actions(&mut self, register: Register, amount: usize, description: &str) -> Result<()> {
        self.history.group(register, amount, description)
    }

    /// Split the group at `index` of `stack` back into single steps
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::HistoryError`] if there is no group at `index`.
    pub fn ungroup_actions(&mut self, stack: Stack, index: usize) -> Result<usize> {
        self.history.ungroup(stack, index)
    }

    /// Undo the `count` most recent steps
    ///
    /// A single ungrouped step is reverted directly and notified as is.
    /// Anything larger is reverted with notifications blocked, re-grouped on
    /// the redo stack, and notified once with a merged action.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NothingToUndo`] if the undo stack is empty.
    pub fn undo(&mut self, count: usize) -> Result<()> {
        self.revert_steps(Stack::Undo, count)
    }

    /// Redo the `count` most recently undone steps
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NothingToRedo`] if the redo stack is empty.
    pub fn redo(&mut self, count: usize) -> Result<()> {
        self.revert_steps(Stack::Redo, count)
    }

    fn revert_steps(&mut self, stack: Stack, count: usize) -> Result<()> {
        let top = self.history.peek(stack).ok_or(stack.empty_error())?;
        if count == 0 {
            return Ok(());
        }
        if count == 1 && !top.is_group() {
            let Some(HistoryEntry::Action(action)) = self.history.pop(stack) else {
                return Err(EditorError::history("top entry changed while reverting"));
            };
            #[cfg(feature = "tracing")]
            tracing::debug!(?stack, description = action.description(), "reverting action");
            if let Err(error) = action.clone().revert(self) {
                self.history.reinstate(stack, action);
                return Err(error);
            }
            return Ok(());
        }

        let register = stack.revert_register();
        let kind = EventKind::for_register(register);
        let mut reverted = Vec::new();
        let mut description = String::new();
        self.events.block(kind);
        self.history.defer_limits();
        let result = self.revert_entries(stack, count, &mut reverted, &mut description);
        self.history.resume_limits();
        self.events.unblock(kind);

        #[cfg(feature = "tracing")]
        tracing::debug!(?stack, steps = count, actions = reverted.len(), "reverted steps");

        // Whatever was reverted before a failure is still notified
        if !reverted.is_empty() {
            let merged = compute_merged_notification(&reverted, register, &description)?;
            self.emit(&ProjectEvent::new(kind, merged));
        }
        result
    }

    /// Revert up to `count` steps of `stack`, collecting the reverted actions
    ///
    /// On failure the action that failed and the rest of its step go back
    /// onto `stack`, regrouped if they came from a group.
    fn revert_entries(
        &mut self,
        stack: Stack,
        count: usize,
        reverted: &mut Vec<Action>,
        description: &mut String,
    ) -> Result<()> {
        let register = stack.revert_register();

        for _ in 0..count {
            let Some(entry) = self.history.peek(stack) else {
                break;
            };
            if description.is_empty() {
                *description = entry.description().to_string();
            }
            let group_description = entry.description().to_string();
            let amount = if entry.is_group() {
                self.history.ungroup(stack, 0)?
            } else {
                1
            };

            let before = self.history.registered();
            for done in 0..amount {
                let Some(HistoryEntry::Action(action)) = self.history.pop(stack) else {
                    return Err(EditorError::history("ungrouped member missing"));
                };
                if let Err(error) = action.clone().revert(self) {
                    self.history.reinstate(stack, action);
                    let remaining = amount - done;
                    if remaining > 1 {
                        self.history.group_on(stack, remaining, &group_description)?;
                    }
                    self.regroup_reverted(register, before, &group_description)?;
                    return Err(error);
                }
                reverted.push(action);
            }
            self.regroup_reverted(register, before, &group_description)?;
        }
        Ok(())
    }

    /// Group what reverting one step registered since `before`
    fn regroup_reverted(&mut self, register: Register, before: u64, description: &str) -> Result<()> {
        let registered = (self.history.registered() - before) as usize;
        if registered > 1 {
            self.history
                .group(register.multiple(), registered, description)?;
        }
        Ok(())
    }

    /// Replay `op` in `register` on behalf of a reverted action
    pub(crate) fn revert_with(
        &mut self,
        op: RevertOp,
        register: Register,
        description: String,
    ) -> Result<()> {
        self.revert_description = Some(description);
        let result = op.apply(self, register);
        // A no-op replay never registers, so the description must not leak
        self.revert_description = None;
        result
    }

    /// Run several edits as one undo step
    ///
    /// Notifications of `register`'s kind are blocked while `edit` runs.
    /// Everything it registered is grouped under `description` and one
    /// merged notification is emitted. If `edit` fails, the edits it made so
    /// far are still grouped so a single undo reverts them, and the error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns the error of `edit`, or a history error if grouping fails.
    pub fn transaction<T, F>(&mut self, register: Register, description: &str, edit: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let stack = if register.targets_undo_stack() {
            Stack::Undo
        } else {
            Stack::Redo
        };
        let kind = EventKind::for_register(register);
        let depth_before = self.history.stack(stack).len();

        self.events.block(kind);
        self.history.defer_limits();
        let result = edit(self);
        let added = self.history.stack(stack).len().saturating_sub(depth_before);
        let grouped = if added > 1 {
            self.history.group(register.multiple(), added, description)
        } else {
            Ok(())
        };
        self.history.resume_limits();
        self.events.unblock(kind);
        grouped?;

        if added > 0 {
            if let Some(entry) = self.history.peek(stack) {
                let actions = entry.actions().to_vec();
                let merged = compute_merged_notification(&actions, register, description)?;
                self.emit(&ProjectEvent::new(kind, merged));
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(description, steps = added, "transaction finished");
        result
    }

    /// Replace the document with freshly read data
    ///
    /// Rows are sorted stably by position; the returned count says how many
    /// rows were out of order in the input. History and change counters are
    /// reset.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::LengthMismatch`] if the sequences of `data`
    /// differ in length.
    pub fn open_main(&mut self, data: SubtitleData) -> Result<usize> {
        data.validate()?;
        self.mode = data.mode();
        let mut document = Document::new();
        for (row, ((times, frames), text)) in data
            .expand(&self.calc)
            .into_iter()
            .zip(data.texts)
            .enumerate()
        {
            document.insert_row(row, times, frames, text, String::new());
        }
        let resorted = document.sort();
        self.document = document;
        self.history.clear();

        #[cfg(feature = "tracing")]
        tracing::info!(rows = self.document.len(), resorted, "opened main document");
        Ok(resorted)
    }

    /// Attach translation texts to the current rows by row number
    ///
    /// Rows beyond the current document are appended with the translation's
    /// positions and an empty main text, then everything is re-sorted.
    /// Returns how many rows were out of order. History is reset.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::LengthMismatch`] if the sequences of `data`
    /// differ in length.
    pub fn open_translation(&mut self, data: SubtitleData) -> Result<usize> {
        data.validate()?;
        let translated = data.len();
        let positions = data.expand(&self.calc);
        for (row, (text, (times, frames))) in data.texts.into_iter().zip(positions).enumerate() {
            if row < self.document.len() {
                self.document.tran_texts[row] = text;
            } else {
                self.document
                    .insert_row(row, times, frames, String::new(), text);
            }
        }
        for text in self.document.tran_texts.iter_mut().skip(translated) {
            text.clear();
        }
        let resorted = self.document.sort();
        self.history.clear();

        #[cfg(feature = "tracing")]
        tracing::info!(rows = self.document.len(), resorted, "opened translation document");
        Ok(resorted)
    }

    /// Current positions in the native unit plus the texts of `doc`
    #[must_use]
    pub fn export(&self, doc: Doc) -> SubtitleData {
        SubtitleData::from_document(&self.document, self.mode, doc)
    }

    fn emit(&mut self, event: &ProjectEvent) {
        if let Err(_err) = self.events.dispatch(event) {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_err, event = %event.description(), "event handler failed");
        }
    }
}
