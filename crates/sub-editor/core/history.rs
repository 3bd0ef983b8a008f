//! Undo/redo stacks and change counters
//!
//! [`History`] owns the two stacks of a project. Both are kept most recent
//! first in a `VecDeque`: index 0 is the next entry to undo or redo. An entry
//! is either a single [`Action`] or an [`ActionGroup`] that is undone and
//! redone as one step.
//!
//! The history only does bookkeeping. Reverting entries needs the document,
//! so the undo/redo drivers live on [`crate::Project`].

use crate::core::action::{Action, ActionGroup, Register, RowDeltas};
use crate::core::document::{Doc, Documents};
use crate::core::errors::{EditorError, Result};
use std::collections::VecDeque;

/// Configuration for history behavior
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryConfig {
    /// Maximum number of entries per stack, `None` for unlimited
    pub undo_limit: Option<usize>,
}

impl HistoryConfig {
    /// Config with a cap on both stacks
    #[must_use]
    pub const fn limited(undo_limit: usize) -> Self {
        Self {
            undo_limit: Some(undo_limit),
        }
    }
}

/// One of the two stacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stack {
    Undo,
    Redo,
}

impl Stack {
    /// The stack entries popped from `self` are reverted onto
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Undo => Self::Redo,
            Self::Redo => Self::Undo,
        }
    }

    /// Register entries reverted from this stack are made in
    #[must_use]
    pub const fn revert_register(self) -> Register {
        match self {
            Self::Undo => Register::Undo,
            Self::Redo => Register::Redo,
        }
    }

    pub(crate) const fn empty_error(self) -> EditorError {
        match self {
            Self::Undo => EditorError::NothingToUndo,
            Self::Redo => EditorError::NothingToRedo,
        }
    }
}

/// One stack slot
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HistoryEntry {
    Action(Action),
    Group(ActionGroup),
}

impl HistoryEntry {
    /// Description shown for this step
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Action(action) => action.description(),
            Self::Group(group) => group.description(),
        }
    }

    /// Number of actions in this step
    #[must_use]
    pub fn action_count(&self) -> usize {
        match self {
            Self::Action(_) => 1,
            Self::Group(group) => group.len(),
        }
    }

    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Actions of this step, oldest first
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        match self {
            Self::Action(action) => core::slice::from_ref(action),
            Self::Group(group) => group.actions(),
        }
    }
}

/// History statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStats {
    /// Steps that can be undone
    pub undo_count: usize,
    /// Steps that can be redone
    pub redo_count: usize,
    /// Actions on the undo stack, counting group members
    pub undo_actions: usize,
    /// Actions on the redo stack, counting group members
    pub redo_actions: usize,
    /// Cap on each stack
    pub undo_limit: Option<usize>,
    /// Actions registered since creation
    pub registered: u64,
}

/// Undo and redo stacks plus per-document change counters
#[derive(Debug, Clone, Default)]
pub struct History {
    config: HistoryConfig,
    undoables: VecDeque<HistoryEntry>,
    redoables: VecDeque<HistoryEntry>,
    main_changed: i32,
    tran_changed: i32,
    registered: u64,
    limits_deferred: usize,
}

impl History {
    /// Create an unlimited history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history with custom configuration
    #[must_use]
    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Change the cap, evicting excess entries right away
    pub fn set_undo_limit(&mut self, undo_limit: Option<usize>) {
        self.config.undo_limit = undo_limit;
        self.enforce_limits();
    }

    /// Entries of one stack, most recent first
    #[must_use]
    pub fn stack(&self, stack: Stack) -> &VecDeque<HistoryEntry> {
        match stack {
            Stack::Undo => &self.undoables,
            Stack::Redo => &self.redoables,
        }
    }

    fn stack_mut(&mut self, stack: Stack) -> &mut VecDeque<HistoryEntry> {
        match stack {
            Stack::Undo => &mut self.undoables,
            Stack::Redo => &mut self.redoables,
        }
    }

    /// Record a completed action
    ///
    /// Do-family actions land on the undo stack and discard the redo stack,
    /// redo-family ones land on the undo stack and undo-family ones on the
    /// redo stack. The change counters of every affected document move by
    /// the register's shift.
    pub fn push(&mut self, action: Action) {
        let register = action.register();
        if register.clears_redo() {
            self.redoables.clear();
        }
        for doc in action.documents().docs() {
            *self.counter_mut(doc) += register.shift();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            register = %register,
            description = action.description(),
            "registered action"
        );

        let stack = if register.targets_undo_stack() {
            Stack::Undo
        } else {
            Stack::Redo
        };
        self.stack_mut(stack).push_front(HistoryEntry::Action(action));
        self.registered += 1;
        self.enforce_limits();
    }

    /// Collapse the top `amount` entries of the destination stack of
    /// `register` into one group
    ///
    /// Entries that are groups themselves are flattened into the new group,
    /// so nested transactions still undo as one step.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::HistoryError`] if `amount` is zero or exceeds
    /// the stack depth.
    pub fn group(&mut self, register: Register, amount: usize, description: &str) -> Result<()> {
        let stack = if register.targets_undo_stack() {
            Stack::Undo
        } else {
            Stack::Redo
        };
        self.group_on(stack, amount, description)
    }

    /// Collapse the top `amount` entries of `stack` into one group
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::HistoryError`] if `amount` is zero or exceeds
    /// the stack depth.
    pub fn group_on(&mut self, stack: Stack, amount: usize, description: &str) -> Result<()> {
        let entries = self.stack_mut(stack);
        if amount == 0 || amount > entries.len() {
            return Err(EditorError::history(format!(
                "cannot group {amount} of {} entries",
                entries.len()
            )));
        }

        let drained: Vec<HistoryEntry> = entries.drain(..amount).collect();
        let mut actions = Vec::with_capacity(amount);
        for entry in drained.into_iter().rev() {
            match entry {
                HistoryEntry::Action(action) => actions.push(action),
                HistoryEntry::Group(group) => actions.extend(group.into_actions()),
            }
        }
        entries.push_front(HistoryEntry::Group(ActionGroup::new(
            actions,
            description.to_string(),
        )));

        #[cfg(feature = "tracing")]
        tracing::debug!(?stack, amount, description, "grouped actions");
        Ok(())
    }

    /// Replace the group at `index` with its member actions
    ///
    /// Members are spliced in place so that the most recent one ends up
    /// closest to the top. Returns the number of members.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::HistoryError`] if there is no group at `index`.
    pub fn ungroup(&mut self, stack: Stack, index: usize) -> Result<usize> {
        let entries = self.stack_mut(stack);
        if !entries.get(index).is_some_and(HistoryEntry::is_group) {
            return Err(EditorError::history(format!(
                "no group at {stack:?} stack index {index}"
            )));
        }
        let Some(HistoryEntry::Group(group)) = entries.remove(index) else {
            return Err(EditorError::history("group vanished while ungrouping"));
        };
        let actions = group.into_actions();
        let amount = actions.len();
        for action in actions {
            entries.insert(index, HistoryEntry::Action(action));
        }
        Ok(amount)
    }

    /// Put a popped action back on top of `stack`
    ///
    /// Counters and the redo stack are left alone, as reverting it did not
    /// take effect.
    pub(crate) fn reinstate(&mut self, stack: Stack, action: Action) {
        self.stack_mut(stack).push_front(HistoryEntry::Action(action));
    }

    /// Remove and return the top entry of `stack`
    pub fn pop(&mut self, stack: Stack) -> Option<HistoryEntry> {
        self.stack_mut(stack).pop_front()
    }

    /// Top entry of `stack`
    #[must_use]
    pub fn peek(&self, stack: Stack) -> Option<&HistoryEntry> {
        self.stack(stack).front()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undoables.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redoables.is_empty()
    }

    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undoables.len()
    }

    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redoables.len()
    }

    /// Description of the next step to undo
    #[must_use]
    pub fn undo_description(&self) -> Option<&str> {
        self.undoables.front().map(HistoryEntry::description)
    }

    /// Description of the next step to redo
    #[must_use]
    pub fn redo_description(&self) -> Option<&str> {
        self.redoables.front().map(HistoryEntry::description)
    }

    /// Actions registered since creation
    #[must_use]
    pub const fn registered(&self) -> u64 {
        self.registered
    }

    /// Net change count of `doc` since the last save
    #[must_use]
    pub const fn changed(&self, doc: Doc) -> i32 {
        match doc {
            Doc::Main => self.main_changed,
            Doc::Tran => self.tran_changed,
        }
    }

    /// Check whether `doc` differs from its last saved state
    #[must_use]
    pub const fn is_changed(&self, doc: Doc) -> bool {
        self.changed(doc) != 0
    }

    /// Reset the change counters of `documents`
    pub fn mark_saved(&mut self, documents: Documents) {
        for doc in documents.docs() {
            *self.counter_mut(doc) = 0;
        }
    }

    fn counter_mut(&mut self, doc: Doc) -> &mut i32 {
        match doc {
            Doc::Main => &mut self.main_changed,
            Doc::Tran => &mut self.tran_changed,
        }
    }

    /// Drop both stacks and reset the counters
    pub fn clear(&mut self) {
        self.undoables.clear();
        self.redoables.clear();
        self.main_changed = 0;
        self.tran_changed = 0;
    }

    /// Suspend eviction until the matching [`Self::resume_limits`]
    ///
    /// Nestable. Keeps a partially built group from losing members.
    pub fn defer_limits(&mut self) {
        self.limits_deferred += 1;
    }

    /// End one [`Self::defer_limits`] and evict once nothing defers
    pub fn resume_limits(&mut self) {
        self.limits_deferred = self.limits_deferred.saturating_sub(1);
        self.enforce_limits();
    }

    fn enforce_limits(&mut self) {
        if self.limits_deferred > 0 {
            return;
        }
        let Some(limit) = self.config.undo_limit else {
            return;
        };
        for stack in [Stack::Undo, Stack::Redo] {
            let entries = self.stack_mut(stack);
            if entries.len() > limit {
                #[cfg(feature = "tracing")]
                tracing::debug!(?stack, evicted = entries.len() - limit, "history limit reached");
                entries.truncate(limit);
            }
        }
    }

    #[must_use]
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            undo_count: self.undoables.len(),
            redo_count: self.redoables.len(),
            undo_actions: self.undoables.iter().map(HistoryEntry::action_count).sum(),
            redo_actions: self.redoables.iter().map(HistoryEntry::action_count).sum(),
            undo_limit: self.config.undo_limit,
            registered: self.registered,
        }
    }
}

/// Fold several actions, in the order they took effect, into one
/// notification
///
/// For any register other than `Do` the given actions are the originals that
/// were reverted, so their inserted and removed rows swap roles. Pending
/// indices are rebased across every removal and insertion so that the result
/// describes the final document. The result has no inverse operation.
///
/// # Errors
///
/// Returns [`EditorError::InvalidAction`] when `actions` is empty.
pub fn compute_merged_notification(
    actions: &[Action],
    register: Register,
    description: &str,
) -> Result<Action> {
    let swap = register.single() != Register::Do;
    let mut documents = Documents::empty();
    let mut total = RowDeltas::default();

    for action in actions {
        documents |= action.documents();
        let deltas = action.deltas();
        let (inserted, removed) = if swap {
            (&deltas.removed_rows, &deltas.inserted_rows)
        } else {
            (&deltas.inserted_rows, &deltas.removed_rows)
        };

        if !removed.is_empty() {
            for list in pending_lists(&mut total) {
                list.retain(|row| removed.binary_search(row).is_err());
                for row in list.iter_mut() {
                    let shift = removed.partition_point(|&r| r <= *row);
                    *row -= shift;
                }
            }
            total.removed_rows.extend(removed);
        }

        if !inserted.is_empty() {
            for list in pending_lists(&mut total) {
                for &at in inserted {
                    for row in list.iter_mut() {
                        if *row >= at {
                            *row += 1;
                        }
                    }
                }
            }
            total.inserted_rows.extend(inserted);
        }

        total.updated_rows.extend(&deltas.updated_rows);
        total.updated_positions.extend(&deltas.updated_positions);
        total.updated_main_texts.extend(&deltas.updated_main_texts);
        total.updated_tran_texts.extend(&deltas.updated_tran_texts);
    }

    Action::builder(register, description)
        .documents(documents)
        .deltas(total)
        .build()
}

fn pending_lists(total: &mut RowDeltas) -> [&mut Vec<usize>; 5] {
    [
        &mut total.inserted_rows,
        &mut total.updated_rows,
        &mut total.updated_positions,
        &mut total.updated_main_texts,
        &mut total.updated_tran_texts,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn action(register: Register, description: &str) -> Action {
        Action::builder(register, description)
            .documents(Documents::MAIN)
            .build()
            .unwrap()
    }

    fn descriptions(history: &History, stack: Stack) -> Vec<String> {
        history
            .stack(stack)
            .iter()
            .map(|entry| entry.description().to_string())
            .collect()
    }

    #[test]
    fn push_routes_by_register() {
        let mut history = History::new();
        history.push(action(Register::Do, "a"));
        history.push(action(Register::Undo, "b"));
        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.redo_count(), 1);
        history.push(action(Register::Redo, "c"));
        assert_eq!(history.undo_count(), 2);
        assert_eq!(history.redo_count(), 1);
        history.push(action(Register::Do, "d"));
        assert_eq!(history.redo_count(), 0);
        assert_eq!(descriptions(&history, Stack::Undo), ["d", "c", "a"]);
    }

    #[test]
    fn counters_follow_register_shift() {
        let mut history = History::new();
        history.push(action(Register::Do, "a"));
        history.push(action(Register::Do, "b"));
        assert_eq!(history.changed(Doc::Main), 2);
        assert_eq!(history.changed(Doc::Tran), 0);
        history.push(action(Register::Undo, "b"));
        assert_eq!(history.changed(Doc::Main), 1);
        history.mark_saved(Documents::MAIN);
        assert!(!history.is_changed(Doc::Main));
        history.push(action(Register::Undo, "a"));
        assert_eq!(history.changed(Doc::Main), -1);
        assert!(history.is_changed(Doc::Main));
    }

    #[test]
    fn group_keeps_members_oldest_first() {
        let mut history = History::new();
        for name in ["a", "b", "c"] {
            history.push(action(Register::Do, name));
        }
        history.group(Register::DoMultiple, 2, "b and c").unwrap();
        assert_eq!(descriptions(&history, Stack::Undo), ["b and c", "a"]);
        let top = history.peek(Stack::Undo).unwrap();
        let members: Vec<&str> = top.actions().iter().map(Action::description).collect();
        assert_eq!(members, ["b", "c"]);
        assert_eq!(top.action_count(), 2);

        assert_eq!(history.ungroup(Stack::Undo, 0).unwrap(), 2);
        assert_eq!(descriptions(&history, Stack::Undo), ["c", "b", "a"]);
    }

    #[test]
    fn group_flattens_nested_groups() {
        let mut history = History::new();
        for name in ["a", "b", "c", "d"] {
            history.push(action(Register::Do, name));
        }
        history.group(Register::DoMultiple, 2, "c and d").unwrap();
        history.group(Register::DoMultiple, 2, "b to d").unwrap();
        let top = history.peek(Stack::Undo).unwrap();
        let members: Vec<&str> = top.actions().iter().map(Action::description).collect();
        assert_eq!(members, ["b", "c", "d"]);
        assert_eq!(history.undo_count(), 2);
    }

    #[test]
    fn group_errors() {
        let mut history = History::new();
        history.push(action(Register::Do, "a"));
        assert!(history.group(Register::DoMultiple, 2, "x").is_err());
        assert!(history.group(Register::DoMultiple, 0, "x").is_err());
        assert!(history.ungroup(Stack::Undo, 0).is_err());
        assert!(history.ungroup(Stack::Redo, 0).is_err());
    }

    #[test]
    fn limit_evicts_oldest_unless_deferred() {
        let mut history = History::with_config(HistoryConfig::limited(2));
        history.defer_limits();
        for name in ["a", "b", "c"] {
            history.push(action(Register::Do, name));
        }
        assert_eq!(history.undo_count(), 3);
        history.resume_limits();
        assert_eq!(descriptions(&history, Stack::Undo), ["c", "b"]);

        history.set_undo_limit(Some(1));
        assert_eq!(descriptions(&history, Stack::Undo), ["c"]);
        let stats = history.stats();
        assert_eq!(stats.undo_limit, Some(1));
        assert_eq!(stats.registered, 3);
    }

    #[test]
    fn descriptions_of_next_steps() {
        let mut history = History::new();
        assert_eq!(history.undo_description(), None);
        history.push(action(Register::Do, "Editing text"));
        history.push(action(Register::Undo, "Removing subtitles"));
        assert_eq!(history.undo_description(), Some("Editing text"));
        assert_eq!(history.redo_description(), Some("Removing subtitles"));
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn merged_notification_rebases_across_removal() {
        // Reverting [remove 4, edit text 5, insert 2]: the originals are
        // passed in the order their inverses ran.
        let insert = Action::builder(Register::Do, "insert")
            .documents(Documents::all())
            .inserted_rows([2])
            .build()
            .unwrap();
        let edit = Action::builder(Register::Do, "edit")
            .documents(Documents::MAIN)
            .updated_texts(Doc::Main, [5])
            .build()
            .unwrap();
        let remove = Action::builder(Register::Do, "remove")
            .documents(Documents::all())
            .removed_rows([4])
            .build()
            .unwrap();

        let merged =
            compute_merged_notification(&[insert, edit, remove], Register::Undo, "undo").unwrap();
        assert_eq!(merged.register(), Register::Undo);
        assert_eq!(merged.removed_rows(), &[2]);
        assert_eq!(merged.updated_main_texts(), &[6]);
        assert_eq!(merged.inserted_rows(), &[4]);
        assert_eq!(merged.documents(), Documents::all());
        assert!(!merged.is_revertible());
    }

    #[test]
    fn merged_notification_drops_removed_pending_rows() {
        let edit = Action::builder(Register::Do, "edit")
            .documents(Documents::TRAN)
            .updated_texts(Doc::Tran, [1, 3, 6])
            .build()
            .unwrap();
        let remove = Action::builder(Register::Do, "remove")
            .documents(Documents::all())
            .removed_rows([0, 3])
            .build()
            .unwrap();
        let merged = compute_merged_notification(&[edit, remove], Register::Do, "both").unwrap();
        assert_eq!(merged.updated_tran_texts(), &[0, 4]);
        assert_eq!(merged.removed_rows(), &[0, 3]);
        assert!(merged.inserted_rows().is_empty());
    }

    #[test]
    fn merged_notification_needs_actions() {
        assert!(compute_merged_notification(&[], Register::Do, "none").is_err());
    }
}
