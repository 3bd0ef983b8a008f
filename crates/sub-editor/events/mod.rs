//! Change notifications
//!
//! Provides the `ProjectEvent` enum emitted after every registered action
//! and the `EventChannel` that distributes it to observers. Handlers are
//! called in priority order and may filter by kind or by affected document.
//! Each kind can be blocked, which is how multi-step undo and transactions
//! suppress per-action notifications in favour of one merged one.

use crate::core::action::{Action, Register};
use crate::core::document::Documents;
use crate::core::errors::{EditorError, Result};
use core::fmt;
use std::sync::mpsc::Sender;

/// Kind of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    ActionDone,
    ActionUndone,
    ActionRedone,
}

impl EventKind {
    /// All kinds
    pub const ALL: [Self; 3] = [Self::ActionDone, Self::ActionUndone, Self::ActionRedone];

    /// Kind emitted for actions registered in `register`
    #[must_use]
    pub const fn for_register(register: Register) -> Self {
        match register.single() {
            Register::Undo => Self::ActionUndone,
            Register::Redo => Self::ActionRedone,
            _ => Self::ActionDone,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::ActionDone => 0,
            Self::ActionUndone => 1,
            Self::ActionRedone => 2,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActionDone => write!(f, "action-done"),
            Self::ActionUndone => write!(f, "action-undone"),
            Self::ActionRedone => write!(f, "action-redone"),
        }
    }
}

/// Notification about a completed change
///
/// Carries either the registered action itself or, after a multi-step undo,
/// redo or transaction, one merged action describing the net row changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectEvent {
    ActionDone(Action),
    ActionUndone(Action),
    ActionRedone(Action),
}

impl ProjectEvent {
    /// Wrap `action` in the event of `kind`
    #[must_use]
    pub fn new(kind: EventKind, action: Action) -> Self {
        match kind {
            EventKind::ActionDone => Self::ActionDone(action),
            EventKind::ActionUndone => Self::ActionUndone(action),
            EventKind::ActionRedone => Self::ActionRedone(action),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::ActionDone(_) => EventKind::ActionDone,
            Self::ActionUndone(_) => EventKind::ActionUndone,
            Self::ActionRedone(_) => EventKind::ActionRedone,
        }
    }

    #[must_use]
    pub const fn action(&self) -> &Action {
        match self {
            Self::ActionDone(action) | Self::ActionUndone(action) | Self::ActionRedone(action) => {
                action
            }
        }
    }

    /// Human-readable summary
    #[must_use]
    pub fn description(&self) -> String {
        format!("{}: {}", self.kind(), self.action().description())
    }
}

/// Which events a handler wants to see
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Kinds to include (empty means all kinds)
    kinds: Vec<EventKind>,
    /// Only events touching one of these documents
    documents: Option<Documents>,
}

impl EventFilter {
    /// Create a new event filter that accepts all events
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only include specific kinds
    #[must_use]
    pub fn kinds(mut self, kinds: impl IntoIterator<Item = EventKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    /// Only include events affecting one of `documents`
    #[must_use]
    pub fn documents(mut self, documents: Documents) -> Self {
        self.documents = Some(documents);
        self
    }

    /// Check if an event passes this filter
    #[must_use]
    pub fn matches(&self, event: &ProjectEvent) -> bool {
        if !self.kinds.is_empty() && !self.kinds.contains(&event.kind()) {
            return false;
        }
        match self.documents {
            Some(docs) => docs.intersects(event.action().documents()),
            None => true,
        }
    }
}

/// Observer of project changes
pub trait EventHandler {
    /// Handle a project event
    fn handle_event(&mut self, event: &ProjectEvent) -> Result<()>;

    /// Get the event filter for this handler
    fn event_filter(&self) -> EventFilter {
        EventFilter::new()
    }

    /// Get handler priority (higher numbers = higher priority)
    fn priority(&self) -> i32 {
        0
    }
}

struct FnHandler<F> {
    callback: F,
    filter: EventFilter,
}

impl<F: FnMut(&ProjectEvent)> EventHandler for FnHandler<F> {
    fn handle_event(&mut self, event: &ProjectEvent) -> Result<()> {
        (self.callback)(event);
        Ok(())
    }

    fn event_filter(&self) -> EventFilter {
        self.filter.clone()
    }
}

/// Statistics about event handling
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventStats {
    /// Events handed to handlers
    pub events_dispatched: usize,
    /// Events dropped because their kind was blocked
    pub events_blocked: usize,
    /// Handler invocations skipped by filters
    pub events_filtered: usize,
    /// Events forwarded to the channel sender
    pub events_sent: usize,
    /// Handler calls that returned an error
    pub handler_errors: usize,
    /// Number of handlers currently registered
    pub handlers_count: usize,
}

struct HandlerInfo {
    id: usize,
    handler: Box<dyn EventHandler>,
    filter: EventFilter,
    priority: i32,
    events_processed: usize,
}

impl fmt::Debug for HandlerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerInfo")
            .field("id", &self.id)
            .field("filter", &self.filter)
            .field("priority", &self.priority)
            .field("events_processed", &self.events_processed)
            .field("handler", &"<EventHandler>")
            .finish()
    }
}

/// Distributes project events to handlers and an optional channel
#[derive(Debug, Default)]
pub struct EventChannel {
    handlers: Vec<HandlerInfo>,
    blocked: [usize; 3],
    sender: Option<Sender<ProjectEvent>>,
    stats: EventStats,
    next_handler_id: usize,
}

impl EventChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event handler, returning its id
    pub fn register_handler(&mut self, handler: Box<dyn EventHandler>) -> usize {
        let id = self.next_handler_id;
        self.next_handler_id += 1;

        let filter = handler.event_filter();
        let priority = handler.priority();
        self.handlers.push(HandlerInfo {
            id,
            handler,
            filter,
            priority,
            events_processed: 0,
        });
        // Stable, so equal priorities keep registration order
        self.handlers.sort_by(|a, b| b.priority.cmp(&a.priority));
        self.stats.handlers_count = self.handlers.len();
        id
    }

    /// Register a closure called for every event passing `filter`
    pub fn subscribe<F>(&mut self, filter: EventFilter, callback: F) -> usize
    where
        F: FnMut(&ProjectEvent) + 'static,
    {
        self.register_handler(Box::new(FnHandler { callback, filter }))
    }

    /// Unregister an event handler by id
    pub fn unregister_handler(&mut self, handler_id: usize) -> bool {
        let Some(pos) = self.handlers.iter().position(|h| h.id == handler_id) else {
            return false;
        };
        self.handlers.remove(pos);
        self.stats.handlers_count = self.handlers.len();
        true
    }

    /// Forward every dispatched event to `sender` as well
    pub fn set_sender(&mut self, sender: Sender<ProjectEvent>) {
        self.sender = Some(sender);
    }

    /// Suppress events of `kind` until the matching [`Self::unblock`]
    pub fn block(&mut self, kind: EventKind) {
        self.blocked[kind.index()] += 1;
    }

    /// Undo one [`Self::block`] of `kind`
    pub fn unblock(&mut self, kind: EventKind) {
        let count = &mut self.blocked[kind.index()];
        *count = count.saturating_sub(1);
    }

    #[must_use]
    pub fn is_blocked(&self, kind: EventKind) -> bool {
        self.blocked[kind.index()] > 0
    }

    /// Dispatch an event to all handlers whose filter accepts it
    ///
    /// Every handler runs even if an earlier one fails; the first failure is
    /// returned. Blocked kinds are dropped without reaching anyone.
    ///
    /// # Errors
    ///
    /// Returns the first handler error.
    pub fn dispatch(&mut self, event: &ProjectEvent) -> Result<()> {
        if self.is_blocked(event.kind()) {
            self.stats.events_blocked += 1;
            return Ok(());
        }
        self.stats.events_dispatched += 1;

        let mut first_error = None;
        for info in &mut self.handlers {
            if !info.filter.matches(event) {
                self.stats.events_filtered += 1;
                continue;
            }
            info.events_processed += 1;
            if let Err(err) = info.handler.handle_event(event) {
                self.stats.handler_errors += 1;
                first_error.get_or_insert(err);
            }
        }

        if let Some(sender) = &self.sender {
            if sender.send(event.clone()).is_ok() {
                self.stats.events_sent += 1;
            } else {
                #[cfg(feature = "tracing")]
                tracing::debug!("event receiver dropped, detaching sender");
                self.sender = None;
                first_error.get_or_insert(EditorError::event_channel("receiver disconnected"));
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    #[must_use]
    pub fn stats(&self) -> &EventStats {
        &self.stats
    }
}
