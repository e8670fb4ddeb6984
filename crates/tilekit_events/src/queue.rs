//! Ordered event queue with bounded history

use std::collections::VecDeque;
use std::fmt;

use crate::Event;

/// Number of fired events remembered by default
pub const DEFAULT_HISTORY_LENGTH: usize = 512;

/// Boxed event handler receiving the dispatch context and the event
pub type Handler<E, C> = Box<dyn FnMut(&mut C, &mut E)>;

/// Dispatches events to the handlers registered for their kind
///
/// Handlers run in registration order. A handler may cancel a cancelable
/// event, in which case the remaining handlers do not see it.
pub struct EventQueue<E: Event, C> {
    history_length: usize,
    handlers: Vec<(E::Kind, Handler<E, C>)>,
    history: VecDeque<E>,
}

impl<E: Event + Clone, C> Default for EventQueue<E, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event + Clone, C> EventQueue<E, C> {
    /// Create a queue remembering the last [`DEFAULT_HISTORY_LENGTH`] events
    pub fn new() -> Self {
        Self::with_history_length(DEFAULT_HISTORY_LENGTH)
    }

    /// Create a queue remembering the last `history_length` events
    pub fn with_history_length(history_length: usize) -> Self {
        Self {
            history_length,
            handlers: Vec::new(),
            history: VecDeque::with_capacity(history_length.min(DEFAULT_HISTORY_LENGTH)),
        }
    }

    /// Register a handler for `kind` and all of its sub-kinds
    pub fn register_event_handler<F>(&mut self, kind: E::Kind, handler: F)
    where
        F: FnMut(&mut C, &mut E) + 'static,
    {
        log::debug!("Registered event handler #{} for {:?}", self.handlers.len(), kind);
        self.handlers.push((kind, Box::new(handler)));
    }

    /// Run every matching handler on `event` and record it in the history
    ///
    /// Returns the event as left by the handlers.
    pub fn fire_event(&mut self, context: &mut C, mut event: E) -> E {
        for (kind, handler) in self.handlers.iter_mut() {
            if event.is_canceled() {
                break;
            }
            if event.is_kind(*kind) {
                handler(context, &mut event);
            }
        }

        if self.history_length > 0 {
            if self.history.len() == self.history_length {
                self.history.pop_front();
            }
            self.history.push_back(event.clone());
        }
        event
    }

    /// Number of events currently in the history
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Fired events, oldest first
    pub fn history(&self) -> impl Iterator<Item = &E> {
        self.history.iter()
    }

    /// Most recently fired event
    pub fn last(&self) -> Option<&E> {
        self.history.back()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Number of registered handlers
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl<E: Event, C> fmt::Debug for EventQueue<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventQueue")
            .field("history_length", &self.history_length)
            .field("handlers", &self.handlers.len())
            .field("history", &self.history.len())
            .finish()
    }
}
