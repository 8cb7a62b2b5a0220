//! Event recorder: a listener that keeps every event it sees.
//!
//! Used in tests to assert which events a state transition emitted without
//! caring who else is listening.

use std::sync::{Arc, Mutex};

use crate::dispatcher::{EventListener, ListenerError};
use crate::Event;

#[derive(Debug)]
pub struct EventRecorder<E> {
    events: Arc<Mutex<Vec<E>>>,
}

impl<E> Clone for EventRecorder<E> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<E> Default for EventRecorder<E> {
    fn default() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<E: Event> EventRecorder<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events, oldest first.
    ///
    /// Panics if a listener panicked while recording; the history is then
    /// incomplete and no assertion on it can be trusted.
    pub fn recorded(&self) -> Vec<E> {
        self.events
            .lock()
            .unwrap_or_else(|_| panic!("event recorder lock poisoned"))
            .clone()
    }

    /// Number of recorded events with the given `event_type`.
    pub fn dispatched_count(&self, event_type: &str) -> usize {
        self.recorded()
            .iter()
            .filter(|e| e.event_type() == event_type)
            .count()
    }

    /// Panics unless at least one event of `event_type` was recorded.
    pub fn assert_dispatched(&self, event_type: &str) {
        assert!(
            self.dispatched_count(event_type) > 0,
            "expected event [{event_type}] to be dispatched, recorded: {:?}",
            self.recorded().iter().map(|e| e.event_type()).collect::<Vec<_>>()
        );
    }

    /// Panics if any event of `event_type` was recorded.
    pub fn assert_not_dispatched(&self, event_type: &str) {
        let count = self.dispatched_count(event_type);
        assert!(
            count == 0,
            "expected event [{event_type}] not to be dispatched, found {count}"
        );
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|_| panic!("event recorder lock poisoned"))
            .clear();
    }
}

impl<E: Event> EventListener<E> for EventRecorder<E> {
    fn name(&self) -> &'static str {
        "event-recorder"
    }

    fn handle(&self, event: &E) -> Result<(), ListenerError> {
        self.events
            .lock()
            .map_err(|_| "event recorder lock poisoned")?
            .push(event.clone());
        Ok(())
    }
}
