//! Synchronous listener registry.
//!
//! Listeners register interest at start-up and are invoked in registration
//! order, on the caller's thread, every time an event is dispatched. A failing
//! listener is logged and skipped; it never prevents the remaining listeners
//! from seeing the event.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::Event;

/// Error type returned by listeners.
///
/// Boxed so that listeners from different crates can report their own error
/// enums through a single registry.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Reacts to dispatched events.
pub trait EventListener<E: Event>: Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    fn handle(&self, event: &E) -> Result<(), ListenerError>;
}

impl<E, L> EventListener<E> for Arc<L>
where
    E: Event,
    L: EventListener<E> + ?Sized,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn handle(&self, event: &E) -> Result<(), ListenerError> {
        (**self).handle(event)
    }
}

/// Outcome of a single `dispatch` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Registry of listeners for events of type `E`.
pub struct EventDispatcher<E: Event> {
    listeners: Vec<Arc<dyn EventListener<E>>>,
}

impl<E: Event> EventDispatcher<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Listeners run in the order they were registered.
    pub fn listen<L>(&mut self, listener: L) -> &mut Self
    where
        L: EventListener<E> + 'static,
    {
        self.listeners.push(Arc::new(listener));
        self
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver `event` to every registered listener before returning.
    pub fn dispatch(&self, event: &E) -> DispatchReport {
        let mut report = DispatchReport::default();

        for listener in &self.listeners {
            match listener.handle(event) {
                Ok(()) => {
                    debug!(
                        listener = listener.name(),
                        event_type = event.event_type(),
                        "event delivered"
                    );
                    report.delivered += 1;
                }
                Err(err) => {
                    warn!(
                        listener = listener.name(),
                        event_type = event.event_type(),
                        error = %err,
                        "event listener failed"
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Dispatch a batch of events in order.
    pub fn dispatch_all<'a>(&self, events: impl IntoIterator<Item = &'a E>) -> DispatchReport {
        events
            .into_iter()
            .fold(DispatchReport::default(), |mut acc, event| {
                let r = self.dispatch(event);
                acc.delivered += r.delivered;
                acc.failed += r.failed;
                acc
            })
    }
}

impl<E: Event> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<E: Event> core::fmt::Debug for EventDispatcher<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names: Vec<&'static str> = self.listeners.iter().map(|l| l.name()).collect();
        f.debug_struct("EventDispatcher")
            .field("listeners", &names)
            .finish()
    }
}
