//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus fans events out to background consumers such as the notification
//! worker. It is transport-agnostic and makes no persistence promises:
//!
//! - **Broadcast**: each subscription receives a copy of every published message.
//! - **Ordering**: per publisher only; concurrent publishers may interleave.
//! - **No storage**: a message published with no subscribers is dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Receiver;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::dispatcher::{EventListener, ListenerError};
use crate::{Event, EventEnvelope};

/// A subscription to an event stream.
///
/// ## Usage Pattern
///
/// ```ignore
/// let subscription = bus.subscribe();
///
/// loop {
///     match subscription.recv_timeout(Duration::from_millis(250)) {
///         Ok(envelope) => process(envelope)?,
///         Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,  // Check for shutdown
///         Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,  // Bus closed
///     }
/// }
/// ```
///
/// Subscriptions are meant for single-threaded consumption.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Pub/sub abstraction.
///
/// `publish()` can fail (e.g. lock poisoning, transport error). Failures are
/// surfaced to the caller, which decides whether to retry.
///
/// Implementations must be `Send + Sync`; multiple threads may publish
/// concurrently.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}

#[derive(Debug, Error)]
#[error("failed to publish {event_type} to the event bus: {reason}")]
pub struct PublishError {
    pub event_type: &'static str,
    pub reason: String,
}

/// Listener that forwards every dispatched event onto an [`EventBus`].
///
/// Registering a `BusPublisher` with an [`EventDispatcher`](crate::EventDispatcher)
/// bridges the synchronous path to background consumers.
#[derive(Debug)]
pub struct BusPublisher<B> {
    bus: B,
    next_sequence: AtomicU64,
}

impl<B> BusPublisher<B> {
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            next_sequence: AtomicU64::new(1),
        }
    }
}

impl<E, B> EventListener<E> for BusPublisher<B>
where
    E: Event,
    B: EventBus<EventEnvelope<E>>,
{
    fn name(&self) -> &'static str {
        "bus-publisher"
    }

    fn handle(&self, event: &E) -> Result<(), ListenerError> {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope::new(
            Uuid::now_v7(),
            event.event_type(),
            sequence,
            Utc::now(),
            event.clone(),
        );

        self.bus.publish(envelope).map_err(|err| {
            Box::new(PublishError {
                event_type: event.event_type(),
                reason: format!("{err:?}"),
            }) as ListenerError
        })
    }
}
