//! Background notification worker.
//!
//! Drains an event-bus subscription into a [`CheckoutableListener`] so that
//! webhook HTTP calls happen off the thread performing the checkout.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use assetdesk_assets::AssetEvent;
use assetdesk_events::{EventBus, EventEnvelope, Subscription};

use crate::error::NotificationError;
use crate::notifier::Notifier;
use crate::router::CheckoutableListener;
use crate::settings::SettingsStore;

/// Handle to control and join a background worker.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Request graceful shutdown and wait for the worker to stop.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

#[derive(Debug)]
pub struct NotificationWorker;

impl NotificationWorker {
    /// Spawn a worker thread that routes every envelope from `bus` through
    /// `listener`. Routing failures are logged and the loop continues.
    pub fn spawn<B, N, S>(
        name: &'static str,
        bus: &B,
        listener: CheckoutableListener<N, S>,
    ) -> Result<WorkerHandle, NotificationError>
    where
        B: EventBus<EventEnvelope<AssetEvent>>,
        N: Notifier + 'static,
        S: SettingsStore + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let sub = bus.subscribe();

        let join = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || worker_loop(name, sub, shutdown_rx, &listener))?;

        Ok(WorkerHandle {
            shutdown: shutdown_tx,
            join: Some(join),
        })
    }
}

fn worker_loop<N, S>(
    name: &'static str,
    sub: Subscription<EventEnvelope<AssetEvent>>,
    shutdown_rx: mpsc::Receiver<()>,
    listener: &CheckoutableListener<N, S>,
) where
    N: Notifier,
    S: SettingsStore,
{
    let tick = Duration::from_millis(250);

    loop {
        // Shutdown check (non-blocking)
        if shutdown_rx.try_recv().is_ok() {
            break;
        }

        match sub.recv_timeout(tick) {
            Ok(envelope) => route(name, listener, &envelope),
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => return,
        }
    }

    // Envelopes published before shutdown are still routed.
    let mut drained = 0usize;
    while let Ok(envelope) = sub.try_recv() {
        route(name, listener, &envelope);
        drained += 1;
    }
    debug!(worker = name, drained, "notification worker stopped");
}

fn route<N, S>(
    name: &'static str,
    listener: &CheckoutableListener<N, S>,
    envelope: &EventEnvelope<AssetEvent>,
) where
    N: Notifier,
    S: SettingsStore,
{
    match listener.on_checkoutable_transition(envelope.payload()) {
        Ok(outcome) => debug!(
            worker = name,
            event_id = %envelope.event_id(),
            sequence = envelope.sequence_number(),
            event_type = envelope.event_type(),
            published_at = %envelope.published_at(),
            ?outcome,
            "envelope routed"
        ),
        Err(err) => warn!(
            worker = name,
            event_id = %envelope.event_id(),
            sequence = envelope.sequence_number(),
            error = %err,
            "notification worker failed to route event"
        ),
    }
}
