//! Checkout/checkin → webhook notification routing.

use tracing::{debug, info, warn};

use assetdesk_assets::{AssetEvent, CheckoutableCheckedIn, CheckoutableCheckedOut};
use assetdesk_events::{Event, EventListener, ListenerError};

use crate::channel::Channel;
use crate::error::NotificationError;
use crate::notifiable::AnonymousNotifiable;
use crate::notification::{
    AssetNotification, CheckinAssetNotification, CheckoutAssetNotification, MessageOptions,
    NotificationKind,
};
use crate::notifier::Notifier;
use crate::settings::{SettingsStore, WebhookSettings};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SkipReason {
    WebhookDisabled,
    /// Enabled, but there is no endpoint to route to.
    MissingEndpoint,
    /// Not a checkout or checkin.
    UnsupportedEvent,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent {
        kind: NotificationKind,
        channel: Channel,
    },
    Skipped(SkipReason),
}

/// Listener that turns asset transitions into webhook notifications.
///
/// Settings are read on every event; exactly one notification is sent when
/// the webhook is enabled and none when it is disabled.
#[derive(Debug)]
pub struct CheckoutableListener<N, S> {
    notifier: N,
    settings: S,
}

impl<N, S> CheckoutableListener<N, S>
where
    N: Notifier,
    S: SettingsStore,
{
    pub fn new(notifier: N, settings: S) -> Self {
        Self { notifier, settings }
    }

    pub fn on_checkoutable_transition(
        &self,
        event: &AssetEvent,
    ) -> Result<DispatchOutcome, NotificationError> {
        match event {
            AssetEvent::CheckedOut(e) => self.on_checked_out(e),
            AssetEvent::CheckedIn(e) => self.on_checked_in(e),
            AssetEvent::AssetCreated(_) => {
                debug!(event_type = event.event_type(), "no notification for event");
                Ok(skipped(SkipReason::UnsupportedEvent))
            }
        }
    }

    pub fn on_checked_out(
        &self,
        event: &CheckoutableCheckedOut,
    ) -> Result<DispatchOutcome, NotificationError> {
        self.dispatch(|settings| {
            AssetNotification::Checkout(CheckoutAssetNotification {
                event: event.clone(),
                options: MessageOptions::from(settings),
            })
        })
    }

    pub fn on_checked_in(
        &self,
        event: &CheckoutableCheckedIn,
    ) -> Result<DispatchOutcome, NotificationError> {
        self.dispatch(|settings| {
            AssetNotification::Checkin(CheckinAssetNotification {
                event: event.clone(),
                options: MessageOptions::from(settings),
            })
        })
    }

    fn dispatch<F>(&self, build: F) -> Result<DispatchOutcome, NotificationError>
    where
        F: FnOnce(&WebhookSettings) -> AssetNotification,
    {
        let settings = self.settings.webhook()?;

        if !settings.enabled {
            return Ok(skipped(SkipReason::WebhookDisabled));
        }
        if settings.endpoint.trim().is_empty() {
            warn!("webhook enabled without an endpoint");
            return Ok(skipped(SkipReason::MissingEndpoint));
        }

        let channel = settings.route_channel();
        let recipient = AnonymousNotifiable::new().route(channel, settings.endpoint.clone());
        let notification = build(&settings);
        let kind = notification.kind();

        self.notifier.send(&recipient, &notification)?;

        info!(
            asset_id = %notification.asset().id,
            target_kind = notification.target().kind().as_str(),
            notification = kind.as_str(),
            %channel,
            outcome = "sent",
            "webhook notification sent"
        );
        Ok(DispatchOutcome::Sent { kind, channel })
    }
}

fn skipped(reason: SkipReason) -> DispatchOutcome {
    debug!(outcome = "skipped", ?reason, "webhook notification skipped");
    DispatchOutcome::Skipped(reason)
}

impl<N, S> EventListener<AssetEvent> for CheckoutableListener<N, S>
where
    N: Notifier,
    S: SettingsStore,
{
    fn name(&self) -> &'static str {
        "checkoutable-webhook"
    }

    fn handle(&self, event: &AssetEvent) -> Result<(), ListenerError> {
        self.on_checkoutable_transition(event)?;
        Ok(())
    }
}
