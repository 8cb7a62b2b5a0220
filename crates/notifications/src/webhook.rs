//! HTTP delivery of notifications to chat webhooks.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::error::NotificationError;
use crate::notifiable::AnonymousNotifiable;
use crate::notification::AssetNotification;
use crate::notifier::Notifier;

#[derive(Debug, Clone)]
pub struct WebhookNotifierConfig {
    /// Per-request timeout (connect + response).
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for WebhookNotifierConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            user_agent: concat!("assetdesk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl WebhookNotifierConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// POSTs the rendered JSON body to each routed address.
///
/// Blocking: the caller's thread waits for every channel to answer. Run it
/// behind a [`NotificationWorker`](crate::NotificationWorker) to keep HTTP
/// latency off the checkout path.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
}

impl WebhookNotifier {
    pub fn new(config: WebhookNotifierConfig) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(NotificationError::Client)?;
        Ok(Self { client })
    }
}

impl Notifier for WebhookNotifier {
    fn send(
        &self,
        notifiable: &AnonymousNotifiable,
        notification: &AssetNotification,
    ) -> Result<(), NotificationError> {
        for (channel, address) in notifiable.routes() {
            let payload = notification.to_payload(channel);

            let response = self
                .client
                .post(address)
                .json(&payload)
                .send()
                .map_err(|source| NotificationError::Delivery { channel, source })?;

            let status = response.status();
            if !status.is_success() {
                warn!(
                    %channel,
                    status = status.as_u16(),
                    notification = notification.kind().as_str(),
                    "webhook endpoint rejected notification"
                );
                return Err(NotificationError::Status {
                    channel,
                    status: status.as_u16(),
                });
            }

            debug!(
                %channel,
                notification = notification.kind().as_str(),
                "webhook notification delivered"
            );
        }
        Ok(())
    }
}
