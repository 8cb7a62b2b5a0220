//! Checkout/checkin webhook notifications.
//!
//! [`CheckoutableListener`] subscribes to asset transition events, reads the
//! site-wide [`WebhookSettings`] on every event, and (only when the webhook is
//! enabled) sends a [`CheckoutAssetNotification`] or
//! [`CheckinAssetNotification`] to an [`AnonymousNotifiable`] whose route for
//! the selected channel is the configured endpoint.

pub mod channel;
pub mod error;
pub mod fake;
pub mod notifiable;
pub mod notification;
pub mod notifier;
pub mod router;
pub mod settings;
pub mod webhook;
pub mod worker;

pub use channel::Channel;
pub use error::{NotificationError, SettingsError};
pub use fake::{FakeNotifier, SentNotification};
pub use notifiable::AnonymousNotifiable;
pub use notification::{
    AssetNotification, CheckinAssetNotification, CheckoutAssetNotification, MessageOptions,
    NotificationKind,
};
pub use notifier::Notifier;
pub use router::{CheckoutableListener, DispatchOutcome, SkipReason};
pub use settings::{InMemorySettings, SettingsStore, WebhookKind, WebhookSettings};
pub use webhook::{WebhookNotifier, WebhookNotifierConfig};
pub use worker::{NotificationWorker, WorkerHandle};
