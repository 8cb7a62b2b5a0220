//! Recording notifier for tests.
//!
//! Nothing leaves the process; every send is kept so tests can assert on the
//! recipient's routes and the notification type.

use std::sync::{Arc, Mutex};

use crate::channel::Channel;
use crate::error::NotificationError;
use crate::notifiable::AnonymousNotifiable;
use crate::notification::{AssetNotification, NotificationKind};
use crate::notifier::Notifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub notifiable: AnonymousNotifiable,
    pub notification: AssetNotification,
}

#[derive(Debug, Clone, Default)]
pub struct FakeNotifier {
    sent: Arc<Mutex<Vec<SentNotification>>>,
    fail_with_status: Option<u16>,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every send fails as if the endpoint answered `status`.
    /// Failed sends are not recorded.
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Self::default()
        }
    }

    /// Every recorded send, oldest first. Panics if the log is poisoned.
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent
            .lock()
            .unwrap_or_else(|_| panic!("fake notifier lock poisoned"))
            .clone()
    }

    pub fn sent_count(&self, kind: NotificationKind) -> usize {
        self.sent()
            .iter()
            .filter(|s| s.notification.kind() == kind)
            .count()
    }

    /// Panics unless a notification of `kind` was sent to a recipient for
    /// which `predicate` holds.
    pub fn assert_sent_to<F>(&self, kind: NotificationKind, predicate: F)
    where
        F: Fn(&AssetNotification, &AnonymousNotifiable) -> bool,
    {
        let sent = self.sent();
        assert!(
            sent.iter()
                .any(|s| s.notification.kind() == kind && predicate(&s.notification, &s.notifiable)),
            "the expected [{}] notification was not sent; sent: {:?}",
            kind.as_str(),
            sent.iter().map(|s| s.notification.kind().as_str()).collect::<Vec<_>>()
        );
    }

    pub fn assert_not_sent(&self, kind: NotificationKind) {
        let count = self.sent_count(kind);
        assert!(
            count == 0,
            "the unexpected [{}] notification was sent {count} time(s)",
            kind.as_str()
        );
    }

    pub fn assert_nothing_sent(&self) {
        let sent = self.sent();
        assert!(sent.is_empty(), "notifications were sent unexpectedly: {sent:?}");
    }
}

impl Notifier for FakeNotifier {
    fn send(
        &self,
        notifiable: &AnonymousNotifiable,
        notification: &AssetNotification,
    ) -> Result<(), NotificationError> {
        if let Some(status) = self.fail_with_status {
            let channel = notifiable
                .routes()
                .next()
                .map(|(c, _)| c)
                .unwrap_or(Channel::Slack);
            return Err(NotificationError::Status { channel, status });
        }

        self.sent
            .lock()
            .map_err(|_| NotificationError::Poisoned)?
            .push(SentNotification {
                notifiable: notifiable.clone(),
                notification: notification.clone(),
            });
        Ok(())
    }
}
