use std::sync::Arc;

use crate::error::NotificationError;
use crate::notifiable::AnonymousNotifiable;
use crate::notification::AssetNotification;

/// Sends a notification to every channel the notifiable has a route for.
pub trait Notifier: Send + Sync {
    fn send(
        &self,
        notifiable: &AnonymousNotifiable,
        notification: &AssetNotification,
    ) -> Result<(), NotificationError>;
}

impl<N> Notifier for Arc<N>
where
    N: Notifier + ?Sized,
{
    fn send(
        &self,
        notifiable: &AnonymousNotifiable,
        notification: &AssetNotification,
    ) -> Result<(), NotificationError> {
        (**self).send(notifiable, notification)
    }
}
