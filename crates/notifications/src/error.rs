//! Error types for settings access and notification delivery.

use thiserror::Error;

use crate::channel::Channel;

#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings lock was poisoned by a panicking writer.
    #[error("settings lock poisoned")]
    Poisoned,

    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum NotificationError {
    /// The HTTP request could not be completed (connect, timeout, TLS, ...).
    #[error("webhook delivery over {channel} failed: {source}")]
    Delivery {
        channel: Channel,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status.
    #[error("webhook endpoint for {channel} responded with status {status}")]
    Status { channel: Channel, status: u16 },

    /// The HTTP client could not be constructed.
    #[error("failed to build webhook client: {0}")]
    Client(#[source] reqwest::Error),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("failed to spawn notification worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("notifier state poisoned")]
    Poisoned,
}
