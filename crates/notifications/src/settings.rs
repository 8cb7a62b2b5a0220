//! Site-wide webhook settings.
//!
//! The router never caches settings: it calls [`SettingsStore::webhook`] once
//! per event so administrative toggles take effect on the next transition.

use core::str::FromStr;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::channel::Channel;
use crate::error::SettingsError;

/// Which chat integration the endpoint belongs to.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookKind {
    #[default]
    Slack,
    General,
    Google,
    MicrosoftTeams,
}

impl WebhookKind {
    /// Channel notifications for this integration are delivered through.
    pub fn channel(self) -> Channel {
        match self {
            WebhookKind::Slack | WebhookKind::General => Channel::Slack,
            WebhookKind::Google => Channel::GoogleChat,
            WebhookKind::MicrosoftTeams => Channel::MicrosoftTeams,
        }
    }
}

impl FromStr for WebhookKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slack" => Ok(WebhookKind::Slack),
            "general" => Ok(WebhookKind::General),
            "google" => Ok(WebhookKind::Google),
            "microsoft" | "microsoft_teams" | "teams" => Ok(WebhookKind::MicrosoftTeams),
            other => Err(format!("unknown webhook kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookSettings {
    pub enabled: bool,
    pub endpoint: String,
    /// Target chat channel (e.g. `#it`); empty means the endpoint's default.
    pub channel: String,
    pub botname: String,
    pub selected: WebhookKind,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            channel: String::new(),
            botname: "AssetDesk".to_string(),
            selected: WebhookKind::default(),
        }
    }
}

impl WebhookSettings {
    pub const ENV_ENABLED: &'static str = "ASSETDESK_WEBHOOK_ENABLED";
    pub const ENV_ENDPOINT: &'static str = "ASSETDESK_WEBHOOK_ENDPOINT";
    pub const ENV_CHANNEL: &'static str = "ASSETDESK_WEBHOOK_CHANNEL";
    pub const ENV_BOTNAME: &'static str = "ASSETDESK_WEBHOOK_BOTNAME";
    pub const ENV_SELECTED: &'static str = "ASSETDESK_WEBHOOK_SELECTED";

    /// Enabled settings pointing at a Slack-compatible `endpoint`.
    pub fn slack(endpoint: impl Into<String>) -> Self {
        Self {
            enabled: true,
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Channel the selected integration is routed through.
    pub fn route_channel(&self) -> Channel {
        self.selected.channel()
    }

    /// Load settings from `ASSETDESK_WEBHOOK_*` environment variables.
    ///
    /// Unset variables keep their defaults (webhook disabled).
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(Self::ENV_ENABLED) {
            settings.enabled = parse_bool(&raw).ok_or(SettingsError::InvalidEnv {
                var: Self::ENV_ENABLED,
                value: raw,
            })?;
        }
        if let Some(endpoint) = lookup(Self::ENV_ENDPOINT) {
            settings.endpoint = endpoint;
        }
        if let Some(channel) = lookup(Self::ENV_CHANNEL) {
            settings.channel = channel;
        }
        if let Some(botname) = lookup(Self::ENV_BOTNAME) {
            settings.botname = botname;
        }
        if let Some(raw) = lookup(Self::ENV_SELECTED) {
            settings.selected = raw.parse().map_err(|_| SettingsError::InvalidEnv {
                var: Self::ENV_SELECTED,
                value: raw,
            })?;
        }

        Ok(settings)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Read access to the webhook settings.
pub trait SettingsStore: Send + Sync {
    fn webhook(&self) -> Result<WebhookSettings, SettingsError>;
}

impl<S> SettingsStore for Arc<S>
where
    S: SettingsStore + ?Sized,
{
    fn webhook(&self) -> Result<WebhookSettings, SettingsError> {
        (**self).webhook()
    }
}

/// Process-wide settings held in memory and mutated by administrative action.
#[derive(Debug, Default)]
pub struct InMemorySettings {
    webhook: RwLock<WebhookSettings>,
}

impl InMemorySettings {
    pub fn new(webhook: WebhookSettings) -> Self {
        Self {
            webhook: RwLock::new(webhook),
        }
    }

    pub fn enable_webhook(&self) -> Result<(), SettingsError> {
        self.modify(|s| s.enabled = true)
    }

    pub fn disable_webhook(&self) -> Result<(), SettingsError> {
        self.modify(|s| s.enabled = false)
    }

    pub fn set_endpoint(&self, endpoint: impl Into<String>) -> Result<(), SettingsError> {
        let endpoint = endpoint.into();
        self.modify(move |s| s.endpoint = endpoint)
    }

    /// Replace all webhook settings at once.
    pub fn update(&self, settings: WebhookSettings) -> Result<(), SettingsError> {
        self.modify(move |s| *s = settings)
    }

    fn modify(&self, f: impl FnOnce(&mut WebhookSettings)) -> Result<(), SettingsError> {
        let mut guard = self.webhook.write().map_err(|_| SettingsError::Poisoned)?;
        f(&mut *guard);
        info!(
            enabled = guard.enabled,
            selected = ?guard.selected,
            "webhook settings updated"
        );
        Ok(())
    }
}

impl SettingsStore for InMemorySettings {
    fn webhook(&self) -> Result<WebhookSettings, SettingsError> {
        self.webhook
            .read()
            .map(|s| s.clone())
            .map_err(|_| SettingsError::Poisoned)
    }
}
