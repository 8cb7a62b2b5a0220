//! Notification types and their per-channel message bodies.

use serde_json::{Value as JsonValue, json};

use assetdesk_assets::{AssetRef, CheckoutTarget, CheckoutableCheckedIn, CheckoutableCheckedOut};

use crate::channel::Channel;
use crate::settings::WebhookSettings;

/// Presentation options copied from the settings at dispatch time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOptions {
    pub botname: String,
    /// Chat channel override; `None` posts to the endpoint's default channel.
    pub channel: Option<String>,
}

impl From<&WebhookSettings> for MessageOptions {
    fn from(settings: &WebhookSettings) -> Self {
        let channel = settings.channel.trim();
        Self {
            botname: settings.botname.clone(),
            channel: (!channel.is_empty()).then(|| channel.to_string()),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    CheckoutAsset,
    CheckinAsset,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::CheckoutAsset => "CheckoutAssetNotification",
            NotificationKind::CheckinAsset => "CheckinAssetNotification",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutAssetNotification {
    pub event: CheckoutableCheckedOut,
    pub options: MessageOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckinAssetNotification {
    pub event: CheckoutableCheckedIn,
    pub options: MessageOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetNotification {
    Checkout(CheckoutAssetNotification),
    Checkin(CheckinAssetNotification),
}

/// Fields shared by both message shapes.
struct MessageParts<'a> {
    title: &'static str,
    asset: String,
    counterpart_label: &'static str,
    counterpart: &'a str,
    actor: &'a str,
    note: &'a str,
    options: &'a MessageOptions,
}

impl AssetNotification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            AssetNotification::Checkout(_) => NotificationKind::CheckoutAsset,
            AssetNotification::Checkin(_) => NotificationKind::CheckinAsset,
        }
    }

    pub fn asset(&self) -> &AssetRef {
        match self {
            AssetNotification::Checkout(n) => &n.event.asset,
            AssetNotification::Checkin(n) => &n.event.asset,
        }
    }

    /// Who the asset went to (checkout) or came back from (checkin).
    pub fn target(&self) -> &CheckoutTarget {
        match self {
            AssetNotification::Checkout(n) => &n.event.target,
            AssetNotification::Checkin(n) => &n.event.target,
        }
    }

    pub fn as_checkout(&self) -> Option<&CheckoutAssetNotification> {
        match self {
            AssetNotification::Checkout(n) => Some(n),
            AssetNotification::Checkin(_) => None,
        }
    }

    pub fn as_checkin(&self) -> Option<&CheckinAssetNotification> {
        match self {
            AssetNotification::Checkin(n) => Some(n),
            AssetNotification::Checkout(_) => None,
        }
    }

    fn parts(&self) -> MessageParts<'_> {
        match self {
            AssetNotification::Checkout(n) => MessageParts {
                title: "Asset Checked Out",
                asset: format!("{} ({})", n.event.asset.name, n.event.asset.asset_tag),
                counterpart_label: "To",
                counterpart: self.target().display_name(),
                actor: &n.event.actor.name,
                note: &n.event.note,
                options: &n.options,
            },
            AssetNotification::Checkin(n) => MessageParts {
                title: "Asset Checked In",
                asset: format!("{} ({})", n.event.asset.name, n.event.asset.asset_tag),
                counterpart_label: "From",
                counterpart: self.target().display_name(),
                actor: &n.event.actor.name,
                note: &n.event.note,
                options: &n.options,
            },
        }
    }

    /// Message body for `channel`.
    pub fn to_payload(&self, channel: Channel) -> JsonValue {
        let parts = self.parts();
        match channel {
            Channel::Slack => slack_payload(&parts),
            Channel::GoogleChat | Channel::MicrosoftTeams => json!({ "text": summary(&parts) }),
        }
    }
}

fn slack_payload(parts: &MessageParts<'_>) -> JsonValue {
    let mut fields = vec![
        json!({ "title": parts.counterpart_label, "value": parts.counterpart, "short": true }),
        json!({ "title": "By", "value": parts.actor, "short": true }),
    ];
    if !parts.note.trim().is_empty() {
        fields.push(json!({ "title": "Note", "value": parts.note, "short": false }));
    }

    let mut payload = json!({
        "username": parts.options.botname,
        "attachments": [{
            "title": parts.title,
            "text": parts.asset,
            "fields": fields,
        }],
    });
    if let Some(channel) = &parts.options.channel {
        payload["channel"] = json!(channel);
    }
    payload
}

fn summary(parts: &MessageParts<'_>) -> String {
    let direction = if parts.counterpart_label == "To" { "to" } else { "from" };
    let mut text = format!(
        "*{}*: {} {} {} by {}",
        parts.title, parts.asset, direction, parts.counterpart, parts.actor
    );
    if !parts.note.trim().is_empty() {
        text.push_str(&format!(" (note: {})", parts.note));
    }
    text
}
