use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Delivery channel a notifiable can be routed through.
///
/// General-purpose webhooks speak the Slack message format, so they share the
/// `slack` channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Slack,
    GoogleChat,
    MicrosoftTeams,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Slack => "slack",
            Channel::GoogleChat => "google_chat",
            Channel::MicrosoftTeams => "microsoft_teams",
        }
    }
}

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slack" => Ok(Channel::Slack),
            "google_chat" => Ok(Channel::GoogleChat),
            "microsoft_teams" => Ok(Channel::MicrosoftTeams),
            other => Err(format!("unknown channel: {other}")),
        }
    }
}
