use std::collections::BTreeMap;

use crate::channel::Channel;

/// Recipient with no stored identity, only per-channel routing addresses.
///
/// Built fresh for every dispatch and dropped afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnonymousNotifiable {
    routes: BTreeMap<Channel, String>,
}

impl AnonymousNotifiable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the address used for `channel`.
    pub fn route(mut self, channel: Channel, address: impl Into<String>) -> Self {
        self.routes.insert(channel, address.into());
        self
    }

    pub fn route_for(&self, channel: Channel) -> Option<&str> {
        self.routes.get(&channel).map(String::as_str)
    }

    pub fn routes(&self) -> impl Iterator<Item = (Channel, &str)> {
        self.routes.iter().map(|(c, a)| (*c, a.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
