//! Checkout targets and the entities that can hold an asset.

use serde::{Deserialize, Serialize};

use assetdesk_core::{AssetId, Entity, LocationId, UserId};

/// Lightweight reference to a user, carried inside events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    pub name: String,
}

/// Lightweight reference to an asset, carried inside events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub id: AssetId,
    pub asset_tag: String,
    pub name: String,
}

/// Lightweight reference to a location, carried inside events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    pub id: LocationId,
    pub name: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    User,
    Asset,
    Location,
}

impl TargetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::User => "user",
            TargetKind::Asset => "asset",
            TargetKind::Location => "location",
        }
    }
}

/// Who (or what) an asset is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckoutTarget {
    User(UserRef),
    Asset(AssetRef),
    Location(LocationRef),
}

impl CheckoutTarget {
    pub fn kind(&self) -> TargetKind {
        match self {
            CheckoutTarget::User(_) => TargetKind::User,
            CheckoutTarget::Asset(_) => TargetKind::Asset,
            CheckoutTarget::Location(_) => TargetKind::Location,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            CheckoutTarget::User(u) => u.display_name(),
            CheckoutTarget::Asset(a) => a.display_name(),
            CheckoutTarget::Location(l) => l.display_name(),
        }
    }
}

impl Entity for UserRef {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Entity for AssetRef {
    type Id = AssetId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Entity for LocationRef {
    type Id = LocationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl From<UserRef> for CheckoutTarget {
    fn from(value: UserRef) -> Self {
        CheckoutTarget::User(value)
    }
}

impl From<AssetRef> for CheckoutTarget {
    fn from(value: AssetRef) -> Self {
        CheckoutTarget::Asset(value)
    }
}

impl From<LocationRef> for CheckoutTarget {
    fn from(value: LocationRef) -> Self {
        CheckoutTarget::Location(value)
    }
}

/// A person who can receive assets and act on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn to_ref(&self) -> UserRef {
        UserRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}


/// A physical place assets can be deployed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    id: LocationId,
    name: String,
}

impl Location {
    pub fn new(id: LocationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn to_ref(&self) -> LocationRef {
        LocationRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}
