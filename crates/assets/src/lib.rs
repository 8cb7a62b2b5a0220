//! Asset domain module.
//!
//! Business rules for checkoutable assets, implemented as deterministic domain
//! logic (no IO, no HTTP, no storage). State transitions emit
//! [`CheckoutableCheckedOut`] / [`CheckoutableCheckedIn`] events which
//! [`AssetService`] hands to registered listeners.

pub mod asset;
pub mod service;
pub mod target;

pub use asset::{
    Asset, AssetCommand, AssetCreated, AssetEvent, CheckIn, CheckOut, CheckoutableCheckedIn,
    CheckoutableCheckedOut, CreateAsset,
};
pub use service::AssetService;
pub use target::{AssetRef, CheckoutTarget, Location, LocationRef, TargetKind, User, UserRef};
