use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use assetdesk_core::{Aggregate, AggregateRoot, AssetId, DomainError};
use assetdesk_events::Event;

use crate::target::{AssetRef, CheckoutTarget, UserRef};

/// Aggregate root: Asset (a checkoutable).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    id: AssetId,
    asset_tag: String,
    name: String,
    assigned_to: Option<CheckoutTarget>,
    last_checkout: Option<DateTime<Utc>>,
    checkout_counter: u64,
    checkin_counter: u64,
    version: u64,
    created: bool,
}

impl Asset {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: AssetId) -> Self {
        Self {
            id,
            asset_tag: String::new(),
            name: String::new(),
            assigned_to: None,
            last_checkout: None,
            checkout_counter: 0,
            checkin_counter: 0,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> AssetId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn asset_tag(&self) -> &str {
        &self.asset_tag
    }

    pub fn assigned_to(&self) -> Option<&CheckoutTarget> {
        self.assigned_to.as_ref()
    }

    pub fn is_checked_out(&self) -> bool {
        self.assigned_to.is_some()
    }

    pub fn last_checkout(&self) -> Option<DateTime<Utc>> {
        self.last_checkout
    }

    pub fn checkout_counter(&self) -> u64 {
        self.checkout_counter
    }

    pub fn checkin_counter(&self) -> u64 {
        self.checkin_counter
    }

    pub fn to_ref(&self) -> AssetRef {
        AssetRef {
            id: self.id,
            asset_tag: self.asset_tag.clone(),
            name: self.name.clone(),
        }
    }
}

impl AggregateRoot for Asset {
    type Id = AssetId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateAsset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAsset {
    pub asset_id: AssetId,
    pub asset_tag: String,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CheckOut (assign the asset to a user, asset or location).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOut {
    pub asset_id: AssetId,
    pub target: CheckoutTarget,
    pub actor: UserRef,
    pub note: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CheckIn (reclaim the asset from its current assignee).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub asset_id: AssetId,
    pub actor: UserRef,
    pub note: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetCommand {
    CreateAsset(CreateAsset),
    CheckOut(CheckOut),
    CheckIn(CheckIn),
}

/// Event: AssetCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCreated {
    pub asset: AssetRef,
    pub occurred_at: DateTime<Utc>,
}

/// Event: an asset was checked out to `target` by `actor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutableCheckedOut {
    pub asset: AssetRef,
    pub target: CheckoutTarget,
    pub actor: UserRef,
    pub note: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: an asset was checked in from `target` by `actor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutableCheckedIn {
    pub asset: AssetRef,
    pub target: CheckoutTarget,
    pub actor: UserRef,
    pub note: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetEvent {
    AssetCreated(AssetCreated),
    CheckedOut(CheckoutableCheckedOut),
    CheckedIn(CheckoutableCheckedIn),
}

impl AssetEvent {
    pub const CREATED: &'static str = "asset.created";
    pub const CHECKED_OUT: &'static str = "asset.checked_out";
    pub const CHECKED_IN: &'static str = "asset.checked_in";

    pub fn asset(&self) -> &AssetRef {
        match self {
            AssetEvent::AssetCreated(e) => &e.asset,
            AssetEvent::CheckedOut(e) => &e.asset,
            AssetEvent::CheckedIn(e) => &e.asset,
        }
    }
}

impl Event for AssetEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AssetEvent::AssetCreated(_) => Self::CREATED,
            AssetEvent::CheckedOut(_) => Self::CHECKED_OUT,
            AssetEvent::CheckedIn(_) => Self::CHECKED_IN,
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AssetEvent::AssetCreated(e) => e.occurred_at,
            AssetEvent::CheckedOut(e) => e.occurred_at,
            AssetEvent::CheckedIn(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Asset {
    type Command = AssetCommand;
    type Event = AssetEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            AssetEvent::AssetCreated(e) => {
                self.id = e.asset.id;
                self.asset_tag = e.asset.asset_tag.clone();
                self.name = e.asset.name.clone();
                self.assigned_to = None;
                self.created = true;
            }
            AssetEvent::CheckedOut(e) => {
                self.assigned_to = Some(e.target.clone());
                self.last_checkout = Some(e.occurred_at);
                self.checkout_counter += 1;
            }
            AssetEvent::CheckedIn(_) => {
                self.assigned_to = None;
                self.checkin_counter += 1;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            AssetCommand::CreateAsset(cmd) => self.handle_create(cmd),
            AssetCommand::CheckOut(cmd) => self.handle_checkout(cmd),
            AssetCommand::CheckIn(cmd) => self.handle_checkin(cmd),
        }
    }
}

impl Asset {
    fn ensure_asset_id(&self, asset_id: AssetId) -> Result<(), DomainError> {
        if self.id != asset_id {
            return Err(DomainError::invariant("asset_id mismatch"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateAsset) -> Result<Vec<AssetEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("asset already exists"));
        }
        if cmd.asset_tag.trim().is_empty() {
            return Err(DomainError::validation("asset_tag cannot be empty"));
        }
        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        Ok(vec![AssetEvent::AssetCreated(AssetCreated {
            asset: AssetRef {
                id: cmd.asset_id,
                asset_tag: cmd.asset_tag.clone(),
                name: cmd.name.clone(),
            },
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_checkout(&self, cmd: &CheckOut) -> Result<Vec<AssetEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_asset_id(cmd.asset_id)?;

        if self.assigned_to.is_some() {
            return Err(DomainError::conflict("asset is already checked out"));
        }
        if let CheckoutTarget::Asset(target) = &cmd.target {
            if target.id == self.id {
                return Err(DomainError::invariant("asset cannot be checked out to itself"));
            }
        }

        Ok(vec![AssetEvent::CheckedOut(CheckoutableCheckedOut {
            asset: self.to_ref(),
            target: cmd.target.clone(),
            actor: cmd.actor.clone(),
            note: cmd.note.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_checkin(&self, cmd: &CheckIn) -> Result<Vec<AssetEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_asset_id(cmd.asset_id)?;

        let Some(target) = &self.assigned_to else {
            return Err(DomainError::conflict("asset is not checked out"));
        };

        Ok(vec![AssetEvent::CheckedIn(CheckoutableCheckedIn {
            asset: self.to_ref(),
            target: target.clone(),
            actor: cmd.actor.clone(),
            note: cmd.note.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetdesk_core::{LocationId, UserId};
    use assetdesk_events::execute;
    use proptest::prelude::*;

    use crate::target::{Location, User};

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn test_actor() -> UserRef {
        User::new(UserId::new(), "Admin").to_ref()
    }

    fn created_asset() -> Asset {
        let id = AssetId::new();
        let mut asset = Asset::empty(id);
        execute(
            &mut asset,
            &AssetCommand::CreateAsset(CreateAsset {
                asset_id: id,
                asset_tag: "LAP-001".to_string(),
                name: "MacBook Pro 13\"".to_string(),
                occurred_at: test_time(),
            }),
        )
        .unwrap();
        asset
    }

    fn checkout_cmd(asset: &Asset, target: CheckoutTarget) -> AssetCommand {
        AssetCommand::CheckOut(CheckOut {
            asset_id: asset.id_typed(),
            target,
            actor: test_actor(),
            note: String::new(),
            occurred_at: test_time(),
        })
    }

    fn checkin_cmd(asset: &Asset) -> AssetCommand {
        AssetCommand::CheckIn(CheckIn {
            asset_id: asset.id_typed(),
            actor: test_actor(),
            note: "returned".to_string(),
            occurred_at: test_time(),
        })
    }

    #[test]
    fn create_asset_emits_asset_created_event() {
        let asset = created_asset();
        assert_eq!(asset.version(), 1);
        assert_eq!(asset.asset_tag(), "LAP-001");
        assert!(!asset.is_checked_out());
    }

    #[test]
    fn empty_asset_tag_is_rejected() {
        let id = AssetId::new();
        let asset = Asset::empty(id);
        let err = asset
            .handle(&AssetCommand::CreateAsset(CreateAsset {
                asset_id: id,
                asset_tag: "  ".to_string(),
                name: "Laptop".to_string(),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn checkout_to_user_emits_checked_out_event() {
        let asset = created_asset();
        let user = User::new(UserId::new(), "Jane Doe").to_ref();

        let events = asset
            .handle(&checkout_cmd(&asset, CheckoutTarget::User(user.clone())))
            .unwrap();
        assert_eq!(events.len(), 1);

        match &events[0] {
            AssetEvent::CheckedOut(e) => {
                assert_eq!(e.asset.id, asset.id_typed());
                assert_eq!(e.target, CheckoutTarget::User(user));
                assert!(e.note.is_empty());
            }
            _ => panic!("Expected CheckedOut event"),
        }
    }

    #[test]
    fn checkout_updates_assignment_and_counter() {
        let mut asset = created_asset();
        let location = Location::new(LocationId::new(), "HQ").to_ref();

        let cmd = checkout_cmd(&asset, location.clone().into());
        execute(&mut asset, &cmd).unwrap();

        assert_eq!(asset.assigned_to(), Some(&CheckoutTarget::Location(location)));
        assert_eq!(asset.checkout_counter(), 1);
        assert!(asset.last_checkout().is_some());
    }

    #[test]
    fn cannot_check_out_twice() {
        let mut asset = created_asset();
        let user = User::new(UserId::new(), "Jane").to_ref();
        let cmd = checkout_cmd(&asset, user.clone().into());
        execute(&mut asset, &cmd).unwrap();

        let err = asset.handle(&checkout_cmd(&asset, user.into())).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn cannot_check_out_to_itself() {
        let asset = created_asset();
        let err = asset
            .handle(&checkout_cmd(&asset, asset.to_ref().into()))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn checkout_of_missing_asset_is_not_found() {
        let asset = Asset::empty(AssetId::new());
        let user = User::new(UserId::new(), "Jane").to_ref();
        let err = asset.handle(&checkout_cmd(&asset, user.into())).unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn checkin_targets_current_assignee() {
        let mut asset = created_asset();
        let other = created_asset();
        let cmd = checkout_cmd(&asset, other.to_ref().into());
        execute(&mut asset, &cmd).unwrap();

        let cmd = checkin_cmd(&asset);
        let events = execute(&mut asset, &cmd).unwrap();

        match &events[0] {
            AssetEvent::CheckedIn(e) => {
                assert_eq!(e.target, CheckoutTarget::Asset(other.to_ref()));
                assert_eq!(e.note, "returned");
            }
            _ => panic!("Expected CheckedIn event"),
        }
        assert!(!asset.is_checked_out());
        assert_eq!(asset.checkin_counter(), 1);
    }

    #[test]
    fn cannot_check_in_an_available_asset() {
        let asset = created_asset();
        let err = asset.handle(&checkin_cmd(&asset)).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: alternating checkout/checkin keeps the counters in step
        /// and the asset is available whenever the counters are equal.
        #[test]
        fn counters_track_alternating_transitions(cycles in 1usize..20, trailing_checkout in any::<bool>()) {
            let mut asset = created_asset();
            let user = User::new(UserId::new(), "Jane").to_ref();

            for _ in 0..cycles {
                let cmd = checkout_cmd(&asset, user.clone().into());
                execute(&mut asset, &cmd).unwrap();
                let cmd = checkin_cmd(&asset);
                execute(&mut asset, &cmd).unwrap();
            }
            if trailing_checkout {
                let cmd = checkout_cmd(&asset, user.clone().into());
                execute(&mut asset, &cmd).unwrap();
            }

            let expected_out = cycles as u64 + u64::from(trailing_checkout);
            prop_assert_eq!(asset.checkout_counter(), expected_out);
            prop_assert_eq!(asset.checkin_counter(), cycles as u64);
            prop_assert_eq!(asset.is_checked_out(), trailing_checkout);
            prop_assert_eq!(asset.version(), 1 + expected_out + cycles as u64);
        }
    }
}
