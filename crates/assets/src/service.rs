//! Asset application service: run a command, then announce what happened.

use chrono::Utc;
use tracing::info;

use assetdesk_core::{AssetId, DomainResult};
use assetdesk_events::{Event, EventDispatcher, execute};

use crate::asset::{Asset, AssetCommand, AssetEvent, CheckIn, CheckOut, CreateAsset};
use crate::target::{CheckoutTarget, UserRef};

/// Executes asset commands and dispatches the resulting events to every
/// registered listener before returning.
///
/// Events are only dispatched once the aggregate has accepted the command; a
/// rejected command leaves the aggregate untouched and emits nothing.
#[derive(Debug, Default)]
pub struct AssetService {
    dispatcher: EventDispatcher<AssetEvent>,
}

impl AssetService {
    pub fn new(dispatcher: EventDispatcher<AssetEvent>) -> Self {
        Self { dispatcher }
    }

    pub fn execute(&self, asset: &mut Asset, command: &AssetCommand) -> DomainResult<Vec<AssetEvent>> {
        let events = execute(asset, command)?;

        for event in &events {
            let report = self.dispatcher.dispatch(event);
            info!(
                asset_id = %event.asset().id,
                event_type = event.event_type(),
                delivered = report.delivered,
                failed = report.failed,
                "asset event dispatched"
            );
        }

        Ok(events)
    }

    pub fn create(&self, asset_tag: impl Into<String>, name: impl Into<String>) -> DomainResult<Asset> {
        let asset_id = AssetId::new();
        let mut asset = Asset::empty(asset_id);
        let command = AssetCommand::CreateAsset(CreateAsset {
            asset_id,
            asset_tag: asset_tag.into(),
            name: name.into(),
            occurred_at: Utc::now(),
        });
        self.execute(&mut asset, &command)?;
        Ok(asset)
    }

    /// Check `asset` out to `target` on behalf of `actor`.
    pub fn check_out(
        &self,
        asset: &mut Asset,
        target: impl Into<CheckoutTarget>,
        actor: UserRef,
        note: impl Into<String>,
    ) -> DomainResult<Vec<AssetEvent>> {
        let command = AssetCommand::CheckOut(CheckOut {
            asset_id: asset.id_typed(),
            target: target.into(),
            actor,
            note: note.into(),
            occurred_at: Utc::now(),
        });
        self.execute(asset, &command)
    }

    /// Check `asset` in from whoever currently holds it.
    pub fn check_in(
        &self,
        asset: &mut Asset,
        actor: UserRef,
        note: impl Into<String>,
    ) -> DomainResult<Vec<AssetEvent>> {
        let command = AssetCommand::CheckIn(CheckIn {
            asset_id: asset.id_typed(),
            actor,
            note: note.into(),
            occurred_at: Utc::now(),
        });
        self.execute(asset, &command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetdesk_core::{DomainError, LocationId, UserId};
    use assetdesk_events::EventRecorder;

    use crate::target::{Location, User};

    fn service_with_recorder() -> (AssetService, EventRecorder<AssetEvent>) {
        let recorder = EventRecorder::new();
        let mut dispatcher = EventDispatcher::new();
        dispatcher.listen(recorder.clone());
        (AssetService::new(dispatcher), recorder)
    }

    #[test]
    fn checkout_fires_exactly_one_checkout_event() {
        let (service, recorder) = service_with_recorder();
        let mut asset = service.create("LAP-001", "MacBook Pro").unwrap();
        let target = User::new(UserId::new(), "Jane").to_ref();
        let actor = User::new(UserId::new(), "Admin").to_ref();

        service.check_out(&mut asset, target, actor, "").unwrap();

        recorder.assert_dispatched(AssetEvent::CHECKED_OUT);
        assert_eq!(recorder.dispatched_count(AssetEvent::CHECKED_OUT), 1);
        recorder.assert_not_dispatched(AssetEvent::CHECKED_IN);
    }

    #[test]
    fn checkin_fires_checkin_event_for_location() {
        let (service, recorder) = service_with_recorder();
        let mut asset = service.create("LAP-002", "ThinkPad").unwrap();
        let location = Location::new(LocationId::new(), "Warehouse").to_ref();
        let actor = User::new(UserId::new(), "Admin").to_ref();

        service.check_out(&mut asset, location, actor.clone(), "").unwrap();
        recorder.clear();
        service.check_in(&mut asset, actor, "back on shelf").unwrap();

        assert_eq!(recorder.dispatched_count(AssetEvent::CHECKED_IN), 1);
        recorder.assert_not_dispatched(AssetEvent::CHECKED_OUT);
    }

    #[test]
    fn rejected_command_dispatches_nothing() {
        let (service, recorder) = service_with_recorder();
        let mut asset = service.create("LAP-003", "Dell XPS").unwrap();
        recorder.clear();

        let actor = User::new(UserId::new(), "Admin").to_ref();
        let err = service.check_in(&mut asset, actor, "").unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(recorder.recorded().is_empty());
        assert_eq!(asset.checkin_counter(), 0);
    }
}
