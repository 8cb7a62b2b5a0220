//! End-to-end: asset transitions → dispatcher → webhook listener → notifier.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use assetdesk_assets::{Asset, AssetEvent, AssetService, CheckoutTarget, Location, User, UserRef};
use assetdesk_core::{LocationId, UserId};
use assetdesk_events::{BusPublisher, EventDispatcher, EventEnvelope, EventRecorder, InMemoryEventBus};
use assetdesk_notifications::{
    Channel, CheckoutableListener, FakeNotifier, InMemorySettings, NotificationKind,
    NotificationWorker, SettingsStore, WebhookSettings,
};

const ENDPOINT: &str = "https://hooks.example/x";

struct Harness {
    service: AssetService,
    events: EventRecorder<AssetEvent>,
    notifier: FakeNotifier,
    settings: Arc<InMemorySettings>,
}

impl Harness {
    fn new() -> Self {
        assetdesk_observability::init();

        let events = EventRecorder::new();
        let notifier = FakeNotifier::new();
        let settings = Arc::new(InMemorySettings::new(WebhookSettings::slack(ENDPOINT)));

        let mut dispatcher = EventDispatcher::new();
        dispatcher
            .listen(events.clone())
            .listen(CheckoutableListener::new(notifier.clone(), settings.clone()));

        Self {
            service: AssetService::new(dispatcher),
            events,
            notifier,
            settings,
        }
    }

    fn create_asset(&self) -> Asset {
        self.service
            .create(format!("MBP-{}", UserId::new()), "MacBook Pro 13\"")
            .unwrap()
    }

    fn checkout_targets(&self) -> Vec<(&'static str, CheckoutTarget)> {
        vec![
            (
                "asset checked out to user",
                User::new(UserId::new(), "Jane Doe").to_ref().into(),
            ),
            ("asset checked out to asset", self.create_asset().to_ref().into()),
            (
                "asset checked out to location",
                Location::new(LocationId::new(), "Head Office").to_ref().into(),
            ),
        ]
    }

    fn endpoint(&self) -> String {
        self.settings.webhook().unwrap().endpoint
    }
}

fn superuser() -> UserRef {
    User::new(UserId::new(), "Admin").to_ref()
}

#[test]
fn asset_checkout_fires_checkout_event() {
    for enabled in [true, false] {
        let h = Harness::new();
        if !enabled {
            h.settings.disable_webhook().unwrap();
        }
        let mut asset = h.create_asset();

        h.service
            .check_out(&mut asset, User::new(UserId::new(), "Jane").to_ref(), superuser(), "")
            .unwrap();

        h.events.assert_dispatched(AssetEvent::CHECKED_OUT);
        assert_eq!(h.events.dispatched_count(AssetEvent::CHECKED_OUT), 1);
    }
}

#[test]
fn asset_checkout_sends_webhook_notification_when_setting_enabled() {
    let h = Harness::new();
    h.settings.enable_webhook().unwrap();

    for (case, target) in h.checkout_targets() {
        let before = h.notifier.sent_count(NotificationKind::CheckoutAsset);
        let mut asset = h.create_asset();

        h.service.check_out(&mut asset, target, superuser(), "").unwrap();

        let endpoint = h.endpoint();
        h.notifier.assert_sent_to(NotificationKind::CheckoutAsset, |_, notifiable| {
            notifiable.route_for(Channel::Slack) == Some(endpoint.as_str())
        });
        assert_eq!(
            h.notifier.sent_count(NotificationKind::CheckoutAsset),
            before + 1,
            "{case}"
        );
    }
}

#[test]
fn asset_checkout_does_not_send_webhook_notification_when_setting_disabled() {
    let h = Harness::new();
    h.settings.disable_webhook().unwrap();

    for (_, target) in h.checkout_targets() {
        let mut asset = h.create_asset();
        h.service.check_out(&mut asset, target, superuser(), "").unwrap();
    }

    h.notifier.assert_not_sent(NotificationKind::CheckoutAsset);
}

#[test]
fn asset_checkin_sends_webhook_notification_when_setting_enabled() {
    let h = Harness::new();
    h.settings.enable_webhook().unwrap();

    for (case, target) in h.checkout_targets() {
        let mut asset = h.create_asset();
        h.service.check_out(&mut asset, target.clone(), superuser(), "").unwrap();
        let before = h.notifier.sent_count(NotificationKind::CheckinAsset);

        h.service.check_in(&mut asset, superuser(), "").unwrap();

        assert_eq!(
            h.notifier.sent_count(NotificationKind::CheckinAsset),
            before + 1,
            "{case}"
        );
        let last = h.notifier.sent().pop().unwrap();
        assert_eq!(last.notifiable.route_for(Channel::Slack), Some(ENDPOINT));
        assert_eq!(last.notification.as_checkin().unwrap().event.target, target);
    }
}

#[test]
fn asset_checkin_does_not_send_webhook_notification_when_setting_disabled() {
    let h = Harness::new();

    for (_, target) in h.checkout_targets() {
        let mut asset = h.create_asset();
        h.service.check_out(&mut asset, target, superuser(), "").unwrap();
        h.settings.disable_webhook().unwrap();

        h.service.check_in(&mut asset, superuser(), "").unwrap();

        h.settings.enable_webhook().unwrap();
    }

    h.notifier.assert_not_sent(NotificationKind::CheckinAsset);
    assert_eq!(h.notifier.sent_count(NotificationKind::CheckoutAsset), 3);
}

#[test]
fn disabled_location_checkin_sends_no_checkin_notification() {
    let h = Harness::new();
    let mut asset = h.create_asset();
    let location = Location::new(LocationId::new(), "Warehouse").to_ref();
    h.service.check_out(&mut asset, location, superuser(), "").unwrap();

    h.settings.disable_webhook().unwrap();
    h.service.check_in(&mut asset, superuser(), "").unwrap();

    h.events.assert_dispatched(AssetEvent::CHECKED_IN);
    h.notifier.assert_not_sent(NotificationKind::CheckinAsset);
}

#[test]
fn events_published_to_the_bus_reach_the_worker() {
    assetdesk_observability::init();

    let bus = Arc::new(InMemoryEventBus::<EventEnvelope<AssetEvent>>::new());
    let notifier = FakeNotifier::new();
    let settings = Arc::new(InMemorySettings::new(WebhookSettings::slack(ENDPOINT)));
    let worker = NotificationWorker::spawn(
        "asset-webhook-worker",
        &bus,
        CheckoutableListener::new(notifier.clone(), settings),
    )
    .unwrap();

    let mut dispatcher = EventDispatcher::new();
    dispatcher.listen(BusPublisher::new(bus.clone()));
    let service = AssetService::new(dispatcher);

    let mut asset = service.create("MBP-BUS", "MacBook Pro").unwrap();
    service
        .check_out(&mut asset, User::new(UserId::new(), "Jane").to_ref(), superuser(), "desk 4")
        .unwrap();
    service.check_in(&mut asset, superuser(), "").unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while notifier.sent().len() < 2 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    worker.shutdown();

    assert_eq!(notifier.sent_count(NotificationKind::CheckoutAsset), 1);
    assert_eq!(notifier.sent_count(NotificationKind::CheckinAsset), 1);
}
