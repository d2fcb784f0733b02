//! 变更通知与录制会话集成测试

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use hotbind::notifier::ChangeNotifier;
use hotbind::recording::{PauseFlag, RecordingSession};
use hotbind::Name;

#[test]
fn test_publish_reaches_only_matching_name() {
    let notifier = ChangeNotifier::new();
    let toggle = Name::new("toggle", None);
    let mute = Name::new("mute", None);
    let count = Arc::new(AtomicUsize::new(0));

    let c = Arc::clone(&count);
    let _subscription = notifier.subscribe(&toggle, move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });

    notifier.publish(&mute);
    notifier.publish(&toggle);

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_subscriber_added_during_delivery_waits_for_next_publish() {
    let notifier = ChangeNotifier::new();
    let toggle = Name::new("toggle", None);
    let late_calls = Arc::new(AtomicUsize::new(0));
    let late_subscriptions = Arc::new(Mutex::new(Vec::new()));

    let inner = notifier.clone();
    let calls = Arc::clone(&late_calls);
    let keep = Arc::clone(&late_subscriptions);
    let _subscription = notifier.subscribe(&toggle, move |name| {
        let calls = Arc::clone(&calls);
        let subscription = inner.subscribe(name, move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        });
        keep.lock().unwrap().push(subscription);
    });

    notifier.publish(&toggle);
    assert_eq!(late_calls.load(Ordering::SeqCst), 0);

    notifier.publish(&toggle);
    assert_eq!(late_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_dispose_is_idempotent() {
    let notifier = ChangeNotifier::new();
    let toggle = Name::new("toggle", None);

    let mut subscription = notifier.subscribe(&toggle, |_| {});
    assert_eq!(notifier.subscriber_count(&toggle), 1);

    subscription.dispose();
    subscription.dispose();
    assert!(!subscription.is_active());
    assert_eq!(notifier.subscriber_count(&toggle), 0);
}

#[test]
fn test_subscription_outliving_notifier() {
    let notifier = ChangeNotifier::new();
    let mut subscription = notifier.subscribe(&Name::new("toggle", None), |_| {});

    drop(notifier);
    subscription.dispose();
    assert!(!subscription.is_active());
}

#[test]
fn test_recording_nested_begin_end() {
    let flag = PauseFlag::new();
    let session = RecordingSession::new(flag.clone());

    assert!(!session.end());
    assert!(session.begin());
    assert!(!session.begin());
    assert!(flag.is_paused());

    assert!(session.end());
    assert!(!session.end());
    assert!(!flag.is_paused());
}

#[test]
fn test_recording_guard_ends_on_drop() {
    let session = RecordingSession::default();
    {
        let _guard = session.scoped();
        assert!(session.is_recording());
    }
    assert!(!session.is_recording());
}
