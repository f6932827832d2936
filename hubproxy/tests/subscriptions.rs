//! Subscribe, replace and unsubscribe behavior of the dynamic proxy.

use hubproxy::testing::MockHub;
use hubproxy::{DeliveryError, DynamicHubProxy, Handler, MemberValue};
use serde::Deserialize;
use serde_json::json;

mod common;
use common::{Recorder, tokens};

#[test]
fn test_message_received_scenario() {
    let hub = MockHub::new();
    let mut proxy = DynamicHubProxy::new(hub.clone());
    let received = Recorder::new();

    let r = received.clone();
    proxy.on("messageReceived", move |user: String, text: String| {
        r.push((user, text));
    });

    let results = hub.emit("messageReceived", &tokens(&["alice", "hello"]));
    assert_eq!(results.len(), 1);
    assert!(results[0].is_ok());
    assert_eq!(
        received.values(),
        vec![("alice".to_string(), "hello".to_string())]
    );
}

#[test]
fn test_tokens_converted_to_declared_types() {
    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Position {
        lat: f64,
        lon: f64,
    }

    let hub = MockHub::new();
    let mut proxy = DynamicHubProxy::new(hub.clone());
    let received = Recorder::new();

    let r = received.clone();
    proxy.on(
        "moved",
        move |id: u64, at: Position, tags: Vec<String>| r.push((id, at, tags)),
    );

    hub.emit(
        "moved",
        &[
            json!(7),
            json!({ "lat": 35.5, "lon": 139.7 }),
            json!(["a", "b"]),
            json!("surplus"),
        ],
    );

    assert_eq!(
        received.values(),
        vec![(
            7,
            Position {
                lat: 35.5,
                lon: 139.7
            },
            vec!["a".to_string(), "b".to_string()]
        )]
    );
}

#[test]
fn test_events_delivered_in_order() {
    let hub = MockHub::new();
    let mut proxy = DynamicHubProxy::new(hub.clone());
    let received = Recorder::new();

    let r = received.clone();
    proxy.on("count", move |n: i32| r.push(n));
    for n in 0..5 {
        hub.emit("count", &[json!(n)]);
    }

    assert_eq!(received.values(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_null_assignment_detaches() {
    let hub = MockHub::new();
    let mut proxy = DynamicHubProxy::new(hub.clone());
    let received = Recorder::new();

    let r = received.clone();
    proxy.on("tick", move || r.push(()));
    hub.emit("tick", &[]);
    assert_eq!(received.count(), 1);

    proxy.set("tick", MemberValue::Null);
    assert!(hub.emit("tick", &[]).is_empty());
    assert_eq!(received.count(), 1);
    assert_eq!(hub.handler_count("tick"), 0);
}

#[test]
fn test_reassignment_replaces_callback() {
    let hub = MockHub::new();
    let mut proxy = DynamicHubProxy::new(hub.clone());
    let first = Recorder::new();
    let second = Recorder::new();

    let f = first.clone();
    proxy.on("tick", move || f.push(()));
    let s = second.clone();
    proxy.on("tick", move || s.push(()));

    assert_eq!(hub.handler_count("tick"), 1);
    assert_eq!(hub.emit("tick", &[]).len(), 1);
    assert_eq!(first.count(), 0);
    assert_eq!(second.count(), 1);
}

#[test]
fn test_same_handler_assigned_twice_delivers_once() {
    let hub = MockHub::new();
    let mut proxy = DynamicHubProxy::new(hub.clone());
    let received = Recorder::new();

    let r = received.clone();
    let handler = Handler::new(move |n: i32| r.push(n));
    proxy.set("n", handler.clone());
    proxy.set("n", handler);

    hub.emit("n", &[json!(1)]);
    assert_eq!(received.values(), vec![1]);
}

#[test]
fn test_null_on_unknown_member_is_noop() {
    let hub = MockHub::new();
    let mut proxy = DynamicHubProxy::new(hub.clone());

    proxy.set("never", None::<Handler>);
    proxy.set("never", ());

    assert!(!proxy.is_subscribed("never"));
    assert_eq!(hub.subscribe_calls(), 0);
}

#[test]
fn test_members_are_independent() {
    let hub = MockHub::new();
    let mut proxy = DynamicHubProxy::new(hub.clone());
    let a = Recorder::new();
    let b = Recorder::new();

    let ra = a.clone();
    proxy.on("a", move |s: String| ra.push(s));
    let rb = b.clone();
    proxy.on("b", move |s: String| rb.push(s));

    proxy.off("a");
    hub.emit("a", &tokens(&["x"]));
    hub.emit("b", &tokens(&["y"]));

    assert_eq!(a.count(), 0);
    assert_eq!(b.values(), vec!["y".to_string()]);

    let mut names: Vec<&str> = proxy.subscriptions().collect();
    names.sort_unstable();
    assert_eq!(names, vec!["b"]);
}

#[test]
fn test_arity_fault_keeps_subscription() {
    let hub = MockHub::new();
    let mut proxy = DynamicHubProxy::new(hub.clone());
    let received = Recorder::new();

    let r = received.clone();
    proxy.on("pair", move |a: String, b: String| r.push(format!("{a}{b}")));

    let results = hub.emit("pair", &tokens(&["only"]));
    assert!(matches!(
        results.as_slice(),
        [Err(DeliveryError::Arity {
            expected: 2,
            received: 1
        })]
    ));
    assert_eq!(received.count(), 0);

    hub.emit("pair", &tokens(&["a", "b"]));
    assert_eq!(received.values(), vec!["ab".to_string()]);
    assert!(proxy.is_subscribed("pair"));
}

#[test]
fn test_conversion_fault_keeps_subscription() {
    let hub = MockHub::new();
    let mut proxy = DynamicHubProxy::new(hub.clone());
    let received = Recorder::new();

    let r = received.clone();
    proxy.on("score", move |points: u32| r.push(points));

    let results = hub.emit("score", &[json!("ten")]);
    match results.as_slice() {
        [Err(DeliveryError::Conversion { index, expected, .. })] => {
            assert_eq!(*index, 0);
            assert_eq!(*expected, "u32");
        }
        other => panic!("unexpected results: {other:?}"),
    }

    hub.emit("score", &[json!(10)]);
    assert_eq!(received.values(), vec![10]);
}

#[test]
fn test_null_tokens_per_argument() {
    let hub = MockHub::new();
    let mut proxy = DynamicHubProxy::new(hub.clone());
    let received = Recorder::new();

    let r = received.clone();
    proxy.on(
        "status",
        move |user: Option<String>, note: Option<String>| r.push((user, note)),
    );

    hub.emit("status", &[json!(null), json!("away")]);
    hub.emit("status", &[json!("bob"), json!(null)]);

    assert_eq!(
        received.values(),
        vec![
            (None, Some("away".to_string())),
            (Some("bob".to_string()), None)
        ]
    );
}

#[test]
fn test_member_handle() {
    let hub = MockHub::new();
    let mut proxy = DynamicHubProxy::new(hub.clone());
    let received = Recorder::new();

    let r = received.clone();
    let member = proxy.member("joined");
    assert_eq!(member.name(), "joined");
    member.set(Handler::new(move |user: String| r.push(user)));
    assert!(proxy.member("joined").is_subscribed());

    hub.emit("joined", &tokens(&["carol"]));
    assert_eq!(received.values(), vec!["carol".to_string()]);

    proxy.member("joined").set(());
    assert_eq!(hub.handler_count("joined"), 0);
}

#[test]
fn test_close_detaches_all() {
    let hub = MockHub::new();
    let mut proxy = DynamicHubProxy::new(hub.clone());
    proxy.on("a", || {});
    proxy.on("b", || {});
    proxy.on("c", |_s: String| {});

    proxy.close();

    assert_eq!(proxy.subscriptions().count(), 0);
    for name in ["a", "b", "c"] {
        assert_eq!(hub.handler_count(name), 0);
    }

    // The proxy stays usable after closing.
    proxy.on("a", || {});
    assert_eq!(hub.handler_count("a"), 1);
}
