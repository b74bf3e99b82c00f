#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use carnac::{Store, StoreEvent, Unsubscribe};
use carnac_value::{Object, Value, ValueMap, ValueSet};
use serde_json::json;

pub const TEST_ID: &str = "test";

pub fn object(v: serde_json::Value) -> Object {
    match Value::from(v) {
        Value::Object(obj) => obj,
        other => panic!("expected an object, got {other:?}"),
    }
}

/// `{a, b, foo: {bar}, arr, map, set}` with an empty sequence, map and set.
pub fn test_state() -> Object {
    let mut state = object(json!({
        "a": "string",
        "b": 0,
        "foo": {"bar": "baz"},
        "arr": [],
    }));
    state.insert("map".into(), Value::Map(ValueMap::new()));
    state.insert("set".into(), Value::Set(ValueSet::new()));
    state
}

/// Store over [`test_state`] with a read-only `computed_a`, a writable
/// `getter_setter` backed by `b`, and a `reset_b` action.
pub fn test_store() -> Store {
    Store::builder(TEST_ID)
        .state(test_state)
        .computed("computed_a", |cx| cx.state()["a"].clone())
        .writable_computed(
            "getter_setter",
            |cx| cx.state()["b"].clone(),
            |state, value| {
                state.insert("b".into(), value);
            },
        )
        .action("reset_b", |store, _| {
            store.update(|state| state.insert("b".into(), Value::from(0)));
            Value::Null
        })
        .build()
}

/// Subscribes a callback that records every event it receives.
pub fn record(store: &Store) -> (Rc<RefCell<Vec<StoreEvent>>>, Unsubscribe) {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    let unsub = store.subscribe(move |evt, _| sink.borrow_mut().push(evt.clone()));
    (events, unsub)
}

pub fn json_events(events: &RefCell<Vec<StoreEvent>>) -> Vec<serde_json::Value> {
    events.borrow().iter().map(StoreEvent::to_json).collect()
}
