use super::*;
use crate::core::Runtime;
use crate::Snapshot;
use serde_json::json;

#[test]
fn default_level_is_debug() {
    assert_eq!(LogLevel::default(), LogLevel::Debug);
}

#[test]
fn log_dispatches_at_every_level() {
    for level in [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Warn,
        LogLevel::Info,
    ] {
        level.log("message");
    }
}

#[test]
fn attach_observes_writes_and_flushes() {
    let mut rt = Runtime::new();
    let store = Store::new(Snapshot::new());
    let s = attach(&store, LogLevel::default());
    store.set(Snapshot::try_from(json!({"n": 1})).unwrap());
    rt.update();

    drop(s);
    store.set(Snapshot::try_from(json!({"n": 2})).unwrap());
    rt.update();
    assert_eq!(store.get("n"), Some(json!(2)));
}
