use super::*;
use assert_call::{call, CallRecorder};

#[test]
fn from_fn_calls_on_drop() {
    let mut cr = CallRecorder::new();
    let s = Subscription::from_fn(|| call!("drop"));
    cr.verify(());
    drop(s);
    cr.verify("drop");
}

#[test]
fn empty_does_nothing() {
    let mut cr = CallRecorder::new();
    {
        let _s = Subscription::empty();
    }
    cr.verify(());
}

#[test]
fn default_does_nothing() {
    let mut cr = CallRecorder::new();
    {
        let _s = Subscription::default();
    }
    cr.verify(());
}

#[test]
fn from_rc_keeps_value_until_drop() {
    struct Tracked;
    impl Drop for Tracked {
        fn drop(&mut self) {
            call!("free");
        }
    }

    let mut cr = CallRecorder::new();
    let rc = Rc::new(Tracked);
    let weak = Rc::downgrade(&rc);
    let s = Subscription::from_rc(rc);
    cr.verify(());
    assert!(weak.upgrade().is_some());

    drop(s);
    cr.verify("free");
    assert!(weak.upgrade().is_none());
}
