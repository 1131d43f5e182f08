use super::*;
use assert_call::{call, CallRecorder};
use futures::FutureExt;
use std::cell::Cell;

fn on_run(this: Rc<Cell<u32>>) {
    call!("{}", this.get());
}

#[test]
fn run_tasks_is_fifo() {
    let mut cr = CallRecorder::new();
    let mut rt = Runtime::new();
    Task::new(|| call!("1")).schedule();
    Task::new(|| call!("2")).schedule();
    cr.verify(());
    assert!(rt.run_tasks());
    cr.verify(["1", "2"]);
}

#[test]
fn run_tasks_empty_returns_false() {
    let mut rt = Runtime::new();
    assert!(!rt.run_tasks());
}

#[test]
fn task_scheduled_while_running_waits_for_next_call() {
    let mut cr = CallRecorder::new();
    let mut rt = Runtime::new();
    Task::new(|| {
        call!("outer");
        Task::new(|| call!("inner")).schedule();
    })
    .schedule();
    rt.run_tasks();
    cr.verify("outer");
    rt.run_tasks();
    cr.verify("inner");
}

#[test]
fn update_runs_tasks_scheduled_while_running() {
    let mut cr = CallRecorder::new();
    let mut rt = Runtime::new();
    Task::new(|| {
        call!("outer");
        Task::new(|| call!("inner")).schedule();
    })
    .schedule();
    rt.update();
    cr.verify(["outer", "inner"]);
}

#[test]
fn from_weak_fn_runs_while_target_alive() {
    let mut cr = CallRecorder::new();
    let mut rt = Runtime::new();
    let this = Rc::new(Cell::new(5));
    Task::from_weak_fn(Rc::downgrade(&this), on_run).schedule();
    rt.update();
    cr.verify("5");
}

#[test]
fn from_weak_fn_noop_when_target_dropped() {
    let mut cr = CallRecorder::new();
    let mut rt = Runtime::new();
    let this = Rc::new(Cell::new(5));
    Task::from_weak_fn(Rc::downgrade(&this), on_run).schedule();
    drop(this);
    assert!(rt.run_tasks());
    cr.verify(());
}

#[test]
fn task_scheduled_before_runtime_runs_under_later_runtime() {
    let mut cr = CallRecorder::new();
    Task::new(|| call!("late")).schedule();
    cr.verify(());
    let mut rt = Runtime::new();
    rt.update();
    cr.verify("late");
}

#[test]
#[should_panic(expected = "Only one `Runtime`")]
fn new_twice_panics() {
    let _rt0 = Runtime::new();
    let _rt1 = Runtime::new();
}

#[test]
fn new_after_drop() {
    drop(Runtime::new());
    let _rt = Runtime::new();
}

#[test]
fn wait_for_ready_pends_until_task_scheduled() {
    let mut rt = Runtime::new();
    assert!(rt.wait_for_ready().now_or_never().is_none());
    Task::new(|| {}).schedule();
    assert!(rt.wait_for_ready().now_or_never().is_some());
    rt.update();
}
