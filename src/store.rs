use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use derive_ex::derive_ex;
use serde_json::Value;

use crate::{
    core::Task,
    snapshot::{Object, Snapshot},
    stream::Changes,
    Subscription,
};


thread_local! {
    static PRELOAD: RefCell<Option<Snapshot>> = RefCell::new(None);
}

/// Publishes an initial-state snapshot for stores created later on this
/// thread.
///
/// Every subsequent [`Store::new`] merges its own initial snapshot over the
/// preload, so explicit initial entries win over preloaded ones. Passing
/// `None` clears the preload.
pub fn set_preload(snapshot: Option<Snapshot>) {
    PRELOAD.with(|p| *p.borrow_mut() = snapshot);
}

type SnapshotFn = RefCell<dyn FnMut(&Snapshot)>;

/// A state container holding one immutable [`Snapshot`].
///
/// Reads ([`snapshot`](Self::snapshot), [`get`](Self::get)) are synchronous.
/// Writes ([`set`](Self::set), [`update`](Self::update)) replace the held
/// snapshot synchronously but notify watchers through a single flush task on
/// the thread's [`Runtime`](crate::core::Runtime), so several writes in one
/// tick deliver one notification carrying the last snapshot.
///
/// Cloning a `Store` clones the handle; all clones share the same state.
#[derive(Clone)]
#[derive_ex(Default)]
#[default(Self::new(Snapshot::new()))]
pub struct Store(Rc<StoreNode>);

struct StoreNode {
    data: RefCell<StoreData>,
}

struct StoreData {
    snapshot: Snapshot,
    watchers: Vec<Weak<SnapshotFn>>,
    hooks: Vec<Rc<SnapshotFn>>,
    is_flush_scheduled: bool,
}

impl Store {
    /// Creates a store holding `initial`, merged over any preload published
    /// with [`set_preload`].
    pub fn new(initial: Snapshot) -> Self {
        let snapshot = match PRELOAD.with(|p| p.borrow().clone()) {
            Some(preload) => preload.merged(initial.as_object()),
            None => initial,
        };
        Store(Rc::new(StoreNode {
            data: RefCell::new(StoreData {
                snapshot,
                watchers: Vec::new(),
                hooks: Vec::new(),
                is_flush_scheduled: false,
            }),
        }))
    }

    /// Returns a handle to the snapshot the store currently holds.
    pub fn snapshot(&self) -> Snapshot {
        self.0.data.borrow().snapshot.clone()
    }

    /// Returns the value stored under `namespace`.
    pub fn get(&self, namespace: &str) -> Option<Value> {
        self.0.data.borrow().snapshot.get(namespace).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.0.data.borrow().snapshot.is_empty()
    }

    /// Returns `true` if `namespace` is missing, empty, or not an object.
    pub fn is_empty_in(&self, namespace: &str) -> bool {
        self.0.data.borrow().snapshot.namespace_is_empty(namespace)
    }

    /// Registers a hook that runs synchronously inside every
    /// [`set`](Self::set), after the identity check and before the commit.
    ///
    /// Hooks observe the incoming snapshot while the store still holds the
    /// previous one. They stay registered for the life of the store.
    pub fn before_transform(&self, hook: impl FnMut(&Snapshot) + 'static) -> &Store {
        self.0
            .data
            .borrow_mut()
            .hooks
            .push(Rc::new(RefCell::new(hook)));
        self
    }

    /// Replaces the held snapshot and schedules a flush.
    ///
    /// Hooks run first, then the commit, then a flush task is scheduled
    /// unless one is already pending. Watchers read the held snapshot at
    /// flush time, so they only ever see the latest committed value.
    ///
    /// # Panics
    ///
    /// Panics if `next` is the snapshot the store already holds. Stores never
    /// mutate in place; build the next snapshot with
    /// [`Snapshot::merged`] or [`Snapshot::merged_in`] instead.
    pub fn set(&self, next: Snapshot) {
        self.0.set(next);
    }

    /// Builds a snapshot with `partial` laid over the current one and sets
    /// it.
    pub fn update(&self, partial: Object) {
        let next = self.snapshot().merged(&partial);
        self.set(next);
    }

    /// Merges `partial` into the object under `namespace` and sets the
    /// result.
    pub fn update_in(&self, namespace: &str, partial: Object) {
        let next = self.snapshot().merged_in(namespace, &partial);
        self.set(next);
    }

    /// Registers `watcher` to be called with the held snapshot after each
    /// flush.
    ///
    /// Watchers run in registration order. Dropping the returned
    /// [`Subscription`] unregisters the watcher, even between a write and
    /// the flush it scheduled.
    pub fn watch(&self, watcher: impl FnMut(&Snapshot) + 'static) -> Subscription {
        let entry = Rc::new(RefCell::new(watcher));
        let weak = Rc::downgrade(&entry);
        let weak: Weak<SnapshotFn> = weak;
        let mut data = self.0.data.borrow_mut();
        data.watchers.retain(|w| w.strong_count() > 0);
        data.watchers.push(weak);
        Subscription::from_rc(entry)
    }

    /// Returns a stream yielding the held snapshot after each flush.
    pub fn changes(&self) -> Changes {
        Changes::new(self)
    }
}

impl StoreNode {
    fn set(self: &Rc<Self>, next: Snapshot) {
        let hooks = {
            let data = self.data.borrow();
            if Snapshot::ptr_eq(&data.snapshot, &next) {
                panic!("`Store::set` requires a newly built snapshot, not the one the store already holds.");
            }
            data.hooks.clone()
        };
        for hook in hooks {
            let f = &mut *hook.borrow_mut();
            f(&next);
        }
        let mut data = self.data.borrow_mut();
        data.snapshot = next;
        if !data.is_flush_scheduled {
            data.is_flush_scheduled = true;
            Task::from_weak_fn(Rc::downgrade(self), Self::flush).schedule();
        }
    }

    fn flush(self: Rc<Self>) {
        let (snapshot, watchers) = {
            let mut data = self.data.borrow_mut();
            data.is_flush_scheduled = false;
            data.watchers.retain(|w| w.strong_count() > 0);
            (data.snapshot.clone(), data.watchers.clone())
        };
        for watcher in watchers {
            if let Some(entry) = watcher.upgrade() {
                let f = &mut *entry.borrow_mut();
                f(&snapshot);
            }
        }
    }
}
