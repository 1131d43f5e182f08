use std::{any::Any, mem::take, rc::Rc};

#[cfg(test)]
mod tests;

/// A guard that keeps a watcher registered.
///
/// Returned by [`Store::watch`](crate::Store::watch). Dropping the
/// subscription unregisters the watcher, and snapshots committed afterwards
/// are no longer delivered to it.
#[derive(Default)]
#[must_use]
pub struct Subscription(RawSubscription);

impl Subscription {
    /// Creates a subscription that does nothing when dropped.
    pub fn empty() -> Self {
        Subscription(RawSubscription::Empty)
    }

    /// Creates a subscription that calls `f` when dropped.
    pub fn from_fn(f: impl FnOnce() + 'static) -> Self {
        Subscription(RawSubscription::Fn(Box::new(f)))
    }

    /// Creates a subscription that keeps `rc` alive until dropped.
    pub fn from_rc(rc: Rc<dyn Any>) -> Self {
        Subscription(RawSubscription::Rc(rc))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        match take(&mut self.0) {
            RawSubscription::Empty => {}
            RawSubscription::Fn(f) => f(),
            RawSubscription::Rc(_) => {}
        }
    }
}

#[derive(Default)]
enum RawSubscription {
    #[default]
    Empty,
    Fn(Box<dyn FnOnce() + 'static>),
    Rc(#[allow(unused)] Rc<dyn Any>),
}
