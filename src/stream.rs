use std::{
    cell::RefCell,
    mem::{replace, take},
    pin::Pin,
    rc::Rc,
    task::{Context, Poll, Waker},
};

use futures::Stream;

use crate::{Snapshot, Store, Subscription};

#[derive(Default)]
enum ValueState {
    #[default]
    None,
    Pending(Waker),
    Ready(Snapshot),
}

/// Stream of snapshots delivered by a store's flushes.
///
/// Returned by [`Store::changes`]. Between polls the slot holds only the
/// latest flushed snapshot, so a slow consumer observes the same coalescing
/// as a watcher. The stream never ends; dropping it unregisters from the
/// store.
pub struct Changes {
    value: Rc<RefCell<ValueState>>,
    _watch: Subscription,
}

impl Changes {
    pub(crate) fn new(store: &Store) -> Self {
        let value = Rc::new(RefCell::new(ValueState::None));
        let slot = value.clone();
        let watch = store.watch(move |snapshot| {
            let prev = replace(&mut *slot.borrow_mut(), ValueState::Ready(snapshot.clone()));
            if let ValueState::Pending(waker) = prev {
                waker.wake();
            }
        });
        Changes {
            value,
            _watch: watch,
        }
    }
}

impl Stream for Changes {
    type Item = Snapshot;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut value = self.value.borrow_mut();
        match take(&mut *value) {
            ValueState::None | ValueState::Pending(_) => {
                *value = ValueState::Pending(cx.waker().clone());
                Poll::Pending
            }
            ValueState::Ready(snapshot) => Poll::Ready(Some(snapshot)),
        }
    }
}
