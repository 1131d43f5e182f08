//! Immutable-snapshot state containers with coalesced change notification,
//! plus location predicates for conditional rendering.
//!
//! A [`Store`] holds its whole state as one shared [`Snapshot`]. Writes
//! build a replacement snapshot; watchers are notified once per scheduling
//! tick with the latest value, however many writes happened in between.
//! The [`when`] module evaluates named predicates against state and the
//! current [`Location`], and [`pick`] selects the first chosen one.
//!
//! ```
//! use snapstate::{core::Runtime, Snapshot, Store};
//! use serde_json::json;
//!
//! let mut rt = Runtime::new();
//! let store = Store::new(Snapshot::try_from(json!({"count": 0}))?);
//! let _s = store.watch(|snapshot| println!("count: {}", snapshot.get("count").unwrap()));
//! store.set(Snapshot::try_from(json!({"count": 1}))?);
//! store.set(Snapshot::try_from(json!({"count": 2}))?);
//! rt.update(); // one notification, with count == 2
//! # Ok::<(), snapstate::SnapshotError>(())
//! ```

pub mod core;
#[cfg(feature = "logger")]
pub mod logger;
pub mod when;

mod location;
mod snapshot;
mod store;
mod stream;
mod subscription;

pub use location::{Location, Params};
pub use snapshot::{Object, Snapshot, SnapshotError, Value};
pub use store::{set_preload, Store};
pub use stream::Changes;
pub use subscription::Subscription;
pub use when::{pick, Resolution, Switch};
