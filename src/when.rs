//! Named predicates over application state and the current location, and
//! the [`pick`] combinator that runs the first chosen one.

use derive_ex::derive_ex;

use crate::location::{matches_hash, matches_path, Location, Params};


/// The outcome of evaluating one predicate.
///
/// A resolution carries a fixed resolved flag, set at construction, and an
/// optional callback queued with [`choose`](Self::choose). It is consumed
/// either by [`then`](Self::then) or by handing it to [`pick`].
#[must_use]
pub struct Resolution<R = ()> {
    resolved: bool,
    queued: Option<Box<dyn FnOnce() -> R>>,
}

impl<R> Resolution<R> {
    fn new(resolved: bool) -> Self {
        Self {
            resolved,
            queued: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Calls `f` and returns its value if this resolution is resolved.
    pub fn then(self, f: impl FnOnce() -> R) -> Option<R> {
        if self.resolved {
            Some(f())
        } else {
            None
        }
    }

    /// Queues `f` to run if [`pick`] selects this resolution.
    ///
    /// Queuing again replaces the previous callback.
    pub fn choose(mut self, f: impl FnOnce() -> R + 'static) -> Self {
        if self.resolved {
            self.queued = Some(Box::new(f));
        }
        self
    }
}

/// Resolved when `value` is `true`.
pub fn ok<R>(value: bool) -> Resolution<R> {
    Resolution::new(value)
}

/// Resolved when `value` is `false`.
pub fn not_ok<R>(value: bool) -> Resolution<R> {
    ok(!value)
}

/// Resolved when `items` has at least one element.
pub fn populated<T, R>(items: &[T]) -> Resolution<R> {
    Resolution::new(!items.is_empty())
}

/// Resolved when `items` has no elements.
pub fn empty<T, R>(items: &[T]) -> Resolution<R> {
    Resolution::new(items.is_empty())
}

/// Resolved when `pattern` matches the current location's pathname.
///
/// Reads [`Location::current`]; use [`path_with`] to match against an
/// explicit value instead.
pub fn path<R>(pattern: &str) -> Resolution<R> {
    let location = Location::current();
    path_with(pattern, location.pathname())
}

/// Resolved when `pattern` matches `actual`.
///
/// Both sides are standardized first. A trailing `/*` makes the pattern a
/// prefix match, a leading `*/` a suffix match on whole segments.
pub fn path_with<R>(pattern: &str, actual: &str) -> Resolution<R> {
    Resolution::new(matches_path(pattern, actual))
}

/// Resolved when `pattern` matches the current location's hash.
pub fn hash<R>(pattern: &str) -> Resolution<R> {
    let location = Location::current();
    hash_with(pattern, location.hash())
}

/// Resolved when `pattern` matches `actual`, with the same star rules as
/// [`path_with`].
pub fn hash_with<R>(pattern: &str, actual: &str) -> Resolution<R> {
    Resolution::new(matches_hash(pattern, actual))
}

/// Resolved when every `(key, value)` entry is present in the current
/// location's query parameters.
pub fn params<R>(expected: &[(&str, &str)]) -> Resolution<R> {
    let location = Location::current();
    params_match(expected, location.params())
}

/// Resolved when every `(key, value)` entry is present in `actual`.
///
/// [`Params::Malformed`] behaves as an empty map, so only an empty
/// expectation resolves against it.
pub fn params_with<R>(expected: &[(&str, &str)], actual: impl Into<Params>) -> Resolution<R> {
    params_match(expected, &actual.into())
}

fn params_match<R>(expected: &[(&str, &str)], actual: &Params) -> Resolution<R> {
    Resolution::new(
        expected
            .iter()
            .all(|(key, value)| actual.get(key) == Some(*value)),
    )
}

/// Always resolved. The conventional last candidate of a [`pick`] scan.
pub fn otherwise<R>() -> Resolution<R> {
    Resolution::new(true)
}

/// Runs the queued callback of the first resolved candidate.
///
/// Candidates are scanned in order. The first resolved one ends the scan
/// whether or not it queued a callback: with one, `pick` runs it and returns
/// its value; without one, `pick` returns `None` and later candidates are
/// never consulted.
pub fn pick<R>(candidates: impl IntoIterator<Item = Resolution<R>>) -> Option<R> {
    for candidate in candidates {
        if !candidate.resolved {
            continue;
        }
        return candidate.queued.map(|f| f());
    }
    None
}

/// Builder pairing predicates with callbacks, evaluated by [`pick`] rules.
#[derive_ex(Default, bound())]
#[default(Self::new())]
#[must_use]
pub struct Switch<R> {
    arms: Vec<Resolution<R>>,
}

impl<R> Switch<R> {
    pub fn new() -> Self {
        Self { arms: Vec::new() }
    }

    /// Adds a candidate with its callback.
    pub fn case(mut self, candidate: Resolution<R>, f: impl FnOnce() -> R + 'static) -> Self {
        self.arms.push(candidate.choose(f));
        self
    }

    /// Adds an always-resolved fallback arm.
    pub fn otherwise(self, f: impl FnOnce() -> R + 'static) -> Self {
        self.case(otherwise(), f)
    }

    /// Scans the arms in insertion order and runs the first resolved one.
    pub fn run(self) -> Option<R> {
        pick(self.arms)
    }
}
