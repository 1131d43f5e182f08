use std::{fmt, rc::Rc};

use parse_display::Display;
use serde::{Deserialize, Serialize};

pub use serde_json::Value;

#[cfg(test)]
mod tests;

/// The JSON object a store holds, keyed by namespace.
pub type Object = serde_json::Map<String, Value>;

/// An immutable, cheaply clonable state value.
///
/// A `Snapshot` is a shared handle to a JSON object. It is never mutated in
/// place; [`merged`](Self::merged) and [`merged_in`](Self::merged_in) build
/// the next snapshot while every existing handle keeps seeing the old one.
#[derive(Clone, Default)]
pub struct Snapshot(Rc<Object>);

impl Snapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `namespace`.
    pub fn get(&self, namespace: &str) -> Option<&Value> {
        self.0.get(namespace)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of top-level namespaces.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if `namespace` is missing, empty, or not an object.
    pub fn namespace_is_empty(&self, namespace: &str) -> bool {
        match self.0.get(namespace) {
            Some(Value::Object(object)) => object.is_empty(),
            _ => true,
        }
    }

    pub fn as_object(&self) -> &Object {
        &self.0
    }

    /// Builds a snapshot with the entries of `partial` laid over this one.
    ///
    /// Top-level keys in `partial` replace existing keys wholesale.
    pub fn merged(&self, partial: &Object) -> Snapshot {
        let mut next = (*self.0).clone();
        for (key, value) in partial {
            next.insert(key.clone(), value.clone());
        }
        Snapshot(Rc::new(next))
    }

    /// Builds a snapshot with `partial` merged into the object under
    /// `namespace`.
    ///
    /// A missing or non-object namespace is treated as empty, so the result
    /// holds exactly the entries of `partial` there.
    pub fn merged_in(&self, namespace: &str, partial: &Object) -> Snapshot {
        let mut inner = match self.0.get(namespace) {
            Some(Value::Object(object)) => object.clone(),
            _ => Object::new(),
        };
        for (key, value) in partial {
            inner.insert(key.clone(), value.clone());
        }
        let mut next = (*self.0).clone();
        next.insert(namespace.to_string(), Value::Object(inner));
        Snapshot(Rc::new(next))
    }

    /// Returns `true` if both handles refer to the same allocation.
    ///
    /// Unlike `==`, this ignores contents; two equal snapshots built
    /// separately are not `ptr_eq`.
    pub fn ptr_eq(this: &Snapshot, other: &Snapshot) -> bool {
        Rc::ptr_eq(&this.0, &other.0)
    }
}

impl From<Object> for Snapshot {
    fn from(object: Object) -> Self {
        Snapshot(Rc::new(object))
    }
}

impl TryFrom<Value> for Snapshot {
    type Error = SnapshotError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(object) => Ok(object.into()),
            _ => Err(SnapshotError::NotAnObject),
        }
    }
}

impl FromIterator<(String, Value)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        iter.into_iter().collect::<Object>().into()
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl Serialize for Snapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        self.0.serialize(serializer)
    }
}
impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D>(deserializer: D) -> Result<Snapshot, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        Object::deserialize(deserializer).map(Snapshot::from)
    }
}

#[derive(Display, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum SnapshotError {
    #[display("snapshot value is not an object")]
    NotAnObject,
}

impl std::error::Error for SnapshotError {}
