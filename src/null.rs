//! # Nullable Value Wrapper
//!
//! `Null<T>` represents a nullable column value of type `T`. The zero value
//! (via `Default`) is the null state. Unlike `Option<T>`, the wrapped value
//! stays addressable in the null state, which keeps records `Default`-
//! constructible and makes the valid flag explicit at serialization
//! boundaries.
//!
//! SQL NULL binds to the invalid state; JSON serialization emits `null` for
//! invalid values and round-trips through serde.

use std::fmt;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// A nullable value of type `T`. `valid` is true if the value is not null.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Null<T> {
    pub some: T,
    pub valid: bool,
}

impl<T> Null<T> {
    /// Wraps a non-null value.
    pub fn new(value: T) -> Self {
        Self {
            some: value,
            valid: true,
        }
    }

    /// Sets the value, marking it non-null.
    pub fn set(&mut self, value: T) {
        self.some = value;
        self.valid = true;
    }

    /// Returns a reference to the value if it is non-null.
    pub fn as_option(&self) -> Option<&T> {
        self.valid.then_some(&self.some)
    }

    /// Consumes the wrapper, returning the value if it is non-null.
    pub fn into_option(self) -> Option<T> {
        self.valid.then_some(self.some)
    }
}

impl<T: Default> Null<T> {
    /// Resets to the null state.
    pub fn invalidate(&mut self) {
        self.some = T::default();
        self.valid = false;
    }
}

impl<T> From<Option<T>> for Null<T>
where
    T: Default,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Null::new(v),
            None => Null::default(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Null<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            write!(f, "{}", self.some)
        } else {
            write!(f, "<null>")
        }
    }
}

impl<T: Serialize> Serialize for Null<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.valid {
            self.some.serialize(serializer)
        } else {
            serializer.serialize_none()
        }
    }
}

impl<'de, T> Deserialize<'de> for Null<T>
where
    T: Deserialize<'de> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.into())
    }
}
