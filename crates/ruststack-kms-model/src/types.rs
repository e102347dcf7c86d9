//! Shared KMS model types.

use std::ops::Deref;

use serde::{Deserialize, Deserializer};

/// A list member that remembers whether the caller ever set it.
///
/// The default value is an *auto-constructed* empty list: the member was
/// never touched. Serializers treat an auto-constructed empty list as absent
/// and omit it, while an explicitly set empty list is written as `[]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedList<T> {
    items: Vec<T>,
    auto_construct: bool,
}

impl<T> Default for TrackedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            auto_construct: true,
        }
    }
}

impl<T> TrackedList<T> {
    /// Create an explicitly set list from the given items.
    #[must_use]
    pub fn explicit(items: Vec<T>) -> Self {
        Self {
            items,
            auto_construct: false,
        }
    }

    /// Whether the list was created by default rather than set by the caller.
    #[must_use]
    pub fn is_auto_construct(&self) -> bool {
        self.auto_construct
    }

    /// Whether the list should be left out of a serialized payload.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.auto_construct && self.items.is_empty()
    }

    /// Append an item. The auto-construct flag is left as is; a non-empty
    /// list is always serialized.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Consume the list, returning its items.
    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}

impl<T> Deref for TrackedList<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T> From<Vec<T>> for TrackedList<T> {
    fn from(items: Vec<T>) -> Self {
        Self::explicit(items)
    }
}

impl<T> FromIterator<T> for TrackedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::explicit(iter.into_iter().collect())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TrackedList<T> {
    /// A list present in the input document counts as explicitly set.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::explicit)
    }
}
