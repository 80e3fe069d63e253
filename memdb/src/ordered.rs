//! Sorted string-keyed container with seek-and-scan cursors.

use std::collections::btree_map::{self, BTreeMap};
use std::ops::Bound as RangeBound;

/// An associative container whose keys are totally ordered by byte-wise
/// comparison. Point lookups and seeks are `O(log n)`; advancing a cursor is
/// amortized `O(1)`.
///
/// Mutation while a cursor is live is rejected by the borrow checker, which
/// is exactly the discipline the table's reader/writer lock imposes at
/// runtime across tasks.
#[derive(Debug)]
pub(crate) struct OrderedMap<V> {
    entries: BTreeMap<String, V>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    pub fn set(&mut self, key: String, value: V) {
        self.entries.insert(key, value);
    }

    pub fn delete(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Positions a cursor at the least key `>= key`.
    ///
    /// The returned flag is true when `key` itself exists in the map.
    pub fn seek(&self, key: &str) -> (Cursor<'_, V>, bool) {
        let hit = self.entries.contains_key(key);
        let range = self
            .entries
            .range::<str, _>((RangeBound::Included(key), RangeBound::Unbounded));
        (Cursor { range }, hit)
    }

    /// Positions a cursor at the least key in the map.
    pub fn seek_first(&self) -> Cursor<'_, V> {
        Cursor {
            range: self.entries.range::<String, _>(..),
        }
    }
}

/// Forward cursor over an [`OrderedMap`].
pub(crate) struct Cursor<'a, V> {
    range: btree_map::Range<'a, String, V>,
}

impl<'a, V> Cursor<'a, V> {
    /// Returns the entry under the cursor and advances, or `None` at the end
    /// of the key space.
    pub fn next(&mut self) -> Option<(&'a str, &'a V)> {
        self.range.next().map(|(k, v)| (k.as_str(), v))
    }
}
