//! Primary and secondary indexes over the ordered map.
//!
//! The primary index holds the stored records themselves. Secondary indexes
//! hold, per key, the set of ids of the records carrying that key; members
//! are resolved back through the primary at emit time, so there is exactly
//! one owner for every record.

use std::collections::BTreeSet;

use common::{Bound, IndexMap, Record};
use serde_json::Value;

use crate::ordered::{Cursor, OrderedMap};

/// A record as held by the primary index: canonical document text plus the
/// metadata needed to rebuild the wire form.
#[derive(Debug)]
pub(crate) struct StoredRecord {
    pub rev: String,
    /// Canonical JSON text of the document.
    pub doc: String,
    pub keys: IndexMap,
}

impl StoredRecord {
    /// Rebuilds the wire record for this id.
    pub fn materialize(&self, id: &str) -> Record {
        let doc = serde_json::from_str(&self.doc).unwrap_or_else(|err| {
            // The stored text was produced by the canonical serializer, so
            // this only fires on memory corruption.
            tracing::error!(id, %err, "stored document failed to parse");
            Value::Null
        });
        Record {
            id: id.to_string(),
            rev: self.rev.clone(),
            doc,
            keys: self.keys.clone(),
        }
    }
}

/// Ids of the records stored under one secondary key. Never empty while the
/// key is present; iteration order (ascending id) is the within-key emission
/// order.
pub(crate) type RecordSet = BTreeSet<String>;

/// One index of a table, primary or secondary, selected at construction.
#[derive(Debug)]
pub(crate) enum Index {
    Primary(OrderedMap<StoredRecord>),
    Secondary(OrderedMap<RecordSet>),
}

impl Index {
    pub fn primary() -> Self {
        Index::Primary(OrderedMap::new())
    }

    pub fn secondary() -> Self {
        Index::Secondary(OrderedMap::new())
    }

    /// Inserts `id` into the record set at `key`, creating the set if the
    /// key is new. Inserting an id twice is a no-op.
    pub fn add(&mut self, key: &str, id: &str) {
        let map = self.secondary_mut();
        match map.get_mut(key) {
            Some(set) => {
                set.insert(id.to_string());
            }
            None => {
                let mut set = RecordSet::new();
                set.insert(id.to_string());
                map.set(key.to_string(), set);
            }
        }
    }

    /// Removes `id` from the record set at `key`, dropping the key entirely
    /// when its last member goes. Removing an absent member is a no-op.
    pub fn remove(&mut self, key: &str, id: &str) {
        let map = self.secondary_mut();
        let Some(set) = map.get_mut(key) else {
            return;
        };
        set.remove(id);
        if set.is_empty() {
            map.delete(key);
        }
    }

    /// Positions a cursor at the least key `>= key`, reporting whether the
    /// key exists exactly.
    pub fn seek(&self, key: &str) -> (IndexCursor<'_>, bool) {
        match self {
            Index::Primary(map) => {
                let (cursor, hit) = map.seek(key);
                (IndexCursor::Primary(cursor), hit)
            }
            Index::Secondary(map) => {
                let (cursor, hit) = map.seek(key);
                (IndexCursor::Secondary(cursor), hit)
            }
        }
    }

    pub fn seek_first(&self) -> IndexCursor<'_> {
        match self {
            Index::Primary(map) => IndexCursor::Primary(map.seek_first()),
            Index::Secondary(map) => IndexCursor::Secondary(map.seek_first()),
        }
    }

    /// Computes the sentinel key at which enumeration must stop for the
    /// given upper bound, or `None` when the range runs to the end of the
    /// key space. The sentinel itself is never emitted.
    pub fn find_end(&self, upper: Option<&Bound>) -> Option<String> {
        let upper = upper?;
        match self {
            Index::Primary(map) => end_key(map, upper),
            Index::Secondary(map) => end_key(map, upper),
        }
    }

    /// The record map of the primary index.
    pub fn records(&self) -> &OrderedMap<StoredRecord> {
        match self {
            Index::Primary(map) => map,
            Index::Secondary(_) => panic!("record access on a secondary index"),
        }
    }

    pub fn records_mut(&mut self) -> &mut OrderedMap<StoredRecord> {
        match self {
            Index::Primary(map) => map,
            Index::Secondary(_) => panic!("record access on a secondary index"),
        }
    }

    fn secondary_mut(&mut self) -> &mut OrderedMap<RecordSet> {
        match self {
            Index::Secondary(map) => map,
            Index::Primary(_) => panic!("secondary-index op on the primary index"),
        }
    }
}

/// Walks forward from the upper bound's seek position: an exclusive bound
/// stops at the bound key itself if present, an inclusive one at the first
/// strictly greater key.
fn end_key<V>(map: &OrderedMap<V>, upper: &Bound) -> Option<String> {
    let (mut cursor, hit) = map.seek(&upper.value);
    loop {
        let (key, _) = cursor.next()?;
        if !hit || !upper.inclusive || key != upper.value {
            return Some(key.to_string());
        }
    }
}

/// Cursor over either index shape.
pub(crate) enum IndexCursor<'a> {
    Primary(Cursor<'a, StoredRecord>),
    Secondary(Cursor<'a, RecordSet>),
}

impl<'a> IndexCursor<'a> {
    pub fn next(&mut self) -> Option<IndexEntry<'a>> {
        match self {
            IndexCursor::Primary(cursor) => cursor
                .next()
                .map(|(key, stored)| IndexEntry::Record(key, stored)),
            IndexCursor::Secondary(cursor) => {
                cursor.next().map(|(key, set)| IndexEntry::Set(key, set))
            }
        }
    }
}

/// One cursor position: a record in the primary, a record set in a
/// secondary.
pub(crate) enum IndexEntry<'a> {
    Record(&'a str, &'a StoredRecord),
    Set(&'a str, &'a RecordSet),
}

impl IndexEntry<'_> {
    pub fn key(&self) -> &str {
        match self {
            IndexEntry::Record(key, _) => key,
            IndexEntry::Set(key, _) => key,
        }
    }
}
