//! Table storage: MVCC puts, idempotent deletes, and streaming range
//! queries over the primary or a secondary index.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::model::PRIMARY_INDEX;
use common::{Error, IndexMap, Query, Record, RecordSink, RecordStream, Result, Table};
use tokio::sync::{OwnedRwLockReadGuard, RwLock};

use crate::index::{Index, IndexEntry, StoredRecord};
use crate::revision::{canonical_json, revision};

/// A table held entirely in memory.
///
/// One reader/writer lock guards all indexes of the table. Range queries
/// hold it in read mode for the whole lifetime of their producer task, so a
/// writer can never observe (or corrupt) a half-enumerated key space.
#[derive(Debug)]
pub struct MemTable {
    name: String,
    state: Arc<RwLock<TableState>>,
}

#[derive(Debug)]
struct TableState {
    indexes: HashMap<String, Index>,
}

impl TableState {
    fn new() -> Self {
        let mut indexes = HashMap::new();
        indexes.insert(PRIMARY_INDEX.to_string(), Index::primary());
        Self { indexes }
    }

    fn primary(&self) -> &Index {
        self.indexes
            .get(PRIMARY_INDEX)
            .expect("primary index exists for the table's lifetime")
    }

    fn primary_mut(&mut self) -> &mut Index {
        self.indexes
            .get_mut(PRIMARY_INDEX)
            .expect("primary index exists for the table's lifetime")
    }

    /// Removes the record's membership from every secondary index it is
    /// filed under, dropping buckets that become empty.
    fn remove_keys(&mut self, id: &str, keys: &IndexMap) {
        for (name, values) in keys {
            if let Some(index) = self.indexes.get_mut(name) {
                for value in values {
                    index.remove(value, id);
                }
            }
        }
    }

    /// Files the record under every secondary index named in `keys`,
    /// creating indexes seen for the first time.
    fn add_keys(&mut self, id: &str, keys: &IndexMap) {
        for (name, values) in keys {
            let index = self
                .indexes
                .entry(name.clone())
                .or_insert_with(Index::secondary);
            for value in values {
                index.add(value, id);
            }
        }
    }
}

impl MemTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(RwLock::new(TableState::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Table for MemTable {
    #[tracing::instrument(level = "trace", skip_all)]
    async fn get(&self, query: Query) -> Result<RecordStream> {
        if query.index.is_empty() {
            return Err(Error::bad_index(&query.index));
        }
        if query.limit == 0 {
            return Err(Error::bad_param("limit", query.limit));
        }

        let state = Arc::clone(&self.state).read_owned().await;
        if !state.indexes.contains_key(&query.index) {
            return Err(Error::bad_index(&query.index));
        }

        let (sink, stream) = RecordStream::channel();
        tokio::spawn(produce(state, query, sink));
        Ok(stream)
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn put(&self, record: Record) -> Result<String> {
        if record.id.is_empty() {
            return Err(Error::bad_param("id", &record.id));
        }
        if record.keys.contains_key(PRIMARY_INDEX) {
            return Err(Error::bad_param("keys", PRIMARY_INDEX));
        }

        let doc = canonical_json(&record.doc)?;
        let rev = revision(&doc);

        let mut state = self.state.write().await;
        let existing = state
            .primary()
            .records()
            .get(&record.id)
            .map(|stored| (stored.rev.clone(), stored.keys.clone()));

        match existing {
            Some((stored_rev, old_keys)) => {
                if record.rev != stored_rev {
                    return Err(Error::conflict());
                }
                state.remove_keys(&record.id, &old_keys);
                let stored = state
                    .primary_mut()
                    .records_mut()
                    .get_mut(&record.id)
                    .expect("record present under the write lock");
                stored.doc = doc;
                stored.keys = record.keys.clone();
                stored.rev = rev.clone();
            }
            None => {
                // The caller holds a revision for a record that no longer
                // exists: the revision is stale, so this is a conflict.
                if !record.rev.is_empty() {
                    return Err(Error::conflict());
                }
                state.primary_mut().records_mut().set(
                    record.id.clone(),
                    StoredRecord {
                        rev: rev.clone(),
                        doc,
                        keys: record.keys.clone(),
                    },
                );
            }
        }

        state.add_keys(&record.id, &record.keys);
        Ok(rev)
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn delete(&self, id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let Some(stored) = state.primary().records().get(id) else {
            return Ok(());
        };
        let old_keys = stored.keys.clone();
        state.remove_keys(id, &old_keys);
        state.primary_mut().records_mut().delete(id);
        Ok(())
    }
}

/// Streams one query's range into the sink.
///
/// Owns the table's read guard until it returns, so writers stay excluded
/// while the consumer drains. Every send suspends until the consumer takes
/// the record; a dropped consumer fails the send and ends the task, which
/// releases the lock.
async fn produce(state: OwnedRwLockReadGuard<TableState>, query: Query, sink: RecordSink) {
    let index = state
        .indexes
        .get(&query.index)
        .expect("index checked under this guard before spawning");
    let (mut cursor, hit) = match &query.lower {
        Some(lower) => index.seek(&lower.value),
        None => (index.seek_first(), false),
    };
    let sentinel = index.find_end(query.upper.as_ref());
    let primary = state.primary();

    let mut count = 0u32;
    loop {
        let Some(entry) = cursor.next() else {
            sink.finish().await;
            return;
        };
        if sentinel.as_deref() == Some(entry.key()) {
            sink.finish().await;
            return;
        }
        if let Some(lower) = &query.lower {
            if hit && !lower.inclusive && entry.key() == lower.value {
                continue;
            }
        }
        if count == query.limit {
            // Limit reached with the range not exhausted: stop without the
            // terminator so the consumer reports more-available.
            return;
        }
        if !emit(&sink, primary, &entry).await {
            return;
        }
        count += 1;
    }
}

/// Ships the records at one cursor position. A secondary bucket of N
/// members ships all N before the position counts once toward the limit.
/// Returns false when the consumer has gone away.
async fn emit(sink: &RecordSink, primary: &Index, entry: &IndexEntry<'_>) -> bool {
    match entry {
        IndexEntry::Record(id, stored) => sink.send(stored.materialize(id)).await,
        IndexEntry::Set(_, ids) => {
            for id in ids.iter() {
                let Some(stored) = primary.records().get(id) else {
                    // Secondary membership always points at a live record.
                    tracing::error!(%id, "dangling secondary-index member");
                    continue;
                };
                if !sink.send(stored.materialize(id)).await {
                    return false;
                }
            }
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use common::{Bound, ErrorKind};
    use serde_json::json;

    use super::*;

    fn table() -> MemTable {
        MemTable::new("table")
    }

    fn make_keys(entries: &[(&str, &[&str])]) -> IndexMap {
        entries
            .iter()
            .map(|(name, values)| {
                (
                    name.to_string(),
                    values.iter().map(|v| v.to_string()).collect(),
                )
            })
            .collect()
    }

    async fn put_values(table: &MemTable, values: &[&str]) {
        for value in values {
            table.put(Record::new(*value, json!(*value))).await.unwrap();
        }
    }

    async fn put_keyed(table: &MemTable, id: &str, keys: IndexMap) -> String {
        let mut record = Record::new(id, json!(id));
        record.keys = keys;
        table.put(record).await.unwrap()
    }

    async fn put_update(table: &MemTable, id: &str, rev: &str, doc: &str, keys: IndexMap) -> String {
        let mut record = Record::new(id, json!(doc)).with_rev(rev);
        record.keys = keys;
        table.put(record).await.unwrap()
    }

    /// Runs a query and returns the streamed docs (as strings) and whether
    /// more records remained beyond the limit.
    async fn docs(
        table: &MemTable,
        index: &str,
        lower: Option<Bound>,
        upper: Option<Bound>,
        limit: u32,
    ) -> (Vec<String>, bool) {
        let stream = table
            .get(Query::new(index, lower, upper, limit))
            .await
            .unwrap();
        let result = stream.collect().await;
        let docs = result
            .records
            .iter()
            .map(|r| r.doc.as_str().unwrap_or_default().to_string())
            .collect();
        (docs, result.more)
    }

    fn lb(value: &str, inclusive: bool) -> Option<Bound> {
        Some(Bound {
            value: value.to_string(),
            inclusive,
        })
    }

    #[tokio::test]
    async fn should_reject_query_with_empty_index_name() {
        // given
        let table = table();

        // when
        let err = table
            .get(Query::new("", None, None, 10))
            .await
            .unwrap_err();

        // then
        assert_eq!(err.kind(), ErrorKind::BadIndex);
    }

    #[tokio::test]
    async fn should_reject_query_with_zero_limit() {
        // given
        let table = table();

        // when
        let err = table
            .get(Query::new(PRIMARY_INDEX, None, None, 0))
            .await
            .unwrap_err();

        // then
        assert_eq!(err.kind(), ErrorKind::BadParam);
    }

    #[tokio::test]
    async fn should_reject_query_on_unknown_index() {
        // given
        let table = table();
        put_values(&table, &["a"]).await;

        // when
        let err = table
            .get(Query::new("nope", None, None, 10))
            .await
            .unwrap_err();

        // then
        assert_eq!(err.kind(), ErrorKind::BadIndex);
    }

    #[tokio::test]
    async fn should_stream_single_record_with_terminator() {
        // given
        let table = table();
        put_values(&table, &["a"]).await;

        // when
        let (found, more) = docs(&table, PRIMARY_INDEX, None, None, 10).await;

        // then
        assert_eq!(found, vec!["a"]);
        assert!(!more);
    }

    #[tokio::test]
    async fn should_reject_record_with_empty_id() {
        // given
        let table = table();

        // when
        let err = table.put(Record::new("", json!("x"))).await.unwrap_err();

        // then
        assert_eq!(err.kind(), ErrorKind::BadParam);
    }

    #[tokio::test]
    async fn should_reject_secondary_keys_named_like_primary() {
        // given
        let table = table();
        let record = Record::new("a", json!("a")).add_key(PRIMARY_INDEX, "x");

        // when
        let err = table.put(record).await.unwrap_err();

        // then
        assert_eq!(err.kind(), ErrorKind::BadParam);
    }

    #[tokio::test]
    async fn should_apply_lower_bounds() {
        // given
        let table = table();
        put_values(&table, &["b", "c", "d"]).await;

        // when/then
        let cases: &[(Option<Bound>, &[&str])] = &[
            (lb("a", true), &["b", "c", "d"]),
            (lb("a", false), &["b", "c", "d"]),
            (lb("b", true), &["b", "c", "d"]),
            (lb("b", false), &["c", "d"]),
            (lb("c", true), &["c", "d"]),
            (lb("c", false), &["d"]),
            (lb("d", true), &["d"]),
            (lb("d", false), &[]),
            (lb("e", true), &[]),
            (lb("e", false), &[]),
        ];
        for (lower, expected) in cases {
            let (found, more) = docs(&table, PRIMARY_INDEX, lower.clone(), None, 10).await;
            assert_eq!(&found, expected, "lower bound {lower:?}");
            assert!(!more, "lower bound {lower:?}");
        }
    }

    #[tokio::test]
    async fn should_apply_upper_bounds() {
        // given
        let table = table();
        put_values(&table, &["b", "c", "d"]).await;

        // when/then
        let cases: &[(Option<Bound>, &[&str])] = &[
            (lb("a", true), &[]),
            (lb("a", false), &[]),
            (lb("b", true), &["b"]),
            (lb("b", false), &[]),
            (lb("c", true), &["b", "c"]),
            (lb("c", false), &["b"]),
            (lb("d", true), &["b", "c", "d"]),
            (lb("d", false), &["b", "c"]),
            (lb("e", true), &["b", "c", "d"]),
            (lb("e", false), &["b", "c", "d"]),
        ];
        for (upper, expected) in cases {
            let (found, more) = docs(&table, PRIMARY_INDEX, None, upper.clone(), 10).await;
            assert_eq!(&found, expected, "upper bound {upper:?}");
            assert!(!more, "upper bound {upper:?}");
        }
    }

    #[tokio::test]
    async fn should_apply_two_sided_ranges() {
        // given
        let table = table();
        put_values(&table, &["b", "c", "d"]).await;

        // when/then
        let cases: &[(Option<Bound>, Option<Bound>, &[&str])] = &[
            (lb("a", true), lb("a", true), &[]),
            (lb("b", true), lb("b", true), &["b"]),
            (lb("c", true), lb("c", true), &["c"]),
            (lb("d", true), lb("d", true), &["d"]),
            (lb("e", true), lb("e", true), &[]),
            (lb("a", true), lb("e", true), &["b", "c", "d"]),
            (lb("a", false), lb("e", false), &["b", "c", "d"]),
            (lb("a", true), lb("b", false), &[]),
            (lb("a", true), lb("b", true), &["b"]),
            (lb("b", true), lb("e", true), &["b", "c", "d"]),
            (lb("b", false), lb("e", true), &["c", "d"]),
        ];
        for (lower, upper, expected) in cases {
            let (found, more) =
                docs(&table, PRIMARY_INDEX, lower.clone(), upper.clone(), 10).await;
            assert_eq!(&found, expected, "range {lower:?}..{upper:?}");
            assert!(!more, "range {lower:?}..{upper:?}");
        }
    }

    #[tokio::test]
    async fn should_enumerate_secondary_indexes() {
        // given
        let table = table();
        put_keyed(&table, "a", make_keys(&[("x", &["a_x"]), ("y", &["a_y"])])).await;
        put_keyed(&table, "b", make_keys(&[("x", &["b_x"]), ("y", &["b_y"])])).await;
        put_keyed(&table, "aa", make_keys(&[("x", &["a_x"])])).await;
        put_keyed(&table, "c", make_keys(&[("c", &["ccc"])])).await;
        put_keyed(&table, "d", make_keys(&[("x", &["d_x"])])).await;
        put_keyed(&table, "e", make_keys(&[("x", &["e_x1", "e_x2"])])).await;

        // when/then - key-ascending order; records sharing one key arrive
        // together in id order
        let cases: &[(&str, Option<Bound>, Option<Bound>, &[&str])] = &[
            ("_id", None, None, &["a", "aa", "b", "c", "d", "e"]),
            ("_id", lb("a", true), lb("a", true), &["a"]),
            ("x", None, None, &["a", "aa", "b", "d", "e", "e"]),
            ("y", None, None, &["a", "b"]),
            ("c", None, None, &["c"]),
            ("x", lb("a_x", true), lb("a_x", true), &["a", "aa"]),
            ("x", lb("a", true), lb("c", true), &["a", "aa", "b"]),
            ("x", lb("e_x1", true), lb("e_x1", true), &["e"]),
            ("x", lb("e", true), lb("f", true), &["e", "e"]),
        ];
        for (index, lower, upper, expected) in cases {
            let (found, more) = docs(&table, index, lower.clone(), upper.clone(), 10).await;
            assert_eq!(&found, expected, "index {index} {lower:?}..{upper:?}");
            assert!(!more);
        }
    }

    #[tokio::test]
    async fn should_rewrite_secondary_membership_on_update() {
        // given - records whose updates exercise every membership rewrite:
        // identical update, changed doc, dropped key, dropped all keys,
        // added key, and shrinking a shared bucket
        let table = table();
        let rev = put_keyed(&table, "a", make_keys(&[("x", &["a_x"]), ("y", &["a_y"])])).await;
        put_update(&table, "a", &rev, "a", make_keys(&[("x", &["a_x"]), ("y", &["a_y"])])).await;

        let rev = put_keyed(&table, "b", make_keys(&[("x", &["b_x"]), ("y", &["b_y"])])).await;
        put_update(&table, "b", &rev, "bb", make_keys(&[("x", &["b_x"]), ("y", &["b_y"])])).await;

        let rev = put_keyed(&table, "c", make_keys(&[("x", &["c_x"]), ("y", &["c_y"])])).await;
        put_update(&table, "c", &rev, "c", make_keys(&[("x", &["c_x"])])).await;

        let rev = put_keyed(&table, "d", make_keys(&[("x", &["d_x"]), ("y", &["d_y"])])).await;
        put_update(&table, "d", &rev, "d", IndexMap::new()).await;

        let rev = put_keyed(&table, "e", make_keys(&[("x", &["e_x"])])).await;
        put_update(&table, "e", &rev, "e", make_keys(&[("x", &["e_x"]), ("y", &["e_y"])])).await;

        put_keyed(&table, "f", make_keys(&[("x", &["a_x"])])).await;
        let rev = put_keyed(&table, "g", make_keys(&[("x", &["a_x"])])).await;
        put_update(&table, "g", &rev, "g", IndexMap::new()).await;

        // when/then
        let (found, _) = docs(&table, "_id", None, None, 10).await;
        assert_eq!(found, vec!["a", "bb", "c", "d", "e", "f", "g"]);

        let (found, _) = docs(&table, "x", None, None, 10).await;
        assert_eq!(found, vec!["a", "f", "bb", "c", "e"]);

        let (found, _) = docs(&table, "y", None, None, 10).await;
        assert_eq!(found, vec!["a", "bb", "e"]);
    }

    #[tokio::test]
    async fn should_cap_results_at_limit() {
        // given
        let table = table();
        put_values(&table, &["1", "2", "3"]).await;

        // when/then
        let (found, more) = docs(&table, PRIMARY_INDEX, None, None, 1).await;
        assert_eq!(found, vec!["1"]);
        assert!(more);

        let (found, more) = docs(&table, PRIMARY_INDEX, None, None, 2).await;
        assert_eq!(found, vec!["1", "2"]);
        assert!(more);

        let (found, more) = docs(&table, PRIMARY_INDEX, None, None, 3).await;
        assert_eq!(found, vec!["1", "2", "3"]);
        assert!(!more);
    }

    #[tokio::test]
    async fn should_count_secondary_bucket_as_one_limit_position() {
        // given - two records share one secondary key
        let table = table();
        put_keyed(&table, "a", make_keys(&[("x", &["k1"])])).await;
        put_keyed(&table, "b", make_keys(&[("x", &["k1"])])).await;
        put_keyed(&table, "c", make_keys(&[("x", &["k2"])])).await;

        // when - limit 1 admits the whole first bucket
        let (found, more) = docs(&table, "x", None, None, 1).await;

        // then
        assert_eq!(found, vec!["a", "b"]);
        assert!(more);
    }

    #[tokio::test]
    async fn should_delete_idempotently() {
        // given
        let table = table();
        put_values(&table, &["a", "b"]).await;
        put_keyed(&table, "c", make_keys(&[("x", &["x"])])).await;

        // when/then
        table.delete("a").await.unwrap();
        let (found, _) = docs(&table, "_id", None, None, 10).await;
        assert_eq!(found, vec!["b", "c"]);
        let (found, _) = docs(&table, "x", None, None, 10).await;
        assert_eq!(found, vec!["c"]);

        // deleting again and deleting the rest still succeeds
        table.delete("a").await.unwrap();
        table.delete("b").await.unwrap();
        let (found, _) = docs(&table, "_id", None, None, 10).await;
        assert_eq!(found, vec!["c"]);

        table.delete("c").await.unwrap();
        let (found, _) = docs(&table, "_id", None, None, 10).await;
        assert!(found.is_empty());
        let (found, _) = docs(&table, "x", None, None, 10).await;
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn should_enforce_revision_checks() {
        // given
        let table = table();

        // first insert succeeds and yields a revision
        let first = table.put(Record::new("a", json!("a"))).await.unwrap();
        assert!(!first.is_empty());

        // inserting again without a revision conflicts
        let err = table.put(Record::new("a", json!("a"))).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        // updating with the held revision and identical content keeps the
        // revision stable
        let same = table
            .put(Record::new("a", json!("a")).with_rev(&first))
            .await
            .unwrap();
        assert_eq!(same, first);

        // changing the content moves the revision
        let next = table
            .put(Record::new("a", json!("b")).with_rev(&same))
            .await
            .unwrap();
        assert_ne!(next, same);

        // a bogus revision conflicts
        let err = table
            .put(Record::new("a", json!("b")).with_rev("bogus"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn should_conflict_on_update_of_missing_record() {
        // given
        let table = table();

        // when - a non-empty revision for an id that does not exist
        let err = table
            .put(Record::new("ghost", json!("g")).with_rev("deadbeef"))
            .await
            .unwrap_err();

        // then
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn should_leave_table_unchanged_after_conflict() {
        // given
        let table = table();
        let rev = put_keyed(&table, "a", make_keys(&[("x", &["a_x"])])).await;

        // when - a conflicting put that would have rewritten doc and keys
        let mut candidate = Record::new("a", json!("changed")).with_rev("stale");
        candidate.keys = make_keys(&[("y", &["a_y"])]);
        let err = table.put(candidate).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        // then - record, revision, and secondary membership are untouched
        let stream = table
            .get(Query::eq(PRIMARY_INDEX, "a", 10))
            .await
            .unwrap();
        let result = stream.collect().await;
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].rev, rev);
        assert_eq!(result.records[0].doc, json!("a"));

        let (found, _) = docs(&table, "x", None, None, 10).await;
        assert_eq!(found, vec!["a"]);
        let err = table
            .get(Query::new("y", None, None, 10))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadIndex);
    }

    #[tokio::test]
    async fn should_share_read_access_between_concurrent_queries() {
        // given
        let table = table();
        put_values(&table, &["a", "b"]).await;

        // when - two streams are open at once
        let mut first = table
            .get(Query::new(PRIMARY_INDEX, None, None, 10))
            .await
            .unwrap();
        let mut second = table
            .get(Query::new(PRIMARY_INDEX, None, None, 10))
            .await
            .unwrap();

        // then - both make progress
        assert!(matches!(first.next().await, Some(Some(_))));
        assert!(matches!(second.next().await, Some(Some(_))));
        while first.next().await.is_some() {}
        while second.next().await.is_some() {}
    }

    #[tokio::test]
    async fn should_block_writer_while_reader_is_streaming() {
        // given - a stream that is only partially drained
        let table = table();
        put_values(&table, &["a", "b", "c"]).await;
        let mut stream = table
            .get(Query::new(PRIMARY_INDEX, None, None, 10))
            .await
            .unwrap();
        assert!(matches!(stream.next().await, Some(Some(_))));

        // when - a writer tries to sneak in
        let blocked = tokio::time::timeout(
            Duration::from_millis(50),
            table.put(Record::new("d", json!("d"))),
        )
        .await;

        // then - it waits until the reader finishes
        assert!(blocked.is_err());
        while stream.next().await.is_some() {}
        table.put(Record::new("d", json!("d"))).await.unwrap();
    }

    #[tokio::test]
    async fn should_release_read_lock_when_consumer_drops_stream() {
        // given - a consumer that abandons the stream mid-range
        let table = table();
        put_values(&table, &["a", "b", "c"]).await;
        let mut stream = table
            .get(Query::new(PRIMARY_INDEX, None, None, 10))
            .await
            .unwrap();
        assert!(matches!(stream.next().await, Some(Some(_))));

        // when
        drop(stream);

        // then - the producer terminates on its next send and the write
        // proceeds
        let put = tokio::time::timeout(
            Duration::from_secs(1),
            table.put(Record::new("d", json!("d"))),
        )
        .await;
        assert!(put.is_ok());
        put.unwrap().unwrap();
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        fn in_range(id: &str, lower: &Option<Bound>, upper: &Option<Bound>) -> bool {
            let lower_ok = match lower {
                None => true,
                Some(b) if b.inclusive => id >= b.value.as_str(),
                Some(b) => id > b.value.as_str(),
            };
            let upper_ok = match upper {
                None => true,
                Some(b) if b.inclusive => id <= b.value.as_str(),
                Some(b) => id < b.value.as_str(),
            };
            lower_ok && upper_ok
        }

        fn bound_strategy() -> impl Strategy<Value = Option<Bound>> {
            proptest::option::of(("[a-e]{1,2}", any::<bool>()).prop_map(|(value, inclusive)| {
                Bound { value, inclusive }
            }))
        }

        proptest! {
            #[test]
            fn should_match_reference_range_semantics(
                ids in proptest::collection::btree_set("[a-e]{1,2}", 0..8),
                lower in bound_strategy(),
                upper in bound_strategy(),
                limit in 1u32..6,
            ) {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .unwrap();
                runtime.block_on(async {
                    let table = table();
                    for id in &ids {
                        table.put(Record::new(id.clone(), json!(id))).await.unwrap();
                    }

                    let stream = table
                        .get(Query::new(PRIMARY_INDEX, lower.clone(), upper.clone(), limit))
                        .await
                        .unwrap();
                    let result = stream.collect().await;

                    let matching: Vec<&String> = ids
                        .iter()
                        .filter(|id| in_range(id, &lower, &upper))
                        .collect();
                    let expected: Vec<&str> = matching
                        .iter()
                        .take(limit as usize)
                        .map(|id| id.as_str())
                        .collect();
                    let found: Vec<&str> =
                        result.records.iter().map(|r| r.id.as_str()).collect();

                    prop_assert_eq!(found, expected);
                    prop_assert_eq!(result.more, matching.len() > limit as usize);
                    Ok(())
                })?;
            }
        }
    }
}
