//! The driver contract: the uniform query interface every storage engine
//! implements, and the record stream produced by range queries.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::model::{Dictionary, Query, Record, ResultSet};

/// A storage engine factory.
///
/// Drivers are registered under a name in the [registry](crate::registry)
/// at process initialization and construct [`Database`] handles at
/// configuration time.
#[async_trait]
pub trait Driver: Send + Sync + std::fmt::Debug {
    /// Constructs a database backed by this engine.
    async fn configure(&self, name: &str, config: &Dictionary) -> Result<Arc<dyn Database>>;
}

/// A named collection of tables.
#[async_trait]
pub trait Database: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Name of the driver that produced this database.
    fn driver(&self) -> &str;

    fn config(&self) -> &Dictionary;

    /// Returns the named table.
    ///
    /// With `create` set, the table is created if absent and lives for the
    /// rest of the database's lifetime; otherwise a missing table is a
    /// `BadTable` error.
    async fn table(&self, name: &str, create: bool) -> Result<Arc<dyn Table>>;
}

/// A table of records with one primary and any number of secondary indexes.
#[async_trait]
pub trait Table: Send + Sync + std::fmt::Debug {
    /// Runs a range query and returns the lazily produced record stream.
    ///
    /// The stream observes a stable snapshot of the index for its entire
    /// lifetime; writers are excluded until it is drained or dropped.
    async fn get(&self, query: Query) -> Result<RecordStream>;

    /// Inserts or updates a record, returning the new revision.
    ///
    /// An empty `rev` on the record means insert; otherwise `rev` must equal
    /// the stored revision or the put fails with `Conflict` and leaves the
    /// table unchanged.
    async fn put(&self, record: Record) -> Result<String>;

    /// Removes a record by id. Deleting an absent id succeeds.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Producer half of a range-query stream.
///
/// Every send suspends until the consumer takes the item; when the consumer
/// drops its [`RecordStream`], the next send fails and the producer is
/// expected to stop, releasing whatever locks it holds.
pub struct RecordSink {
    tx: mpsc::Sender<Option<Record>>,
}

impl RecordSink {
    /// Ships one record. Returns false when the consumer has gone away.
    pub async fn send(&self, record: Record) -> bool {
        self.tx.send(Some(record)).await.is_ok()
    }

    /// Ships the terminator marking the range as fully enumerated.
    ///
    /// A producer that stops at the limit instead simply drops the sink
    /// without finishing, which the consumer observes as `more = true`.
    pub async fn finish(&self) -> bool {
        self.tx.send(None).await.is_ok()
    }
}

/// Consumer half of a range-query stream.
#[derive(Debug)]
pub struct RecordStream {
    rx: mpsc::Receiver<Option<Record>>,
}

impl RecordStream {
    /// Creates a connected sink/stream pair over a single-slot channel, so
    /// the producer never runs ahead of the consumer by more than one item.
    pub fn channel() -> (RecordSink, RecordStream) {
        let (tx, rx) = mpsc::channel(1);
        (RecordSink { tx }, RecordStream { rx })
    }

    /// Receives the next stream item.
    ///
    /// `Some(Some(record))` is a streamed record, `Some(None)` is the
    /// fully-enumerated terminator, and `None` means the producer stopped at
    /// the limit with records remaining.
    pub async fn next(&mut self) -> Option<Option<Record>> {
        self.rx.recv().await
    }

    /// Drains the stream into a [`ResultSet`].
    ///
    /// `more` is true iff the producer hit the limit before the terminator.
    #[tracing::instrument(level = "trace", skip_all)]
    pub async fn collect(mut self) -> ResultSet {
        let mut records = Vec::new();
        while let Some(item) = self.rx.recv().await {
            match item {
                Some(record) => records.push(record),
                None => {
                    return ResultSet {
                        more: false,
                        records,
                    }
                }
            }
        }
        ResultSet {
            more: true,
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn should_collect_records_until_terminator() {
        // given
        let (sink, stream) = RecordStream::channel();
        tokio::spawn(async move {
            sink.send(Record::new("a", json!("a"))).await;
            sink.send(Record::new("b", json!("b"))).await;
            sink.finish().await;
        });

        // when
        let result = stream.collect().await;

        // then
        assert!(!result.more);
        let ids: Vec<_> = result.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn should_report_more_when_producer_stops_without_terminator() {
        // given - the producer hits its limit and drops the sink
        let (sink, stream) = RecordStream::channel();
        tokio::spawn(async move {
            sink.send(Record::new("a", json!("a"))).await;
        });

        // when
        let result = stream.collect().await;

        // then
        assert!(result.more);
        assert_eq!(result.records.len(), 1);
    }

    #[tokio::test]
    async fn should_fail_send_after_consumer_drops_stream() {
        // given
        let (sink, stream) = RecordStream::channel();
        drop(stream);

        // when
        let delivered = sink.send(Record::new("a", json!("a"))).await;

        // then
        assert!(!delivered);
    }
}
