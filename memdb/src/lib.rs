//! In-memory storage engine for docstore.
//!
//! The engine keeps every table as a set of ordered string-keyed maps: a
//! primary index holding the records themselves and one secondary index per
//! user-supplied key name, each holding sets of record ids. Writes are
//! serialized with optimistic concurrency control (content-hash revisions),
//! and range queries stream records from a producer task that keeps the
//! table's read lock for as long as the consumer is draining.
//!
//! Useful for testing and for workloads where durability is not required;
//! all data is lost when the process exits.

mod database;
mod index;
mod ordered;
mod revision;
mod table;

use std::sync::Once;

pub use database::{MemDatabase, MemoryDriver};
pub use table::MemTable;

/// Name the in-memory driver registers under.
pub const DRIVER_NAME: &str = "memory";

/// Registers the in-memory driver in the process-wide registry.
///
/// Safe to call more than once; only the first call registers. Call this
/// from main (or test setup) before configuring any database.
pub fn register() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        common::registry::register(DRIVER_NAME, std::sync::Arc::new(MemoryDriver));
    });
}
