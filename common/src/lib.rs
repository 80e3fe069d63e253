//! Shared types for the docstore document database.
//!
//! This crate defines the value types exchanged between drivers, the HTTP
//! boundary, and clients (records, bounds, queries, result sets), the coded
//! error taxonomy shared by local and remote paths, and the driver contract
//! with its process-wide registry.
//!
//! # Key Concepts
//!
//! - **Record**: an opaque JSON document addressed by a string id, carrying
//!   a content-hash revision and its secondary-index keys.
//! - **Query**: a range over one index of a table, with optional bounds and
//!   a positive limit.
//! - **Driver**: a storage engine factory. Engines implement [`Database`]
//!   and [`Table`] and register themselves under a name at startup.

pub mod driver;
pub mod error;
pub mod model;
pub mod registry;

pub use driver::{Database, Driver, RecordSink, RecordStream, Table};
pub use error::{Error, ErrorKind, Result};
pub use model::{Bound, DatabaseSpec, Dictionary, IndexMap, Query, Record, ResultSet};
