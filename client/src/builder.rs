//! Statement builders: a fluent DSL assembling query and record values.

use common::model::PRIMARY_INDEX;
use common::{Bound, Error, IndexMap, Query, Record, Result, ResultSet};
use serde_json::Value;

use crate::conn::Conn;

/// Limit applied when a statement never names one.
pub const DEFAULT_LIMIT: u32 = 1000;

/// Everything a connection needs to run one statement.
#[derive(Debug, Clone)]
pub struct StatementSpec {
    pub db: String,
    pub table: String,
    pub query: Query,
    pub record: Record,
}

impl StatementSpec {
    fn new(db: String, table: String) -> Self {
        Self {
            db,
            table,
            query: Query::new(PRIMARY_INDEX, None, None, DEFAULT_LIMIT),
            record: Record::new("", Value::Null),
        }
    }
}

/// Entry point of the DSL.
pub fn db(name: impl Into<String>) -> DatabaseRef {
    DatabaseRef { name: name.into() }
}

/// A database selected by name.
pub struct DatabaseRef {
    name: String,
}

impl DatabaseRef {
    pub fn table(self, name: impl Into<String>) -> TableRef {
        TableRef {
            spec: StatementSpec::new(self.name, name.into()),
        }
    }
}

/// A table selected within a database. Queries target the primary index
/// unless redirected with [`by`](TableRef::by).
pub struct TableRef {
    spec: StatementSpec,
}

impl TableRef {
    /// Targets a secondary index for the query methods that follow.
    pub fn by(self, index: impl Into<String>) -> QueryRef {
        let mut query = QueryRef { spec: self.spec };
        query.spec.query.index = index.into();
        query
    }

    pub fn get(self, key: impl Into<String>) -> SingleStmt {
        QueryRef { spec: self.spec }.get(key)
    }

    pub fn get_all(self, key: impl Into<String>) -> MultiStmt {
        QueryRef { spec: self.spec }.get_all(key)
    }

    pub fn between(self, lower: impl Into<String>, upper: impl Into<String>) -> MultiStmt {
        QueryRef { spec: self.spec }.between(lower, upper)
    }

    pub fn all(self) -> MultiStmt {
        QueryRef { spec: self.spec }.all()
    }

    /// An insert: the record must not exist yet.
    pub fn insert(mut self, id: impl Into<String>, doc: impl Into<Value>) -> PutStmt {
        self.spec.record.id = id.into();
        self.spec.record.doc = doc.into();
        PutStmt { spec: self.spec }
    }

    /// An update of the record currently at `rev`.
    pub fn update(
        mut self,
        id: impl Into<String>,
        rev: impl Into<String>,
        doc: impl Into<Value>,
    ) -> PutStmt {
        self.spec.record.id = id.into();
        self.spec.record.rev = rev.into();
        self.spec.record.doc = doc.into();
        PutStmt { spec: self.spec }
    }

    pub fn delete(mut self, id: impl Into<String>, rev: impl Into<String>) -> ExecStmt {
        self.spec.record.id = id.into();
        self.spec.record.rev = rev.into();
        ExecStmt { spec: self.spec }
    }
}

/// A table with an index selected.
pub struct QueryRef {
    spec: StatementSpec,
}

impl QueryRef {
    /// Single-record lookup: equality bound, limit forced to one position.
    pub fn get(mut self, key: impl Into<String>) -> SingleStmt {
        let bound = Bound::inclusive(key);
        self.spec.query.lower = Some(bound.clone());
        self.spec.query.upper = Some(bound);
        self.spec.query.limit = 1;
        SingleStmt { spec: self.spec }
    }

    /// Every record filed under `key`.
    pub fn get_all(mut self, key: impl Into<String>) -> MultiStmt {
        let bound = Bound::inclusive(key);
        self.spec.query.lower = Some(bound.clone());
        self.spec.query.upper = Some(bound);
        MultiStmt { spec: self.spec }
    }

    /// Records in `lower <= key < upper`.
    pub fn between(mut self, lower: impl Into<String>, upper: impl Into<String>) -> MultiStmt {
        self.spec.query.lower = Some(Bound::inclusive(lower));
        self.spec.query.upper = Some(Bound::exclusive(upper));
        MultiStmt { spec: self.spec }
    }

    pub fn all(self) -> MultiStmt {
        MultiStmt { spec: self.spec }
    }
}

/// A range statement returning any number of records.
pub struct MultiStmt {
    spec: StatementSpec,
}

impl MultiStmt {
    pub fn limit(mut self, limit: u32) -> Self {
        self.spec.query.limit = limit;
        self
    }

    pub fn spec(&self) -> &StatementSpec {
        &self.spec
    }

    pub async fn run(&self, conn: &dyn Conn) -> Result<ResultSet> {
        conn.query(&self.spec).await
    }
}

/// A statement that must resolve to exactly one record.
pub struct SingleStmt {
    spec: StatementSpec,
}

impl SingleStmt {
    pub fn spec(&self) -> &StatementSpec {
        &self.spec
    }

    /// Runs the lookup. Zero records is a `NotFound`; a second record (or a
    /// truncated result signalling more) is a `Multiple`.
    pub async fn run(&self, conn: &dyn Conn) -> Result<Record> {
        let result = conn.query(&self.spec).await?;
        let mut records = result.records;
        match records.len() {
            0 => Err(Error::not_found()),
            1 if result.more => Err(Error::multiple()),
            1 => Ok(records.remove(0)),
            _ => Err(Error::multiple()),
        }
    }
}

/// An insert or update carrying one record.
pub struct PutStmt {
    spec: StatementSpec,
}

impl PutStmt {
    /// Files the record under a secondary-index key. Duplicate values under
    /// one index name are not stored twice.
    pub fn by(mut self, index: impl Into<String>, value: impl Into<String>) -> Self {
        let values = self.spec.record.keys.entry(index.into()).or_default();
        let value = value.into();
        if !values.contains(&value) {
            values.push(value);
        }
        self
    }

    /// Replaces the record's whole secondary-key mapping.
    pub fn keys(mut self, keys: IndexMap) -> Self {
        self.spec.record.keys = keys;
        self
    }

    pub fn spec(&self) -> &StatementSpec {
        &self.spec
    }

    /// Runs the put and returns the new revision.
    pub async fn run(&self, conn: &dyn Conn) -> Result<String> {
        if self.spec.record.id.is_empty() {
            return Err(Error::bad_param("id", &self.spec.record.id));
        }
        conn.put(&self.spec).await
    }
}

/// A statement run for its side effect only.
pub struct ExecStmt {
    spec: StatementSpec,
}

impl ExecStmt {
    pub fn spec(&self) -> &StatementSpec {
        &self.spec
    }

    pub async fn run(&self, conn: &dyn Conn) -> Result<()> {
        conn.delete(&self.spec).await
    }
}
