//! Value types shared by drivers, the HTTP boundary, and clients.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// String-to-string configuration map passed to a driver at configure time.
pub type Dictionary = BTreeMap<String, String>;

/// Mapping from secondary-index name to the key values one record carries in
/// that index.
pub type IndexMap = BTreeMap<String, Vec<String>>;

/// Name of the primary index present on every table.
pub const PRIMARY_INDEX: &str = "_id";

/// A document addressed by a primary string id.
///
/// The revision is the lowercase hex SHA-1 of the canonical JSON form of
/// `doc`; an empty revision on a put means "insert, must not exist yet".
/// Unknown wire fields are ignored, and `rev`/`doc`/`keys` may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub rev: String,
    #[serde(default)]
    pub doc: Value,
    #[serde(default)]
    pub keys: IndexMap,
}

impl Record {
    /// Creates a record with no revision (insert semantics) and no keys.
    pub fn new(id: impl Into<String>, doc: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            rev: String::new(),
            doc: doc.into(),
            keys: IndexMap::new(),
        }
    }

    /// Sets the expected current revision (update semantics).
    pub fn with_rev(mut self, rev: impl Into<String>) -> Self {
        self.rev = rev.into();
        self
    }

    /// Adds a secondary-index key. Duplicate values under one index name are
    /// not stored twice.
    pub fn add_key(mut self, index: impl Into<String>, value: impl Into<String>) -> Self {
        let values = self.keys.entry(index.into()).or_default();
        let value = value.into();
        if !values.contains(&value) {
            values.push(value);
        }
        self
    }
}

/// One side of a range, with inclusive or exclusive semantics.
///
/// An absent bound (`Option::None` at the query level) means the range
/// extends to the end of the key space on that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bound {
    pub value: String,
    pub inclusive: bool,
}

impl Bound {
    pub fn inclusive(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            inclusive: true,
        }
    }

    pub fn exclusive(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            inclusive: false,
        }
    }
}

/// A range query over one index of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Index to enumerate; [`PRIMARY_INDEX`] denotes the primary.
    pub index: String,
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
    /// Maximum number of index positions to emit. Must be positive.
    pub limit: u32,
}

impl Query {
    pub fn new(
        index: impl Into<String>,
        lower: Option<Bound>,
        upper: Option<Bound>,
        limit: u32,
    ) -> Self {
        Self {
            index: index.into(),
            lower,
            upper,
            limit,
        }
    }

    /// An equality query: both bounds set to the same inclusive value.
    pub fn eq(index: impl Into<String>, key: impl Into<String>, limit: u32) -> Self {
        let bound = Bound::inclusive(key);
        Self {
            index: index.into(),
            lower: Some(bound.clone()),
            upper: Some(bound),
            limit,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.limit)?;
        if let Some(lower) = &self.lower {
            let op = if lower.inclusive { "<=" } else { "<" };
            write!(f, "{} {} ", lower.value, op)?;
        }
        write!(f, "{}", self.index)?;
        if let Some(upper) = &self.upper {
            let op = if upper.inclusive { "<=" } else { "<" };
            write!(f, " {} {}", op, upper.value)?;
        }
        Ok(())
    }
}

/// The materialized result of a range query.
///
/// `more` is true iff at least one matching record remained beyond the
/// query's limit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub more: bool,
    pub records: Vec<Record>,
}

/// Body of a database-creation request: which driver to configure, and how.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSpec {
    #[serde(default)]
    pub name: String,
    pub driver: String,
    #[serde(default)]
    pub config: Dictionary,
}
