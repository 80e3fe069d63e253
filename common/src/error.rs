//! Coded error taxonomy shared by local and remote paths.
//!
//! Errors carry a stable numeric code and the name/value of the failing
//! argument, so a client can react to the kind of failure without parsing
//! messages, whether the error crossed the HTTP boundary or not.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Error domain tag used on the wire.
pub const DOMAIN: &str = "docstore";

/// The kind of a [`Error`], with its stable wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorKind {
    /// Wrapped lower-level failure.
    Generic = 1,
    /// Driver name not registered.
    MissingDriver = 2,
    /// Revision mismatch on put.
    Conflict = 3,
    /// Missing or invalid scalar parameter.
    BadParam = 4,
    /// Table absent and creation not requested.
    BadTable = 5,
    /// Named index does not exist on this table.
    BadIndex = 6,
    /// Incompatible bounds combination.
    BadQuery = 7,
    /// Database absent.
    BadDatabase = 8,
    /// Malformed payload or route.
    BadRequest = 9,
    /// Zero records where exactly one was required.
    NotFound = 10,
    /// More than one record where exactly one was required.
    Multiple = 11,
}

impl ErrorKind {
    pub fn code(self) -> u32 {
        self as u32
    }

    fn from_code(code: u32) -> Self {
        match code {
            2 => ErrorKind::MissingDriver,
            3 => ErrorKind::Conflict,
            4 => ErrorKind::BadParam,
            5 => ErrorKind::BadTable,
            6 => ErrorKind::BadIndex,
            7 => ErrorKind::BadQuery,
            8 => ErrorKind::BadDatabase,
            9 => ErrorKind::BadRequest,
            10 => ErrorKind::NotFound,
            11 => ErrorKind::Multiple,
            _ => ErrorKind::Generic,
        }
    }
}

/// A coded error with the failing argument's name and value attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    args: BTreeMap<String, String>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            args: BTreeMap::new(),
        }
    }

    /// Attaches a named argument to the error.
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    pub fn generic(err: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Generic).with_arg("err", err.to_string())
    }

    pub fn missing_driver(name: &str) -> Self {
        Self::new(ErrorKind::MissingDriver).with_arg("name", name)
    }

    pub fn conflict() -> Self {
        Self::new(ErrorKind::Conflict)
    }

    pub fn bad_param(name: &str, value: impl fmt::Display) -> Self {
        Self::new(ErrorKind::BadParam)
            .with_arg("name", name)
            .with_arg("value", value.to_string())
    }

    pub fn bad_table(name: &str) -> Self {
        Self::new(ErrorKind::BadTable).with_arg("name", name)
    }

    pub fn bad_index(name: &str) -> Self {
        Self::new(ErrorKind::BadIndex).with_arg("name", name)
    }

    pub fn bad_query() -> Self {
        Self::new(ErrorKind::BadQuery)
    }

    pub fn bad_database(name: &str) -> Self {
        Self::new(ErrorKind::BadDatabase).with_arg("name", name)
    }

    pub fn bad_request(err: impl fmt::Display) -> Self {
        Self::new(ErrorKind::BadRequest).with_arg("err", err.to_string())
    }

    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    pub fn multiple() -> Self {
        Self::new(ErrorKind::Multiple)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn args(&self) -> &BTreeMap<String, String> {
        &self.args
    }

    pub fn is_conflict(&self) -> bool {
        self.kind == ErrorKind::Conflict
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    fn arg(&self, name: &str) -> &str {
        self.args.get(name).map(String::as_str).unwrap_or("?")
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Generic => write!(f, "generic error: {}", self.arg("err")),
            ErrorKind::MissingDriver => {
                write!(f, "missing driver '{}' (forgotten register?)", self.arg("name"))
            }
            ErrorKind::Conflict => write!(f, "document conflict"),
            ErrorKind::BadParam => write!(
                f,
                "invalid parameter: {} = '{}'",
                self.arg("name"),
                self.arg("value")
            ),
            ErrorKind::BadTable => write!(f, "table not found: '{}'", self.arg("name")),
            ErrorKind::BadIndex => write!(f, "index not found: '{}'", self.arg("name")),
            ErrorKind::BadQuery => write!(f, "invalid query"),
            ErrorKind::BadDatabase => write!(f, "database not found: '{}'", self.arg("name")),
            ErrorKind::BadRequest => write!(f, "invalid request: {}", self.arg("err")),
            ErrorKind::NotFound => write!(f, "record not found"),
            ErrorKind::Multiple => write!(f, "multiple records found"),
        }
    }
}

impl std::error::Error for Error {}

/// Wire form of [`Error`]: `{ "code": int, "domain": string, "args": {…} }`.
#[derive(Serialize, Deserialize)]
struct ErrorWire {
    code: u32,
    domain: String,
    #[serde(default)]
    args: BTreeMap<String, String>,
}

impl Serialize for Error {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        ErrorWire {
            code: self.kind.code(),
            domain: DOMAIN.to_string(),
            args: self.args.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Error {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let wire = ErrorWire::deserialize(deserializer)?;
        Ok(Error {
            kind: ErrorKind::from_code(wire.code),
            args: wire.args,
        })
    }
}

/// Result type alias for docstore operations.
pub type Result<T> = std::result::Result<T, Error>;
