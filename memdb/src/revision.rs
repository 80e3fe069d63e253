//! Canonical document serialization and content-hash revisions.

use common::{Error, Result};
use serde_json::Value;
use sha1::{Digest, Sha1};

/// Serializes a document to its canonical JSON form: UTF-8, object keys in
/// lexicographic order, minimal number formatting, no insignificant
/// whitespace. Identical documents always canonicalize identically, so their
/// revisions agree across conforming implementations.
///
/// `serde_json` already emits compact output with sorted object keys (its
/// map type is ordered), so no post-processing is needed.
pub(crate) fn canonical_json(doc: &Value) -> Result<String> {
    serde_json::to_string(doc).map_err(Error::generic)
}

/// Computes the revision for a canonical document: lowercase hex SHA-1.
pub(crate) fn revision(canonical: &str) -> String {
    hex::encode(Sha1::digest(canonical.as_bytes()))
}
