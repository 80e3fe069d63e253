//! Query-string parameters for range queries.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use common::{Bound, Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ApiError;

/// Default number of index positions returned when the client names none.
pub const DEFAULT_LIMIT: u32 = 1000;

/// Query-string extractor that reports deserialization failures through the
/// error taxonomy.
///
/// The stock [`Query`] extractor rejects a malformed argument (say
/// `limit=abc`) with a plain-text body, bypassing the wire format; this
/// wrapper turns the rejection into a `BadParam` so every failure leaves the
/// boundary as `{code, domain, args}`.
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(params)) => Ok(ValidatedQuery(params)),
            Err(rejection) => Err(ApiError(Error::bad_param("query", rejection.body_text()))),
        }
    }
}

/// Range arguments accepted on GET requests.
///
/// `eq` is exclusive with every other bound; at most one of `ge`/`gt` and at
/// most one of `le`/`lt` may appear. Any conflicting combination is a
/// `BadQuery`.
#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    /// Equality: both bounds inclusive at this value.
    pub eq: Option<String>,
    /// Lower bound, inclusive.
    pub ge: Option<String>,
    /// Lower bound, exclusive.
    pub gt: Option<String>,
    /// Upper bound, inclusive.
    pub le: Option<String>,
    /// Upper bound, exclusive.
    pub lt: Option<String>,
    /// Maximum number of index positions to return.
    pub limit: Option<u32>,
}

impl RangeParams {
    /// Validates the bound combination and produces the query bounds.
    pub fn bounds(&self) -> Result<(Option<Bound>, Option<Bound>)> {
        if let Some(eq) = &self.eq {
            if self.ge.is_some() || self.gt.is_some() || self.le.is_some() || self.lt.is_some() {
                return Err(Error::bad_query());
            }
            let bound = Bound::inclusive(eq.as_str());
            return Ok((Some(bound.clone()), Some(bound)));
        }

        let lower = match (&self.ge, &self.gt) {
            (Some(_), Some(_)) => return Err(Error::bad_query()),
            (Some(value), None) => Some(Bound::inclusive(value.as_str())),
            (None, Some(value)) => Some(Bound::exclusive(value.as_str())),
            (None, None) => None,
        };
        let upper = match (&self.le, &self.lt) {
            (Some(_), Some(_)) => return Err(Error::bad_query()),
            (Some(value), None) => Some(Bound::inclusive(value.as_str())),
            (None, Some(value)) => Some(Bound::exclusive(value.as_str())),
            (None, None) => None,
        };
        Ok((lower, upper))
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}
