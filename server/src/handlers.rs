//! Request handlers mapping REST verbs to driver operations.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::Json;
use common::model::PRIMARY_INDEX;
use common::{registry, Database, DatabaseSpec, Error, Record, Result, ResultSet, Table};

use crate::error::ApiError;
use crate::request::{RangeParams, ValidatedQuery};
use crate::state::AppState;

/// Handle `PUT /{db}`.
///
/// Resolves the named driver, configures a database, and makes it available
/// to subsequent requests. Re-configuring a name replaces the database.
pub async fn create_database(
    State(state): State<AppState>,
    Path(db): Path<String>,
    body: Bytes,
) -> std::result::Result<(), ApiError> {
    let spec: DatabaseSpec = serde_json::from_slice(&body).map_err(Error::bad_request)?;
    let database = registry::configure(&db, &spec.driver, &spec.config).await?;
    state.insert(db, database).await;
    Ok(())
}

/// Handle `GET /{db}/{table}/{index}`.
///
/// Runs a range query described by the query string and returns the
/// materialized result set.
pub async fn query(
    State(state): State<AppState>,
    Path((db, table, index)): Path<(String, String, String)>,
    ValidatedQuery(params): ValidatedQuery<RangeParams>,
) -> std::result::Result<Json<ResultSet>, ApiError> {
    let (lower, upper) = params.bounds()?;
    let query = common::Query::new(index, lower, upper, params.limit());
    let result = run_query(&state, &db, &table, query).await?;
    Ok(Json(result))
}

/// Handle `GET /{db}/{table}/{index}/{key}`.
///
/// Equality query on a single key (which may contain slashes). An empty
/// result is a NotFound rather than an empty set.
pub async fn get_record(
    State(state): State<AppState>,
    Path((db, table, index, key)): Path<(String, String, String, String)>,
    ValidatedQuery(params): ValidatedQuery<RangeParams>,
) -> std::result::Result<Json<ResultSet>, ApiError> {
    let query = common::Query::eq(index, key, params.limit());
    let result = run_query(&state, &db, &table, query).await?;
    if result.records.is_empty() {
        return Err(Error::not_found().into());
    }
    Ok(Json(result))
}

/// Handle `PUT /{db}/{table}/_id/{key}`.
///
/// Writes one record through the primary index; the table is created on
/// demand. Responds with the new revision.
pub async fn put_record(
    State(state): State<AppState>,
    Path((db, table, index, key)): Path<(String, String, String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> std::result::Result<Json<String>, ApiError> {
    if index != PRIMARY_INDEX {
        return Err(Error::bad_param("index", &index).into());
    }
    require_json(&headers)?;
    let record: Record = serde_json::from_slice(&body).map_err(Error::bad_request)?;
    if record.id != key {
        return Err(Error::bad_param("id", &key).into());
    }

    let database = state.database(&db).await?;
    let table = database.table(&table, true).await?;
    let rev = table.put(record).await?;
    Ok(Json(rev))
}

/// Handle `DELETE /{db}/{table}/_id/{key}`.
pub async fn delete_record(
    State(state): State<AppState>,
    Path((db, table, index, key)): Path<(String, String, String, String)>,
) -> std::result::Result<(), ApiError> {
    if index != PRIMARY_INDEX {
        return Err(Error::bad_param("index", &index).into());
    }
    let database = state.database(&db).await?;
    let table = database.table(&table, false).await?;
    table.delete(&key).await?;
    Ok(())
}

async fn run_query(
    state: &AppState,
    db: &str,
    table: &str,
    query: common::Query,
) -> Result<ResultSet> {
    let database = state.database(db).await?;
    let table = database.table(table, false).await?;
    let stream = table.get(query).await?;
    Ok(stream.collect().await)
}

/// Writes must declare a JSON payload.
fn require_json(headers: &HeaderMap) -> Result<()> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    if content_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|media| media.eq_ignore_ascii_case("application/json"))
    {
        Ok(())
    } else {
        Err(Error::bad_request(format!(
            "unsupported content type '{content_type}'"
        )))
    }
}
