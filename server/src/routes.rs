//! Route table and request-tracing middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, put};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Builds the API router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/{db}", put(handlers::create_database))
        .route("/{db}/{table}/{index}", get(handlers::query))
        .route(
            "/{db}/{table}/{index}/{*key}",
            get(handlers::get_record)
                .put(handlers::put_record)
                .delete(handlers::delete_record),
        )
        .layer(middleware::from_fn(trace_requests))
        .with_state(state)
}

/// Logs every request and its outcome at debug level.
async fn trace_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    tracing::debug!(%method, %uri, "request received");

    let start = Instant::now();
    let response = next.run(request).await;

    tracing::debug!(
        %method,
        %uri,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "request completed"
    );
    response
}
