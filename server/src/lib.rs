//! HTTP boundary for docstore.
//!
//! Exposes the driver contract over REST: databases are configured with a
//! `PUT /{db}`, records are read with range queries on
//! `GET /{db}/{table}/{index}` and written through the primary index with
//! `PUT /{db}/{table}/_id/{key}`. Core errors cross the boundary unchanged
//! as `{code, domain, args}` bodies with the status codes of the taxonomy.

mod config;
mod error;
mod handlers;
mod request;
mod routes;
mod state;

pub use config::{Args, ServerConfig};
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;

/// Binds the configured listen address and serves requests until shutdown.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let state = AppState::new();
    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    tracing::info!(addr = %config.listen, "docstore server listening");
    axum::serve(listener, router(state)).await
}
