//! Shared application state: the configured databases.

use std::collections::HashMap;
use std::sync::Arc;

use common::{Database, Error, Result};
use tokio::sync::RwLock;

/// State shared by all request handlers.
///
/// Holds every database configured through the API, by name. Databases live
/// until the process exits.
#[derive(Clone, Default)]
pub struct AppState {
    databases: Arc<RwLock<HashMap<String, Arc<dyn Database>>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a configured database under its name, replacing any previous
    /// configuration of the same name.
    pub async fn insert(&self, name: String, database: Arc<dyn Database>) {
        self.databases.write().await.insert(name, database);
    }

    /// Looks up a configured database.
    pub async fn database(&self, name: &str) -> Result<Arc<dyn Database>> {
        self.databases
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| Error::bad_database(name))
    }
}
