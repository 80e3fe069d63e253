//! Connections that execute statements.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{registry, Database, Dictionary, Error, Result, ResultSet, Table};
use tokio::sync::RwLock;

use crate::builder::StatementSpec;

/// Transport for statements built by the DSL.
#[async_trait]
pub trait Conn: Send + Sync {
    /// Configures a database through the named driver and makes it
    /// addressable by later statements.
    async fn create_db(&self, name: &str, driver: &str, config: &Dictionary) -> Result<()>;

    /// Runs a range query and materializes its result.
    async fn query(&self, spec: &StatementSpec) -> Result<ResultSet>;

    /// Writes the statement's record and returns the new revision.
    async fn put(&self, spec: &StatementSpec) -> Result<String>;

    /// Deletes the statement's record by id.
    async fn delete(&self, spec: &StatementSpec) -> Result<()>;
}

/// In-process connection running statements directly against registered
/// drivers, without any transport in between.
#[derive(Default)]
pub struct LocalConn {
    databases: RwLock<HashMap<String, Arc<dyn Database>>>,
}

impl LocalConn {
    pub fn new() -> Self {
        Self::default()
    }

    async fn database(&self, name: &str) -> Result<Arc<dyn Database>> {
        self.databases
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| Error::bad_database(name))
    }
}

#[async_trait]
impl Conn for LocalConn {
    async fn create_db(&self, name: &str, driver: &str, config: &Dictionary) -> Result<()> {
        let database = registry::configure(name, driver, config).await?;
        self.databases
            .write()
            .await
            .insert(name.to_string(), database);
        Ok(())
    }

    async fn query(&self, spec: &StatementSpec) -> Result<ResultSet> {
        let database = self.database(&spec.db).await?;
        let table = database.table(&spec.table, false).await?;
        let stream = table.get(spec.query.clone()).await?;
        Ok(stream.collect().await)
    }

    async fn put(&self, spec: &StatementSpec) -> Result<String> {
        let database = self.database(&spec.db).await?;
        let table = database.table(&spec.table, true).await?;
        table.put(spec.record.clone()).await
    }

    async fn delete(&self, spec: &StatementSpec) -> Result<()> {
        let database = self.database(&spec.db).await?;
        let table = database.table(&spec.table, false).await?;
        table.delete(&spec.record.id).await
    }
}
