//! Database handle and driver entry point for the in-memory engine.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{Database, Dictionary, Driver, Error, Result, Table};
use tokio::sync::RwLock;

use crate::table::MemTable;
use crate::DRIVER_NAME;

/// A named registry of in-memory tables.
///
/// Tables are created lazily on first request with `create` set and live
/// until the process exits.
#[derive(Debug)]
pub struct MemDatabase {
    name: String,
    config: Dictionary,
    tables: RwLock<HashMap<String, Arc<MemTable>>>,
}

impl MemDatabase {
    pub fn new(name: impl Into<String>, config: Dictionary) -> Self {
        Self {
            name: name.into(),
            config,
            tables: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl Database for MemDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    fn driver(&self) -> &str {
        DRIVER_NAME
    }

    fn config(&self) -> &Dictionary {
        &self.config
    }

    async fn table(&self, name: &str, create: bool) -> Result<Arc<dyn Table>> {
        if create {
            let mut tables = self.tables.write().await;
            let table = tables
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(MemTable::new(name)));
            Ok(Arc::clone(table) as Arc<dyn Table>)
        } else {
            let tables = self.tables.read().await;
            tables
                .get(name)
                .map(|table| Arc::clone(table) as Arc<dyn Table>)
                .ok_or_else(|| Error::bad_table(name))
        }
    }
}

/// Factory for [`MemDatabase`] handles.
#[derive(Debug)]
pub struct MemoryDriver;

#[async_trait]
impl Driver for MemoryDriver {
    async fn configure(&self, name: &str, config: &Dictionary) -> Result<Arc<dyn Database>> {
        Ok(Arc::new(MemDatabase::new(name, config.clone())))
    }
}
