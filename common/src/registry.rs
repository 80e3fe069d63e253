//! Process-wide driver registry.
//!
//! Engines register a factory under a name during initialization, before any
//! database is configured. Registration happens from an explicit call in
//! main (or test setup), not from link-time side effects, so the ordering
//! hazard of implicit registration does not arise.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};

use crate::driver::{Database, Driver};
use crate::error::{Error, Result};
use crate::model::Dictionary;

static DRIVERS: LazyLock<RwLock<HashMap<String, Arc<dyn Driver>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Registers a driver under `name`.
///
/// # Panics
///
/// Panics if `name` is already registered. Registering the same name twice
/// is a programmer error and must abort process initialization.
pub fn register(name: &str, driver: Arc<dyn Driver>) {
    let mut drivers = DRIVERS.write().expect("driver registry poisoned");
    if drivers.contains_key(name) {
        panic!("docstore: driver '{name}' registered twice");
    }
    drivers.insert(name.to_string(), driver);
}

/// Looks up a registered driver by name.
pub fn open(name: &str) -> Result<Arc<dyn Driver>> {
    let drivers = DRIVERS.read().expect("driver registry poisoned");
    drivers
        .get(name)
        .cloned()
        .ok_or_else(|| Error::missing_driver(name))
}

/// Resolves `driver_name` and configures a database through it.
pub async fn configure(
    db_name: &str,
    driver_name: &str,
    config: &Dictionary,
) -> Result<Arc<dyn Database>> {
    let driver = open(driver_name)?;
    driver.configure(db_name, config).await
}
