//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Evx.
//! The Evx project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Evx KVDB Module
//!
//! Access facade to the key-value store holding decode tables. Builders ask
//! the [`EvKvdbManager`] for a handler scoped to a database and a caller
//! scope, read what they need and drop the handler before the build ends.
//!
//! The manager must accept concurrent handler requests from builders running
//! in parallel. A single handler is never shared between threads.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::{EvError, Result};

/// Scoped read access to one database.
pub trait EvKvdbHandler {
    fn database(&self) -> &str;

    /// Raw stored value for `key`, or a `Kvdb` error when the key is absent.
    fn get(&self, key: &str) -> Result<String>;
}

/// Provides database handlers; shared by every builder.
pub trait EvKvdbManager: Send + Sync {
    fn get_handler(&self, database: &str, scope: &str) -> Result<Box<dyn EvKvdbHandler>>;
}

/// In-memory store used by tests and embedded deployments.
#[derive(Debug, Default)]
pub struct EvMemoryKvdb {
    databases: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl EvMemoryKvdb {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_database(&self, database: &str) -> Result<()> {
        let mut databases = self.write()?;
        databases.entry(database.to_string()).or_default();
        Ok(())
    }

    pub fn contains_database(&self, database: &str) -> bool {
        self.databases
            .read()
            .map(|databases| databases.contains_key(database))
            .unwrap_or(false)
    }

    /// Stores `value` under `key`, creating the database when missing.
    pub fn put(&self, database: &str, key: &str, value: impl Into<String>) -> Result<()> {
        let mut databases = self.write()?;
        databases
            .entry(database.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
        Ok(())
    }

    pub fn delete(&self, database: &str, key: &str) -> Result<Option<String>> {
        let mut databases = self.write()?;
        let entries = databases
            .get_mut(database)
            .ok_or_else(|| EvError::kvdb(database, "unknown database"))?;
        Ok(entries.remove(key))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, HashMap<String, String>>>> {
        self.databases
            .write()
            .map_err(|_| EvError::kvdb("*", "store lock poisoned"))
    }
}

impl EvKvdbManager for EvMemoryKvdb {
    fn get_handler(&self, database: &str, scope: &str) -> Result<Box<dyn EvKvdbHandler>> {
        let databases = self
            .databases
            .read()
            .map_err(|_| EvError::kvdb(database, "store unreachable"))?;
        let entries = databases
            .get(database)
            .ok_or_else(|| EvError::kvdb(database, "unknown database"))?;

        log::debug!(
            "kvdb.handler.acquire: handler granted - database={}, scope={}, keys={}",
            database,
            scope,
            entries.len()
        );

        // Handlers live for one build step, so a snapshot is enough.
        Ok(Box::new(EvMemoryKvdbHandler {
            database: database.to_string(),
            entries: entries.clone(),
        }))
    }
}

#[derive(Debug)]
struct EvMemoryKvdbHandler {
    database: String,
    entries: HashMap<String, String>,
}

impl EvKvdbHandler for EvMemoryKvdbHandler {
    fn database(&self) -> &str {
        &self.database
    }

    fn get(&self, key: &str) -> Result<String> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| EvError::kvdb(&self.database, format!("unknown key '{key}'")))
    }
}
