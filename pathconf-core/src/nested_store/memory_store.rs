//! In-memory nested store
//!
//! Simple in-memory implementation for testing. `persist` only counts.

use toml::{Table, Value};

use super::errors::StoreError;
use super::NestedStore;

/// Nested store with no backing file
#[derive(Debug, Clone)]
pub struct MemoryNestedStore {
    document: Value,
    flushes: usize,
}

impl MemoryNestedStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::from_table(Table::new())
    }

    pub fn from_table(table: Table) -> Self {
        Self {
            document: Value::Table(table),
            flushes: 0,
        }
    }

    /// Build a store from TOML source text.
    pub fn from_toml(source: &str) -> Result<Self, StoreError> {
        let table: Table = toml::from_str(source).map_err(|source| StoreError::Parse {
            origin: "<memory>".to_string(),
            source,
        })?;
        Ok(Self::from_table(table))
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl Default for MemoryNestedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NestedStore for MemoryNestedStore {
    fn root(&self) -> &Value {
        &self.document
    }

    fn root_mut(&mut self) -> &mut Value {
        &mut self.document
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        self.flushes += 1;
        Ok(())
    }
}
