//! TOML file-backed nested store
//!
//! The whole document is held in memory; `persist` rewrites the file through
//! a temp file and an atomic rename.

use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::debug;

use super::errors::StoreError;
use super::NestedStore;
use crate::config::StoreConfig;

/// Nested store backed by a single TOML file
#[derive(Debug)]
pub struct TomlFileStore {
    /// Location of the backing file
    path: PathBuf,
    /// Parsed document, always a table
    document: Value,
    /// Number of successful `persist` calls
    flushes: usize,
}

impl TomlFileStore {
    /// Open an existing TOML file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;
        let table: Table = toml::from_str(&contents).map_err(|source| StoreError::Parse {
            origin: path.display().to_string(),
            source,
        })?;

        debug!(path = %path.display(), keys = table.len(), "opened nested store");

        Ok(Self {
            path,
            document: Value::Table(table),
            flushes: 0,
        })
    }

    /// Open a TOML file, starting from an empty document if it does not exist.
    ///
    /// Nothing is written until the first `persist`.
    pub fn open_or_create(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if path.exists() {
            return Self::open(path);
        }

        debug!(path = %path.display(), "nested store file missing, starting empty");
        Ok(Self {
            path,
            document: Value::Table(Table::new()),
            flushes: 0,
        })
    }

    /// Open the file named by the store configuration.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        if config.create_missing {
            Self::open_or_create(&config.file_path)
        } else {
            Self::open(&config.file_path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// How many times the document has been written to disk.
    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl NestedStore for TomlFileStore {
    fn root(&self) -> &Value {
        &self.document
    }

    fn root_mut(&mut self) -> &mut Value {
        &mut self.document
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let contents = toml::to_string_pretty(&self.document)?;

        // Write to temp file then atomic rename
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, contents).map_err(|source| StoreError::Write {
            path: temp_path.clone(),
            source,
        })?;
        std::fs::rename(&temp_path, &self.path).map_err(|source| {
            let _ = std::fs::remove_file(&temp_path);
            StoreError::Write {
                path: self.path.clone(),
                source,
            }
        })?;

        self.flushes += 1;
        debug!(path = %self.path.display(), flushes = self.flushes, "persisted nested store");
        Ok(())
    }
}
