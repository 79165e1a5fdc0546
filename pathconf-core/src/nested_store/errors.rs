//! Error types for the nested store

use std::path::PathBuf;

use thiserror::Error;

use crate::proxy::segment::{ContainerKind, Path};

/// A composed path did not resolve inside the nested document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("no entry at '{path}'")]
    Missing { path: Path },

    #[error("cannot index into {found} at '{path}'")]
    NotAContainer { path: Path, found: &'static str },

    #[error("{expected} segment used on a {found} at '{path}'")]
    KindMismatch {
        path: Path,
        expected: ContainerKind,
        found: &'static str,
    },

    #[error("index out of bounds at '{path}' (length {len})")]
    OutOfBounds { path: Path, len: usize },
}

impl AddressError {
    /// The path at which resolution failed.
    pub fn path(&self) -> &Path {
        match self {
            AddressError::Missing { path }
            | AddressError::NotAContainer { path, .. }
            | AddressError::KindMismatch { path, .. }
            | AddressError::OutOfBounds { path, .. } => path,
        }
    }
}

/// Loading or persisting the backing document failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] toml::ser::Error),
}
