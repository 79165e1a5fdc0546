//! Remote hash-map store clients
//!
//! A hash client exposes field-level set/get/delete on a named hash plus the
//! liveness state the flat proxy checks before mutating anything.

pub mod memory_client;

pub use memory_client::{MemoryConnection, MemoryHashClient};

use thiserror::Error;

/// Errors raised by a hash client for a single field operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashStoreError {
    #[error("hash store lock poisoned")]
    Poisoned,

    #[error("hash store backend error: {0}")]
    Backend(String),
}

/// Connection handle state
pub trait ConnectionState {
    fn is_closed(&self) -> bool;
}

/// Client for a remote store holding named hashes of string fields.
///
/// Field operations take `&self`; clients manage their own synchronization.
pub trait HashClient {
    type Connection: ConnectionState;

    /// Whether the client finished its startup handshake.
    fn is_ready(&self) -> bool;

    /// The live connection handle, if any.
    fn connection(&self) -> Option<&Self::Connection>;

    /// Set `field` of hash `key` to `value`.
    fn hset(&self, key: &str, field: &str, value: &str) -> Result<(), HashStoreError>;

    /// Read `field` of hash `key`. Absent fields are `None`.
    fn hget(&self, key: &str, field: &str) -> Result<Option<String>, HashStoreError>;

    /// Delete `field` of hash `key`. Returns whether a field was removed.
    fn hdel(&self, key: &str, field: &str) -> Result<bool, HashStoreError>;
}
