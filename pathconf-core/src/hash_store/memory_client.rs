//! In-process hash client
//!
//! Stands in for a remote store in tests and single-process setups. Liveness
//! can be toggled to exercise the flat proxy's readiness gate, and every
//! field operation is counted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use tracing::trace;

use super::{ConnectionState, HashClient, HashStoreError};

/// Connection handle owned by a [`MemoryHashClient`]
#[derive(Debug, Default)]
pub struct MemoryConnection {
    closed: AtomicBool,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl ConnectionState for MemoryConnection {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// In-memory hash store client
#[derive(Debug)]
pub struct MemoryHashClient {
    ready: AtomicBool,
    connection: Option<MemoryConnection>,
    hashes: RwLock<HashMap<String, HashMap<String, String>>>,
    calls: AtomicUsize,
}

impl MemoryHashClient {
    /// Create a ready, connected client with no data
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(true),
            connection: Some(MemoryConnection::new()),
            hashes: RwLock::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Mark the current connection closed. No-op when disconnected.
    pub fn close(&self) {
        if let Some(connection) = &self.connection {
            connection.close();
        }
    }

    /// Drop the connection handle entirely.
    pub fn disconnect(&mut self) {
        self.connection = None;
    }

    /// Replace the connection handle with a fresh, open one.
    pub fn reconnect(&mut self) {
        self.connection = Some(MemoryConnection::new());
    }

    /// Number of field operations issued through [`HashClient`].
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Snapshot of every field in hash `key`.
    pub fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, HashStoreError> {
        let hashes = self.hashes.read().map_err(|_| HashStoreError::Poisoned)?;
        Ok(hashes.get(key).cloned().unwrap_or_default())
    }

    fn record_call(&self, op: &'static str, key: &str, field: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        trace!(op, key, field, "memory hash call");
    }
}

impl Default for MemoryHashClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HashClient for MemoryHashClient {
    type Connection = MemoryConnection;

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn connection(&self) -> Option<&MemoryConnection> {
        self.connection.as_ref()
    }

    fn hset(&self, key: &str, field: &str, value: &str) -> Result<(), HashStoreError> {
        self.record_call("hset", key, field);
        let mut hashes = self.hashes.write().map_err(|_| HashStoreError::Poisoned)?;
        hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    fn hget(&self, key: &str, field: &str) -> Result<Option<String>, HashStoreError> {
        self.record_call("hget", key, field);
        let hashes = self.hashes.read().map_err(|_| HashStoreError::Poisoned)?;
        Ok(hashes.get(key).and_then(|hash| hash.get(field)).cloned())
    }

    fn hdel(&self, key: &str, field: &str) -> Result<bool, HashStoreError> {
        self.record_call("hdel", key, field);
        let mut hashes = self.hashes.write().map_err(|_| HashStoreError::Poisoned)?;
        let Some(hash) = hashes.get_mut(key) else {
            return Ok(false);
        };
        let removed = hash.remove(field).is_some();
        // Empty hashes disappear, as in Redis
        if hash.is_empty() {
            hashes.remove(key);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_is_live() {
        let client = MemoryHashClient::new();
        assert!(client.is_ready());
        assert!(!client.connection().unwrap().is_closed());
    }

    #[test]
    fn test_field_operations() {
        let client = MemoryHashClient::new();
        client.hset("cfg", "a.b", "1").unwrap();
        assert_eq!(client.hget("cfg", "a.b").unwrap(), Some("1".to_string()));
        assert_eq!(client.hget("cfg", "missing").unwrap(), None);
        assert_eq!(client.hget("other", "a.b").unwrap(), None);

        assert!(client.hdel("cfg", "a.b").unwrap());
        assert!(!client.hdel("cfg", "a.b").unwrap());
        assert!(client.hgetall("cfg").unwrap().is_empty());
        assert_eq!(client.call_count(), 6);
    }

    #[test]
    fn test_liveness_toggles() {
        let mut client = MemoryHashClient::new();
        client.set_ready(false);
        assert!(!client.is_ready());

        client.close();
        assert!(client.connection().unwrap().is_closed());

        client.disconnect();
        assert!(client.connection().is_none());
        client.close();

        client.reconnect();
        assert!(!client.connection().unwrap().is_closed());
    }
}
