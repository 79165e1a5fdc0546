//! Path-addressable access to hierarchical configuration.
//!
//! Configuration can live in a nested TOML document on disk or, flattened,
//! in a single hash of a remote key-value store. Both are reached through
//! [`proxy::PathProxy`]: bind a proxy to a root, index into it segment by
//! segment, then assign, remove or render at the composed address.

pub mod config;
pub mod flatten;
pub mod hash_store;
pub mod logging;
pub mod nested_store;
pub mod proxy;

pub use config::{Config, ConfigError, StoreConfig};
pub use flatten::{compose_keys, DottedKeyComposer, KeyComposer};
pub use hash_store::{HashClient, HashStoreError, MemoryHashClient};
pub use logging::{init_logging, LogLevel};
pub use nested_store::{MemoryNestedStore, NestedStore, TomlFileStore};
pub use proxy::{
    ContainerKind, FlatStoreProxy, LivenessError, NestedStoreProxy, Path, PathProxy, PathSegment,
    ProxyError, ProxyResult,
};
