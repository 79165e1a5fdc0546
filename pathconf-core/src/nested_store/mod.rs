//! Hierarchical configuration stores
//!
//! A nested store owns a tree of `toml::Value` nodes rooted at a table and
//! knows how to make that tree durable. Navigation is shared by all stores
//! and lives in [`node`].

pub mod errors;
pub mod file_store;
pub mod memory_store;
pub mod node;

pub use errors::{AddressError, StoreError};
pub use file_store::TomlFileStore;
pub use memory_store::MemoryNestedStore;

use toml::Value;

/// Backing store for [`NestedStoreProxy`](crate::proxy::NestedStoreProxy)
pub trait NestedStore {
    /// The document root. Always a table.
    fn root(&self) -> &Value;

    /// Mutable access to the document root.
    fn root_mut(&mut self) -> &mut Value;

    /// Durably write the whole document.
    fn persist(&mut self) -> Result<(), StoreError>;
}
