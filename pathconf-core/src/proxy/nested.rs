//! Proxy over a nested (file-backed) store
//!
//! The cursor is the path walked so far. Each `index` resolves the extended
//! path against the live document, so a missing key or a step into a scalar
//! fails at the step that caused it.

use toml::Value;
use tracing::debug;

use super::errors::ProxyResult;
use super::segment::{Path, PathSegment};
use super::traits::PathProxy;
use crate::nested_store::{node, NestedStore};

/// Path proxy over a [`NestedStore`]
pub struct NestedStoreProxy<'s, S: NestedStore> {
    store: &'s mut S,
    cursor: Path,
}

impl<'s, S: NestedStore> NestedStoreProxy<'s, S> {
    /// Bind a proxy to the root of `store`.
    pub fn new(store: &'s mut S) -> Self {
        Self {
            store,
            cursor: Path::root(),
        }
    }

    pub fn cursor(&self) -> &Path {
        &self.cursor
    }

    /// The node the cursor currently addresses.
    pub fn value(&self) -> ProxyResult<&Value> {
        Ok(node::resolve(self.store.root(), &self.cursor)?)
    }
}

impl<'s, S: NestedStore> PathProxy for NestedStoreProxy<'s, S> {
    /// No external liveness dependency.
    fn ready(&self) -> ProxyResult<()> {
        Ok(())
    }

    fn index(self, segment: impl Into<PathSegment>) -> ProxyResult<Self> {
        let cursor = self.cursor.child(segment.into());
        node::resolve(self.store.root(), &cursor)?;
        Ok(Self {
            store: self.store,
            cursor,
        })
    }

    /// Writes into the in-memory document, then persists it. If the flush
    /// fails the store error is returned as-is and the document keeps the
    /// new value, so memory is ahead of disk until the next successful
    /// persist.
    fn assign(self, segment: impl Into<PathSegment>, value: impl Into<String>) -> ProxyResult<Self> {
        let segment = segment.into();
        let value = value.into();

        let parent = node::resolve_mut(self.store.root_mut(), &self.cursor)?;
        node::set_child(parent, &self.cursor, &segment, Value::String(value))?;
        self.store.persist()?;

        let cursor = self.cursor.child(segment);
        debug!(path = %cursor, "assigned nested value");
        Ok(Self {
            store: self.store,
            cursor,
        })
    }

    fn remove(self, segment: impl Into<PathSegment>) -> ProxyResult<Self> {
        let segment = segment.into();

        let parent = node::resolve_mut(self.store.root_mut(), &self.cursor)?;
        node::remove_child(parent, &self.cursor, &segment)?;

        let cursor = self.cursor.child(segment);
        debug!(path = %cursor, "removed nested value");
        Ok(Self {
            store: self.store,
            cursor,
        })
    }

    fn render(&self) -> ProxyResult<String> {
        Ok(node::render(self.value()?))
    }
}
