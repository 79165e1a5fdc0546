//! Proxy over a flat hash-map store
//!
//! All configuration under one root lives in a single remote hash. A path is
//! flattened into one field name by folding a [`KeyComposer`] over its
//! segments. Every operation that talks to the backend or moves the cursor
//! is gated on a liveness check, except `render` (see [`FlatStoreProxy::render`]).

use tracing::{debug, warn};

use super::errors::{LivenessError, ProxyResult};
use super::segment::PathSegment;
use super::traits::PathProxy;
use crate::config::StoreConfig;
use crate::flatten::{DottedKeyComposer, KeyComposer};
use crate::hash_store::{ConnectionState, HashClient};

/// Run the three liveness checks in order: ready flag, connection handle
/// present, connection open.
pub fn check_liveness<C: HashClient>(client: &C) -> Result<(), LivenessError> {
    if !client.is_ready() {
        return Err(LivenessError::NotReady);
    }
    let connection = client.connection().ok_or(LivenessError::NoConnection)?;
    if connection.is_closed() {
        return Err(LivenessError::Closed);
    }
    Ok(())
}

/// Path proxy over one hash in a [`HashClient`]
pub struct FlatStoreProxy<'c, C: HashClient, K: KeyComposer = DottedKeyComposer> {
    client: &'c C,
    composer: K,
    root_key: String,
    flat_key: String,
}

impl<'c, C: HashClient> FlatStoreProxy<'c, C> {
    /// Bind a proxy to hash `root_key` using dotted key composition.
    pub fn new(client: &'c C, root_key: impl Into<String>) -> Self {
        Self::with_composer(client, root_key, DottedKeyComposer)
    }

    /// Bind a proxy to the hash named by the store configuration.
    pub fn from_config(client: &'c C, config: &StoreConfig) -> Self {
        Self::new(client, config.hash_root.clone())
    }
}

impl<'c, C: HashClient, K: KeyComposer> FlatStoreProxy<'c, C, K> {
    pub fn with_composer(client: &'c C, root_key: impl Into<String>, composer: K) -> Self {
        Self {
            client,
            composer,
            root_key: root_key.into(),
            flat_key: String::new(),
        }
    }

    pub fn root_key(&self) -> &str {
        &self.root_key
    }

    /// The accumulated, flattened field name.
    pub fn flat_key(&self) -> &str {
        &self.flat_key
    }

    /// Raw field read; `None` when the field is absent. Not liveness-gated.
    pub fn value(&self) -> ProxyResult<Option<String>> {
        Ok(self.client.hget(&self.root_key, &self.flat_key)?)
    }

    /// `render` with the liveness check the mutating operations perform.
    pub fn render_checked(&self) -> ProxyResult<String> {
        self.ready()?;
        self.render()
    }

    fn compose_key(mut self, segment: PathSegment) -> Self {
        let kind = segment.kind();
        self.flat_key = self.composer.compose(&self.flat_key, &segment, kind);
        debug!(root = %self.root_key, key = %self.flat_key, "composed flat key");
        self
    }
}

impl<'c, C: HashClient, K: KeyComposer> PathProxy for FlatStoreProxy<'c, C, K> {
    fn ready(&self) -> ProxyResult<()> {
        check_liveness(self.client).map_err(|err| {
            warn!(root = %self.root_key, key = %self.flat_key, error = %err, "hash store not live");
            err.into()
        })
    }

    fn index(self, segment: impl Into<PathSegment>) -> ProxyResult<Self> {
        self.ready()?;
        Ok(self.compose_key(segment.into()))
    }

    fn assign(self, segment: impl Into<PathSegment>, value: impl Into<String>) -> ProxyResult<Self> {
        self.ready()?;
        let proxy = self.compose_key(segment.into());
        let value = value.into();
        proxy.client.hset(&proxy.root_key, &proxy.flat_key, &value)?;
        debug!(root = %proxy.root_key, key = %proxy.flat_key, "assigned flat value");
        Ok(proxy)
    }

    fn remove(self, segment: impl Into<PathSegment>) -> ProxyResult<Self> {
        self.ready()?;
        let proxy = self.compose_key(segment.into());
        let removed = proxy.client.hdel(&proxy.root_key, &proxy.flat_key)?;
        debug!(root = %proxy.root_key, key = %proxy.flat_key, removed, "removed flat value");
        Ok(proxy)
    }

    /// Reads the field without a liveness check, so it still answers when
    /// the connection is closed if the client can. Absent fields render as
    /// the empty string. Use [`FlatStoreProxy::render_checked`] to gate it.
    fn render(&self) -> ProxyResult<String> {
        Ok(self.value()?.unwrap_or_default())
    }
}
