//! Proxy error types

use thiserror::Error;

use crate::hash_store::HashStoreError;
use crate::nested_store::{AddressError, StoreError};

/// A backend readiness precondition failed. Never retried at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LivenessError {
    #[error("hash store is not ready")]
    NotReady,

    #[error("hash store reports ready but has no connection")]
    NoConnection,

    #[error("hash store connection is closed")]
    Closed,
}

/// Errors surfaced by proxy operations.
///
/// Backend errors pass through untouched; only liveness failures are
/// produced by the proxies themselves.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("liveness check failed: {0}")]
    Liveness(#[from] LivenessError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Hash(#[from] HashStoreError),
}

impl ProxyError {
    pub fn is_liveness(&self) -> bool {
        matches!(self, ProxyError::Liveness(_))
    }

    pub fn is_address(&self) -> bool {
        matches!(self, ProxyError::Address(_))
    }
}

pub type ProxyResult<T> = Result<T, ProxyError>;
