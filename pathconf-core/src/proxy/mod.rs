//! Path proxies
//!
//! A proxy is bound to one configuration root and walks into it one
//! [`PathSegment`] at a time. [`NestedStoreProxy`] addresses a nested
//! document directly; [`FlatStoreProxy`] flattens the walked path into a
//! single hash field name. Both implement [`PathProxy`], so calling code can
//! stay generic over the backend.

pub mod errors;
pub mod flat;
pub mod nested;
pub mod segment;
pub mod traits;

pub use errors::{LivenessError, ProxyError, ProxyResult};
pub use flat::{check_liveness, FlatStoreProxy};
pub use nested::NestedStoreProxy;
pub use segment::{ContainerKind, Path, PathParseError, PathSegment};
pub use traits::PathProxy;
