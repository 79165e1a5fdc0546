//! The path proxy contract

use super::errors::ProxyResult;
use super::segment::PathSegment;

/// Chained, path-based access to one configuration value.
///
/// Every step consumes the proxy and hands back the advanced one, so a
/// traversal reads as a chain:
///
/// ```no_run
/// # use pathconf_core::proxy::{PathProxy, ProxyResult};
/// # fn demo<P: PathProxy>(proxy: P) -> ProxyResult<()> {
/// proxy.index("net")?.index(0usize)?.assign("host", "example.org")?;
/// # Ok(())
/// # }
/// ```
///
/// The cursor only ever moves forward along one path. `assign` and `remove`
/// return the proxy positioned at the address they touched.
pub trait PathProxy: Sized {
    /// Check backend preconditions.
    fn ready(&self) -> ProxyResult<()>;

    /// Advance the cursor by one segment.
    fn index(self, segment: impl Into<PathSegment>) -> ProxyResult<Self>;

    /// Advance by one segment and write `value` there, durably.
    fn assign(self, segment: impl Into<PathSegment>, value: impl Into<String>) -> ProxyResult<Self>;

    /// Advance by one segment and delete the entry there.
    fn remove(self, segment: impl Into<PathSegment>) -> ProxyResult<Self>;

    /// String form of the value at the cursor.
    fn render(&self) -> ProxyResult<String>;

    /// Index through every segment in order.
    fn at<I>(self, segments: I) -> ProxyResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<PathSegment>,
    {
        segments
            .into_iter()
            .try_fold(self, |proxy, segment| proxy.index(segment))
    }
}
