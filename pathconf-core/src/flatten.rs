//! Key flattening
//!
//! Turns a multi-segment path into a single string usable as a hash field
//! name. Composition is incremental: each step takes the key accumulated so
//! far, the next raw segment and the kind of container that segment indexes.

use crate::proxy::segment::{ContainerKind, PathSegment};

/// Pure, deterministic key composition.
pub trait KeyComposer {
    /// Extend `accumulated` by one segment.
    fn compose(&self, accumulated: &str, segment: &PathSegment, kind: ContainerKind) -> String;
}

/// `net[0].host` style composition. This is the default for flat stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DottedKeyComposer;

impl KeyComposer for DottedKeyComposer {
    fn compose(&self, accumulated: &str, segment: &PathSegment, kind: ContainerKind) -> String {
        compose_keys(accumulated, segment, kind)
    }
}

impl<F> KeyComposer for F
where
    F: Fn(&str, &PathSegment, ContainerKind) -> String,
{
    fn compose(&self, accumulated: &str, segment: &PathSegment, kind: ContainerKind) -> String {
        self(accumulated, segment, kind)
    }
}

/// Mapping segments are joined with `.`, sequence segments are wrapped in
/// `[]`. An empty accumulator never produces a leading separator.
pub fn compose_keys(accumulated: &str, segment: &PathSegment, kind: ContainerKind) -> String {
    match kind {
        ContainerKind::Sequence => format!("{}[{}]", accumulated, segment),
        ContainerKind::Mapping if accumulated.is_empty() => segment.to_string(),
        ContainerKind::Mapping => format!("{}.{}", accumulated, segment),
    }
}
