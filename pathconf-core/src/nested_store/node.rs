//! Navigation over a `toml::Value` tree
//!
//! Tables are addressed by key segments and arrays by index segments. Every
//! failure carries the path prefix at which resolution stopped.

use toml::Value;

use super::errors::AddressError;
use crate::proxy::segment::{ContainerKind, Path, PathSegment};

/// Why a single step failed, before the path is attached.
enum Miss {
    Missing,
    NotAContainer(&'static str),
    KindMismatch(ContainerKind, &'static str),
    OutOfBounds(usize),
}

impl Miss {
    fn at(self, path: Path) -> AddressError {
        match self {
            Miss::Missing => AddressError::Missing { path },
            Miss::NotAContainer(found) => AddressError::NotAContainer { path, found },
            Miss::KindMismatch(expected, found) => AddressError::KindMismatch {
                path,
                expected,
                found,
            },
            Miss::OutOfBounds(len) => AddressError::OutOfBounds { path, len },
        }
    }
}

fn shape_miss(node: &Value, segment: &PathSegment) -> Miss {
    match node {
        Value::Table(_) | Value::Array(_) => Miss::KindMismatch(segment.kind(), node.type_str()),
        other => Miss::NotAContainer(other.type_str()),
    }
}

fn step<'v>(node: &'v Value, segment: &PathSegment) -> Result<&'v Value, Miss> {
    match (node, segment) {
        (Value::Table(table), PathSegment::Key(key)) => table.get(key).ok_or(Miss::Missing),
        (Value::Array(items), PathSegment::Index(index)) => {
            items.get(*index).ok_or(Miss::OutOfBounds(items.len()))
        }
        (other, segment) => Err(shape_miss(other, segment)),
    }
}

fn step_mut<'v>(node: &'v mut Value, segment: &PathSegment) -> Result<&'v mut Value, Miss> {
    match (node, segment) {
        (Value::Table(table), PathSegment::Key(key)) => table.get_mut(key).ok_or(Miss::Missing),
        (Value::Array(items), PathSegment::Index(index)) => {
            let len = items.len();
            items.get_mut(*index).ok_or(Miss::OutOfBounds(len))
        }
        (other, segment) => Err(shape_miss(other, segment)),
    }
}

/// Follow `path` from `root`.
pub fn resolve<'v>(root: &'v Value, path: &Path) -> Result<&'v Value, AddressError> {
    let mut node = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        node = step(node, segment).map_err(|miss| miss.at(path.prefix(depth + 1)))?;
    }
    Ok(node)
}

/// Follow `path` from `root`, mutably.
pub fn resolve_mut<'v>(root: &'v mut Value, path: &Path) -> Result<&'v mut Value, AddressError> {
    let mut node = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        node = step_mut(node, segment).map_err(|miss| miss.at(path.prefix(depth + 1)))?;
    }
    Ok(node)
}

/// Set `segment` inside `parent`, which lives at `parent_path`.
///
/// Table keys are inserted or replaced. Array indices replace an existing
/// element, or append when the index equals the current length.
pub fn set_child(
    parent: &mut Value,
    parent_path: &Path,
    segment: &PathSegment,
    value: Value,
) -> Result<(), AddressError> {
    let at = || parent_path.clone().child(segment.clone());
    match (parent, segment) {
        (Value::Table(table), PathSegment::Key(key)) => {
            table.insert(key.clone(), value);
            Ok(())
        }
        (Value::Array(items), PathSegment::Index(index)) => {
            let len = items.len();
            if *index < len {
                items[*index] = value;
                Ok(())
            } else if *index == len {
                items.push(value);
                Ok(())
            } else {
                Err(Miss::OutOfBounds(len).at(at()))
            }
        }
        (other, segment) => Err(shape_miss(other, segment).at(at())),
    }
}

/// Remove `segment` from `parent`, returning the removed value.
///
/// Removing from an array shifts later elements down.
pub fn remove_child(
    parent: &mut Value,
    parent_path: &Path,
    segment: &PathSegment,
) -> Result<Value, AddressError> {
    let at = || parent_path.clone().child(segment.clone());
    match (parent, segment) {
        (Value::Table(table), PathSegment::Key(key)) => {
            table.remove(key).ok_or_else(|| Miss::Missing.at(at()))
        }
        (Value::Array(items), PathSegment::Index(index)) => {
            if *index < items.len() {
                Ok(items.remove(*index))
            } else {
                Err(Miss::OutOfBounds(items.len()).at(at()))
            }
        }
        (other, segment) => Err(shape_miss(other, segment).at(at())),
    }
}

/// String form of a node: strings render bare, everything else renders as
/// inline TOML.
pub fn render(node: &Value) -> String {
    match node {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
