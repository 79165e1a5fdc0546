//! Path segments and composed paths
//!
//! A [`PathSegment`] is one step of an address into configuration data: a
//! field name for mapping-shaped containers or an index for sequence-shaped
//! ones. A [`Path`] is the ordered list of segments a proxy has walked.

use std::fmt;

use thiserror::Error;

use crate::flatten::compose_keys;

/// One atomic address component
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    /// Field name inside a mapping
    Key(String),
    /// Position inside a sequence
    Index(usize),
}

/// The shape of container a segment addresses into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Integer-indexed list
    Sequence,
    /// String-keyed map
    Mapping,
}

impl PathSegment {
    /// Integer segments address sequences, everything else addresses mappings.
    pub fn kind(&self) -> ContainerKind {
        match self {
            PathSegment::Index(_) => ContainerKind::Sequence,
            PathSegment::Key(_) => ContainerKind::Mapping,
        }
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(key) => Some(key),
            PathSegment::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Index(index) => Some(*index),
            PathSegment::Key(_) => None,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerKind::Sequence => write!(f, "sequence"),
            ContainerKind::Mapping => write!(f, "mapping"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<&String> for PathSegment {
    fn from(key: &String) -> Self {
        PathSegment::Key(key.clone())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl From<&PathSegment> for PathSegment {
    fn from(segment: &PathSegment) -> Self {
        segment.clone()
    }
}

/// Errors produced while parsing the `a.b[0]` path notation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathParseError {
    #[error("empty key in path '{0}'")]
    EmptyKey(String),

    #[error("unclosed index bracket in path '{0}'")]
    UnclosedIndex(String),

    #[error("invalid sequence index '{index}' in path '{path}'")]
    InvalidIndex { path: String, index: String },

    #[error("unexpected character '{ch}' in path '{path}'")]
    UnexpectedChar { path: String, ch: char },
}

/// An ordered, append-only sequence of path segments
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// The empty path, addressing the root
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Returns this path extended by one segment.
    pub fn child(mut self, segment: PathSegment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Returns the first `len` segments as a new path.
    pub fn prefix(&self, len: usize) -> Self {
        Self {
            segments: self.segments[..len.min(self.segments.len())].to_vec(),
        }
    }

    /// Parse the dotted/bracketed notation, e.g. `servers[0].host`.
    ///
    /// The empty string parses to the root path.
    pub fn parse(input: &str) -> Result<Self, PathParseError> {
        let mut segments = Vec::new();
        let mut chars = input.chars().peekable();
        let mut need_key = false;

        while let Some(&c) = chars.peek() {
            match c {
                '.' => {
                    if segments.is_empty() || need_key {
                        return Err(PathParseError::EmptyKey(input.to_string()));
                    }
                    chars.next();
                    need_key = true;
                }
                '[' => {
                    if need_key {
                        return Err(PathParseError::EmptyKey(input.to_string()));
                    }
                    chars.next();
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(d) => digits.push(d),
                            None => {
                                return Err(PathParseError::UnclosedIndex(input.to_string()))
                            }
                        }
                    }
                    let index = digits.parse::<usize>().map_err(|_| {
                        PathParseError::InvalidIndex {
                            path: input.to_string(),
                            index: digits.clone(),
                        }
                    })?;
                    segments.push(PathSegment::Index(index));
                }
                ']' => {
                    return Err(PathParseError::UnexpectedChar {
                        path: input.to_string(),
                        ch: c,
                    })
                }
                _ => {
                    // A key may only start the path or follow a '.'
                    if !segments.is_empty() && !need_key {
                        return Err(PathParseError::UnexpectedChar {
                            path: input.to_string(),
                            ch: c,
                        });
                    }
                    let mut key = String::new();
                    while let Some(&k) = chars.peek() {
                        if matches!(k, '.' | '[' | ']') {
                            break;
                        }
                        key.push(k);
                        chars.next();
                    }
                    segments.push(PathSegment::Key(key));
                    need_key = false;
                }
            }
        }

        if need_key {
            return Err(PathParseError::EmptyKey(input.to_string()));
        }

        Ok(Self { segments })
    }
}

/// Renders the `a.b[0]` notation. Keys are written unescaped, so
/// `Path::parse` only reads the output back as the same path when no key is
/// empty or contains `.`, `[` or `]`.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .segments
            .iter()
            .fold(String::new(), |acc, segment| {
                compose_keys(&acc, segment, segment.kind())
            });
        write!(f, "{}", rendered)
    }
}

impl std::str::FromStr for Path {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl IntoIterator for Path {
    type Item = PathSegment;
    type IntoIter = std::vec::IntoIter<PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
