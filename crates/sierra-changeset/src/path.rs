//! Element paths for addressing within template documents
//!
//! Provides [`ElementPath`] for hierarchical addressing of elements within a
//! simulator input template.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// How the first segment of a path is matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Anchor {
    /// `./a/b`: first segment must be a direct child of the root
    Child,

    /// `.//a/b`: first segment may appear anywhere below the root
    Descendant,
}

/// Path within a template document
///
/// Used to address the element a parameter change targets.
///
/// # Examples
/// - `.//arena/distribute/entity` → any `arena` element, then `distribute/entity`
/// - `./controllers/footbot` → direct child `controllers`, then `footbot`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ElementPath {
    anchor: Anchor,
    segments: Vec<String>,
}

impl ElementPath {
    /// Create new path from segments
    #[inline]
    #[must_use]
    pub fn new(anchor: Anchor, segments: Vec<String>) -> Self {
        Self { anchor, segments }
    }

    /// Descendant-anchored path from tag names
    #[must_use]
    pub fn descendant(segments: &[&str]) -> Self {
        Self {
            anchor: Anchor::Descendant,
            segments: segments.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Empty path (the root itself)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self {
            anchor: Anchor::Child,
            segments: Vec::new(),
        }
    }

    /// Anchor of the first segment
    #[inline]
    #[must_use]
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get parent path (if not root)
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            None
        } else {
            Some(Self {
                anchor: self.anchor,
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    /// Get last segment (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Append a segment, returning new path
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.segments.push(segment.into());
        new
    }
}

impl Display for ElementPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, ".");
        }
        let prefix = match self.anchor {
            Anchor::Child => "./",
            Anchor::Descendant => ".//",
        };
        write!(f, "{prefix}{}", self.segments.join("/"))
    }
}

impl FromStr for ElementPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (anchor, rest) = if let Some(rest) = s.strip_prefix(".//") {
            (Anchor::Descendant, rest)
        } else if let Some(rest) = s.strip_prefix("./") {
            (Anchor::Child, rest)
        } else if s == "." {
            return Ok(Self::root());
        } else {
            return Err(PathError::MissingAnchor(s.to_string()));
        };

        let segments: Vec<String> = rest
            .split('/')
            .map(|seg| {
                if seg.is_empty() {
                    Err(PathError::EmptySegment)
                } else if seg.contains(|c: char| !c.is_alphanumeric() && c != '_' && c != '-') {
                    Err(PathError::InvalidSegment(seg.to_string()))
                } else {
                    Ok(seg.to_string())
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { anchor, segments })
    }
}

impl TryFrom<String> for ElementPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ElementPath> for String {
    fn from(path: ElementPath) -> Self {
        path.to_string()
    }
}

/// Errors related to element paths
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Path does not start with `./` or `.//`
    #[error("path '{0}' must start with './' or './/'")]
    MissingAnchor(String),

    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,

    /// Invalid segment characters
    #[error("invalid segment: {0} (must be alphanumeric, '-' or '_')")]
    InvalidSegment(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_from_str_descendant() {
        let path: ElementPath = ".//arena/distribute/entity".parse().unwrap();
        assert_eq!(path.anchor(), Anchor::Descendant);
        assert_eq!(path.segments(), &["arena", "distribute", "entity"]);
    }

    #[test]
    fn path_from_str_child() {
        let path: ElementPath = "./controllers/foot-bot".parse().unwrap();
        assert_eq!(path.anchor(), Anchor::Child);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn path_display_roundtrips() {
        let path = ElementPath::descendant(&["arena_map", "blocks"]);
        assert_eq!(path.to_string(), ".//arena_map/blocks");
        let parsed: ElementPath = path.to_string().parse().unwrap();
        assert_eq!(parsed, path);
    }

    #[test]
    fn path_root() {
        let path: ElementPath = ".".parse().unwrap();
        assert!(path.is_empty());
        assert!(path.parent().is_none());
    }

    #[test]
    fn path_parent_and_child() {
        let path = ElementPath::descendant(&["a", "b"]);
        assert_eq!(path.parent().unwrap().segments(), &["a"]);
        assert_eq!(path.child("c").last(), Some("c"));
    }

    #[test]
    fn path_from_str_missing_anchor() {
        let result: Result<ElementPath, _> = "arena/entity".parse();
        assert!(matches!(result, Err(PathError::MissingAnchor(_))));
    }

    #[test]
    fn path_from_str_empty_segment() {
        let result: Result<ElementPath, _> = ".//a//b".parse();
        assert!(matches!(result, Err(PathError::EmptySegment)));
    }

    #[test]
    fn path_from_str_invalid_chars() {
        let result: Result<ElementPath, _> = ".//a/b[1]".parse();
        assert!(matches!(result, Err(PathError::InvalidSegment(_))));
    }
}
