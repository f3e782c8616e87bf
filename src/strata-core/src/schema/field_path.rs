//! Dotted field-path utilities.

use serde::{Deserialize, Serialize};

/// A dotted field name, e.g. `aircraft.seats`.
///
/// The leaf segment names the field itself; any prefix names the relation
/// the field lives in, which aggregate locality (`structPath`) is derived
/// from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dotted name into its segments.
    pub fn parse(name: &str) -> Self {
        Self {
            segments: name.split('.').map(str::to_string).collect(),
        }
    }

    /// Build a path from segments.
    pub fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// The path segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The leaf (final) segment.
    pub fn leaf(&self) -> &str {
        self.segments
            .last()
            .map_or("", String::as_str)
    }

    /// The prefix path with the leaf stripped, if the path is qualified.
    pub fn prefix(&self) -> Option<Self> {
        if self.segments.len() > 1 {
            Some(Self {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        } else {
            None
        }
    }

    /// Check if this is a bare, unqualified name.
    pub fn is_simple(&self) -> bool {
        self.segments.len() == 1
    }

    /// Join the segments back into a dotted name.
    pub fn join(&self) -> String {
        self.segments.join(".")
    }
}

impl From<String> for FieldPath {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.join()
    }
}

impl From<&str> for FieldPath {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.join())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_join() {
        let path = FieldPath::parse("a.b.c");
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.join(), "a.b.c");
        assert_eq!(path.leaf(), "c");
    }

    #[test]
    fn test_prefix() {
        let path = FieldPath::parse("aircraft.seats");
        assert_eq!(path.prefix().unwrap().join(), "aircraft");

        let simple = FieldPath::parse("seats");
        assert!(simple.is_simple());
        assert!(simple.prefix().is_none());
    }
}
