//! Data type definitions for expression values.

use serde::{Deserialize, Serialize};

/// Scalar data type of an expression value.
///
/// This is a closed set: every value flowing through translation carries
/// exactly one of these. `Error` is a sentinel propagated after a
/// translation failure; operations over an `Error`-typed value are inert
/// and must not produce further diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExprType {
    /// UTF-8 string.
    String,
    /// Numeric (integer or floating point; the target dialect decides).
    Number,
    /// Boolean.
    #[serde(rename = "boolean")]
    Bool,
    /// Calendar date.
    Date,
    /// Point-in-time timestamp.
    Timestamp,
    /// The SQL NULL literal.
    Null,
    /// Regular expression literal.
    Regex,
    /// Error sentinel; see type invariants above.
    Error,
}

impl ExprType {
    /// Check if this type is numeric.
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Number)
    }

    /// Check if this type is a temporal type.
    pub const fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::Timestamp)
    }

    /// Check if this type is the error sentinel.
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Get the display name for this type, as used in diagnostics.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "boolean",
            Self::Date => "date",
            Self::Timestamp => "timestamp",
            Self::Null => "null",
            Self::Regex => "regular expression",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for ExprType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_predicates() {
        assert!(ExprType::Number.is_numeric());
        assert!(!ExprType::String.is_numeric());
        assert!(ExprType::Date.is_temporal());
        assert!(ExprType::Timestamp.is_temporal());
        assert!(!ExprType::Number.is_temporal());
        assert!(ExprType::Error.is_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ExprType::Bool), "boolean");
        assert_eq!(format!("{}", ExprType::Regex), "regular expression");
    }
}
