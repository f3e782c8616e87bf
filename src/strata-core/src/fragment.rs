//! SQL fragment sequences, the compiler's output representation.
//!
//! Translation lowers an expression tree into an ordered list of fragments:
//! literal SQL text chunks interleaved with structured placeholders that a
//! downstream SQL writer resolves for a particular dialect. The placeholder
//! tag strings (`"field"`, `"aggregate"`, `"filterExpression"`) and their
//! field names (`path`, `function`, `e`, `structPath`, `filterList`) cross
//! the compilation / code-generation boundary and must stay stable; they
//! are produced verbatim through the serde shapes below.

use serde::{Deserialize, Serialize};

/// One element of a fragment sequence.
///
/// Literal text serializes as a bare JSON string; placeholders serialize as
/// objects discriminated by their `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fragment {
    /// A literal piece of SQL text, opaque to the compiler.
    Text(String),
    /// A structured placeholder for the downstream writer.
    Placeholder(Placeholder),
}

/// A structured placeholder within a fragment sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Placeholder {
    /// A reference to a field, by dotted path.
    #[serde(rename = "field")]
    Field {
        /// Dotted field name resolved by the writer.
        path: String,
    },

    /// An aggregate function call.
    #[serde(rename = "aggregate")]
    Aggregate {
        /// Aggregate function name (`count`, `sum`, ...).
        function: String,
        /// Fragment sequence for the aggregated expression.
        e: Vec<Fragment>,
        /// Dotted path of the relation the aggregate is scoped to, if any.
        #[serde(rename = "structPath", skip_serializing_if = "Option::is_none")]
        struct_path: Option<String>,
    },

    /// An expression evaluated under a list of filter conditions.
    #[serde(rename = "filterExpression")]
    FilterExpression {
        /// Fragment sequence for the filtered expression.
        e: Vec<Fragment>,
        /// Conditions restricting the rows the expression sees.
        #[serde(rename = "filterList")]
        filter_list: Vec<FilterCond>,
    },
}

/// One filter condition attached to a `filterExpression` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCond {
    /// Fragment sequence of the boolean condition.
    pub value: Vec<Fragment>,
    /// Whether the condition is an aggregate computation.
    pub aggregate: bool,
}

impl FilterCond {
    /// Create a new scalar filter condition.
    pub fn new(value: Vec<Fragment>) -> Self {
        Self {
            value,
            aggregate: false,
        }
    }
}

impl Fragment {
    /// Create a literal text fragment.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a field-reference placeholder.
    pub fn field(path: impl Into<String>) -> Self {
        Self::Placeholder(Placeholder::Field { path: path.into() })
    }

    /// Create an aggregate-call placeholder.
    pub fn aggregate(
        function: impl Into<String>,
        e: Vec<Fragment>,
        struct_path: Option<String>,
    ) -> Self {
        Self::Placeholder(Placeholder::Aggregate {
            function: function.into(),
            e,
            struct_path,
        })
    }

    /// Create a filtered-expression placeholder.
    pub fn filter_expression(e: Vec<Fragment>, filter_list: Vec<FilterCond>) -> Self {
        Self::Placeholder(Placeholder::FilterExpression { e, filter_list })
    }

    /// Get the literal text of this fragment, if it is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Placeholder(_) => None,
        }
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl std::fmt::Display for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text}"),
            Self::Placeholder(Placeholder::Field { path }) => write!(f, "{path}"),
            Self::Placeholder(Placeholder::Aggregate {
                function,
                e,
                struct_path,
            }) => {
                match struct_path {
                    Some(path) => write!(f, "{function}[{path}](")?,
                    None => write!(f, "{function}(")?,
                }
                for fragment in e {
                    write!(f, "{fragment}")?;
                }
                write!(f, ")")
            }
            Self::Placeholder(Placeholder::FilterExpression { e, filter_list }) => {
                write!(f, "(")?;
                for fragment in e {
                    write!(f, "{fragment}")?;
                }
                write!(f, " WHERE ")?;
                for (i, cond) in filter_list.iter().enumerate() {
                    if i > 0 {
                        write!(f, " and ")?;
                    }
                    for fragment in &cond.value {
                        write!(f, "{fragment}")?;
                    }
                }
                write!(f, ")")
            }
        }
    }
}

/// Compose two fragment sequences around a binary operator.
///
/// Produces `[..left, " op ", ..right]`; the operator text is padded with
/// single spaces.
pub fn compose(left: &[Fragment], op: &str, right: &[Fragment]) -> Vec<Fragment> {
    let mut out = Vec::with_capacity(left.len() + right.len() + 1);
    out.extend_from_slice(left);
    out.push(Fragment::text(format!(" {op} ")));
    out.extend_from_slice(right);
    out
}

/// Merge adjacent literal-text fragments into one.
///
/// Compression is idempotent and preserves placeholder positions.
pub fn compress_expr(seq: Vec<Fragment>) -> Vec<Fragment> {
    let mut out: Vec<Fragment> = Vec::with_capacity(seq.len());
    for fragment in seq {
        match fragment {
            Fragment::Text(text) => match out.last_mut() {
                Some(Fragment::Text(tail)) => tail.push_str(&text),
                _ => out.push(Fragment::Text(text)),
            },
            placeholder => out.push(placeholder),
        }
    }
    out
}

/// Render a fragment sequence for display or test assertions.
///
/// Placeholders render in their diagnostic form; this is *not* dialect SQL.
pub fn render(seq: &[Fragment]) -> String {
    seq.iter().map(ToString::to_string).collect()
}
