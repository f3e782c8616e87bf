//! Source-located diagnostics accumulated during translation.
//!
//! Translation never aborts on user-level problems: each one is logged
//! against the offending node's source span and an inert error value is
//! returned in its place, so siblings keep translating. The sink is passed
//! by mutable reference through the walk; there are no globals.

use serde::{Deserialize, Serialize};

/// A byte range in the source text an expression node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the start of the node.
    pub start: u32,
    /// Byte offset one past the end of the node.
    pub end: u32,
}

impl Span {
    /// Create a new span.
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A message attached to a source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Where in the source the problem was found.
    pub span: Span,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.span, self.message)
    }
}

/// Per-compilation diagnostics sink.
#[derive(Debug, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic against a source span.
    pub fn log(&mut self, span: Span, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            span,
            message: message.into(),
        });
    }

    /// Check if anything has been logged.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of logged diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Iterate the logged diagnostics in order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Consume the sink, yielding the diagnostics in log order.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_order_preserved() {
        let mut sink = Diagnostics::new();
        sink.log(Span::new(0, 3), "first");
        sink.log(Span::new(4, 9), "second");

        let collected = sink.into_vec();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].message, "first");
        assert_eq!(collected[1].message, "second");
        assert_eq!(collected[1].span, Span::new(4, 9));
    }

    #[test]
    fn test_display() {
        let diag = Diagnostic {
            span: Span::new(2, 5),
            message: "Reference to undefined field 'x'".to_string(),
        };
        assert_eq!(diag.to_string(), "2..5: Reference to undefined field 'x'");
    }
}
