//! Typed results of expression translation.

use serde::{Deserialize, Serialize};

use crate::fragment::Fragment;
use crate::types::{ExprType, Timeframe};

/// The result of translating one expression node.
///
/// Carries the scalar data type, whether evaluation requires a `GROUP BY`
/// context, optional temporal granularity, and the fragment sequence the
/// downstream writer will splice into SQL.
///
/// An `ExprValue` whose type is [`ExprType::Error`] is inert: consumers
/// must neither emit diagnostics for it nor derive new errors from it,
/// since the failure was already reported when the value was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprValue {
    /// Scalar data type of the value.
    #[serde(rename = "dataType")]
    pub data_type: ExprType,
    /// Whether evaluation requires aggregation.
    pub aggregate: bool,
    /// Temporal granularity, for granular dates and timestamps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<Timeframe>,
    /// The lowered fragment sequence.
    pub value: Vec<Fragment>,
}

impl ExprValue {
    /// Create a scalar (non-aggregate) value of the given type.
    pub fn scalar(data_type: ExprType, value: Vec<Fragment>) -> Self {
        Self {
            data_type,
            aggregate: false,
            timeframe: None,
            value,
        }
    }

    /// Create a value with explicit aggregation-ness.
    pub fn new(data_type: ExprType, aggregate: bool, value: Vec<Fragment>) -> Self {
        Self {
            data_type,
            aggregate,
            timeframe: None,
            value,
        }
    }

    /// Create a string value from a single literal chunk.
    pub fn string(text: impl Into<String>) -> Self {
        Self::scalar(ExprType::String, vec![Fragment::text(text)])
    }

    /// Create a number value from a single literal chunk.
    pub fn number(text: impl Into<String>) -> Self {
        Self::scalar(ExprType::Number, vec![Fragment::text(text)])
    }

    /// Create a boolean value from a single literal chunk.
    pub fn boolean(text: impl Into<String>) -> Self {
        Self::scalar(ExprType::Bool, vec![Fragment::text(text)])
    }

    /// Create the SQL NULL value.
    pub fn null() -> Self {
        Self::scalar(ExprType::Null, vec![Fragment::text("NULL")])
    }

    /// Create an error value.
    ///
    /// The diagnostic explaining the failure must already have been logged;
    /// the returned value only propagates the failure inertly.
    pub fn error() -> Self {
        Self::scalar(ExprType::Error, Vec::new())
    }

    /// Attach a timeframe, making a temporal value granular.
    #[must_use]
    pub fn with_timeframe(mut self, timeframe: Option<Timeframe>) -> Self {
        self.timeframe = timeframe;
        self
    }

    /// Check if this is the inert error value.
    pub const fn is_error(&self) -> bool {
        self.data_type.is_error()
    }

    /// Check if this is a granular temporal value.
    pub const fn is_granular(&self) -> bool {
        self.data_type.is_temporal() && self.timeframe.is_some()
    }

    /// Type equality: data types match exactly.
    ///
    /// Aggregation-ness is never part of type equality.
    pub fn type_equal(&self, other: &Self) -> bool {
        self.data_type == other.data_type
    }

    /// Loose type equality: like [`type_equal`](Self::type_equal), but
    /// `null` is additionally equal to anything.
    pub fn loose_type_equal(&self, other: &Self) -> bool {
        self.data_type == ExprType::Null
            || other.data_type == ExprType::Null
            || self.type_equal(other)
    }

    /// Describe this value's type for diagnostics, e.g. `aggregate number`.
    pub fn describe_type(&self) -> String {
        if self.aggregate {
            format!("aggregate {}", self.data_type)
        } else {
            self.data_type.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let n = ExprValue::number("42");
        assert_eq!(n.data_type, ExprType::Number);
        assert!(!n.aggregate);
        assert_eq!(n.value, vec![Fragment::text("42")]);

        let e = ExprValue::error();
        assert!(e.is_error());
        assert!(e.value.is_empty());
    }

    #[test]
    fn test_type_equality_ignores_aggregate() {
        let scalar = ExprValue::number("1");
        let aggregate = ExprValue::new(ExprType::Number, true, vec![Fragment::text("1")]);
        assert!(scalar.type_equal(&aggregate));
    }

    #[test]
    fn test_loose_equality_treats_null_as_wild() {
        let n = ExprValue::number("1");
        let null = ExprValue::null();
        let s = ExprValue::string("'a'");
        assert!(n.loose_type_equal(&null));
        assert!(null.loose_type_equal(&s));
        assert!(!n.loose_type_equal(&s));
    }

    #[test]
    fn test_granularity() {
        let plain = ExprValue::scalar(ExprType::Date, vec![Fragment::text("DATE '2023-01-01'")]);
        assert!(!plain.is_granular());
        let granular = plain.with_timeframe(Some(Timeframe::Week));
        assert!(granular.is_granular());
    }

    #[test]
    fn test_describe_type() {
        let agg = ExprValue::new(ExprType::Number, true, Vec::new());
        assert_eq!(agg.describe_type(), "aggregate number");
        assert_eq!(ExprValue::string("'x'").describe_type(), "string");
    }
}
