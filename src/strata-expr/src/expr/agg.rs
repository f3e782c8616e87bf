//! Aggregate functions for expressions.

use serde::{Deserialize, Serialize};

use strata_core::{ExprType, TypeShape};

/// Operand shapes legal under aggregates that take a numeric child.
const NUMERIC_CHILD: &[TypeShape] = &[TypeShape::scalar(ExprType::Number)];

/// Operand shapes legal under aggregates over any comparable child.
const COMPARABLE_CHILD: &[TypeShape] = &[
    TypeShape::scalar(ExprType::Number),
    TypeShape::scalar(ExprType::String),
    TypeShape::scalar(ExprType::Date),
    TypeShape::scalar(ExprType::Timestamp),
];

/// Aggregate function types.
///
/// Aggregate values require a `GROUP BY` context downstream; an aggregate
/// of an aggregate is illegal, which is why every legal-child shape above
/// pins `aggregate` to false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggFunc {
    /// Count rows.
    Count,
    /// Count distinct values.
    CountDistinct,
    /// Sum of values.
    Sum,
    /// Average value.
    Avg,
    /// Minimum value.
    Min,
    /// Maximum value.
    Max,
}

impl AggFunc {
    /// Get the function name as emitted into aggregate fragments.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::CountDistinct => "count_distinct",
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Get the result type of this aggregate given the child type.
    ///
    /// `min`/`max` preserve the child type; everything else is numeric.
    pub fn returns(&self, child: Option<ExprType>) -> ExprType {
        match self {
            Self::Count | Self::CountDistinct | Self::Sum | Self::Avg => ExprType::Number,
            Self::Min | Self::Max => child.unwrap_or(ExprType::Number),
        }
    }

    /// Operand shapes this aggregate accepts.
    ///
    /// `count` takes no child at all, expressed as the empty set.
    pub const fn legal_child_types(&self) -> &'static [TypeShape] {
        match self {
            Self::Count => &[],
            Self::Sum | Self::Avg => NUMERIC_CHILD,
            Self::CountDistinct | Self::Min | Self::Max => COMPARABLE_CHILD,
        }
    }

    /// Check if this aggregate requires an expression operand.
    pub const fn requires_expression(&self) -> bool {
        !matches!(self, Self::Count)
    }

    /// Default output-name prefix for aggregates computed against a named
    /// source with no explicit expression (`sum` and `avg` only).
    pub const fn default_name_prefix(&self) -> Option<&'static str> {
        match self {
            Self::Sum => Some("total_"),
            Self::Avg => Some("avg_"),
            _ => None,
        }
    }
}

impl std::fmt::Display for AggFunc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
