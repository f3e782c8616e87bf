//! Legal-operand descriptors for expression nodes.

use serde::{Deserialize, Serialize};

use super::data_type::ExprType;

/// An acceptable operand shape: a data type, optionally constrained to a
/// specific aggregation-ness.
///
/// Expression nodes carry a set of these describing what their children may
/// be. A shape with `aggregate: None` admits both aggregate and scalar
/// operands of the given type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeShape {
    /// The admitted data type.
    pub data_type: ExprType,
    /// Aggregation-ness constraint, if any.
    pub aggregate: Option<bool>,
}

impl TypeShape {
    /// A shape admitting the given type at any aggregation-ness.
    pub const fn of(data_type: ExprType) -> Self {
        Self {
            data_type,
            aggregate: None,
        }
    }

    /// A shape admitting only scalar (non-aggregate) values of the type.
    pub const fn scalar(data_type: ExprType) -> Self {
        Self {
            data_type,
            aggregate: Some(false),
        }
    }

    /// A shape admitting only aggregate values of the type.
    pub const fn aggregate(data_type: ExprType) -> Self {
        Self {
            data_type,
            aggregate: Some(true),
        }
    }

    /// Check whether a (type, aggregate) pair satisfies this shape.
    pub fn admits(&self, data_type: ExprType, aggregate: bool) -> bool {
        self.data_type == data_type && self.aggregate.map_or(true, |a| a == aggregate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits() {
        let any_number = TypeShape::of(ExprType::Number);
        assert!(any_number.admits(ExprType::Number, false));
        assert!(any_number.admits(ExprType::Number, true));
        assert!(!any_number.admits(ExprType::String, false));

        let scalar_number = TypeShape::scalar(ExprType::Number);
        assert!(scalar_number.admits(ExprType::Number, false));
        assert!(!scalar_number.admits(ExprType::Number, true));
    }
}
