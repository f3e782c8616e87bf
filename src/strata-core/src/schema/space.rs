//! The field namespace consumed during translation.

use serde::{Deserialize, Serialize};

use crate::fragment::FilterCond;
use crate::types::ExprType;

/// Data type and aggregation-ness of a field, as reported by its entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldType {
    /// Scalar data type of the field.
    pub data_type: ExprType,
    /// Whether the field is an aggregate computation (a measure).
    pub aggregate: bool,
}

/// A field known to a [`FieldSpace`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldEntry {
    /// A value-bearing field or measure.
    Atomic(AtomicField),
    /// A nested relation; has no scalar type of its own.
    Struct,
}

impl FieldEntry {
    /// The field's (type, aggregate) pair; `None` for struct entries.
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Self::Atomic(field) => Some(FieldType {
                data_type: field.data_type,
                aggregate: field.aggregate,
            }),
            Self::Struct => None,
        }
    }

    /// Filter conditions attached to a filter-bearing field.
    pub fn filter_list(&self) -> &[FilterCond] {
        match self {
            Self::Atomic(field) => &field.filter_list,
            Self::Struct => &[],
        }
    }

    /// Check if the entry is an atomic (value-bearing) field.
    pub const fn is_atomic(&self) -> bool {
        matches!(self, Self::Atomic(_))
    }
}

/// An atomic field entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicField {
    /// Scalar data type.
    pub data_type: ExprType,
    /// Whether the field is an aggregate computation.
    pub aggregate: bool,
    /// Filter conditions for filter-bearing fields.
    pub filter_list: Vec<FilterCond>,
}

impl AtomicField {
    /// Create a scalar dimension of the given type.
    pub fn new(data_type: ExprType) -> Self {
        Self {
            data_type,
            aggregate: false,
            filter_list: Vec::new(),
        }
    }

    /// Create an aggregate measure of the given type.
    pub fn measure(data_type: ExprType) -> Self {
        Self {
            data_type,
            aggregate: true,
            filter_list: Vec::new(),
        }
    }

    /// Attach a filter condition.
    #[must_use]
    pub fn with_filter(mut self, cond: FilterCond) -> Self {
        self.filter_list.push(cond);
        self
    }
}

/// Namespace resolving dotted field names to typed entries.
///
/// The compiler depends only on this lookup capability; symbol-table
/// construction lives with the caller.
pub trait FieldSpace {
    /// Look up a field by its dotted name.
    fn field(&self, name: &str) -> Option<&FieldEntry>;
}
