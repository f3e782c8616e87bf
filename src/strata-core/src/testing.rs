//! Testing utilities and fixtures for strata-core consumers.
//!
//! This module provides a map-backed `FieldSpace` and a ready-made schema
//! fixture so that compiler tests don't each rebuild a namespace by hand.

use std::collections::HashMap;

use crate::fragment::{FilterCond, Fragment};
use crate::schema::{AtomicField, FieldEntry, FieldSpace};
use crate::types::ExprType;

/// A `FieldSpace` backed by a hash map, for tests and examples.
#[derive(Debug, Default)]
pub struct MapFieldSpace {
    fields: HashMap<String, FieldEntry>,
}

impl MapFieldSpace {
    /// Create an empty field space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field entry.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, entry: FieldEntry) -> Self {
        self.fields.insert(name.into(), entry);
        self
    }

    /// Add a scalar dimension of the given type.
    #[must_use]
    pub fn with_dimension(self, name: impl Into<String>, data_type: ExprType) -> Self {
        self.with_field(name, FieldEntry::Atomic(AtomicField::new(data_type)))
    }

    /// Add an aggregate measure of the given type.
    #[must_use]
    pub fn with_measure(self, name: impl Into<String>, data_type: ExprType) -> Self {
        self.with_field(name, FieldEntry::Atomic(AtomicField::measure(data_type)))
    }

    /// Fixture resembling an orders table with a joined line-items relation.
    ///
    /// Dimensions: `price`, `qty` (number), `status`, `name` (string),
    /// `active` (boolean), `created_at` (timestamp), `ship_date` (date),
    /// `lines.amount` (number, nested). Measures: `sold` (number),
    /// `discounted` (number, filter-bearing). `lines` itself is a struct
    /// entry.
    pub fn orders() -> Self {
        Self::new()
            .with_dimension("price", ExprType::Number)
            .with_dimension("qty", ExprType::Number)
            .with_dimension("active", ExprType::Bool)
            .with_dimension("status", ExprType::String)
            .with_dimension("name", ExprType::String)
            .with_dimension("created_at", ExprType::Timestamp)
            .with_dimension("ship_date", ExprType::Date)
            .with_dimension("lines.amount", ExprType::Number)
            .with_field("lines", FieldEntry::Struct)
            .with_measure("sold", ExprType::Number)
            .with_field(
                "discounted",
                FieldEntry::Atomic(
                    AtomicField::measure(ExprType::Number).with_filter(FilterCond::new(vec![
                        Fragment::field("status"),
                        Fragment::text(" = 'discounted'"),
                    ])),
                ),
            )
    }
}

impl FieldSpace for MapFieldSpace {
    fn field(&self, name: &str) -> Option<&FieldEntry> {
        self.fields.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_fixture() {
        let space = MapFieldSpace::orders();

        let price = space.field("price").unwrap().field_type().unwrap();
        assert_eq!(price.data_type, ExprType::Number);
        assert!(!price.aggregate);

        let sold = space.field("sold").unwrap().field_type().unwrap();
        assert!(sold.aggregate);

        assert!(!space.field("lines").unwrap().is_atomic());
        assert!(space.field("missing").is_none());
        assert!(!space.field("discounted").unwrap().filter_list().is_empty());
    }
}
