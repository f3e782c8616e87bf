//! Core data model for the Strata expression compiler.
//!
//! This crate provides the fundamental types the compiler operates over:
//! - `ExprType`, `Timeframe`, and `TypeShape` for the type system
//! - `Fragment` sequences, the compiled SQL representation
//! - `ExprValue`, the typed result of translating one expression
//! - `FieldPath` and the `FieldSpace` namespace trait
//! - `Span`, `Diagnostic`, and the `Diagnostics` sink

pub mod diagnostic;
pub mod fragment;
pub mod schema;
pub mod testing;
pub mod types;
pub mod value;

// Re-export commonly used types
pub use diagnostic::{Diagnostic, Diagnostics, Span};
pub use fragment::{compose, compress_expr, render, FilterCond, Fragment, Placeholder};
pub use schema::{AtomicField, FieldEntry, FieldPath, FieldSpace, FieldType};
pub use types::{ExprType, Timeframe, TypeShape};
pub use value::ExprValue;
