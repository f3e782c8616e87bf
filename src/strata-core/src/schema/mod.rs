//! Field naming and namespace resolution.
//!
//! This module provides:
//! - `FieldPath` for dotted field names
//! - `FieldSpace`, the namespace trait the compiler resolves names against
//! - `FieldEntry` / `AtomicField` / `FieldType` describing resolved fields

mod field_path;
mod space;

pub use field_path::FieldPath;
pub use space::{AtomicField, FieldEntry, FieldSpace, FieldType};
