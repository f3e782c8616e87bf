//! Error types and result aliases for Strata.
//!
//! This crate provides the internal error channel shared by the Strata
//! crates. User-facing translation problems are *not* reported through
//! these types; those accumulate as diagnostics against source locations
//! so that compilation can continue past them.

mod error;

pub use error::{StrataError, StrataResult};
