//! Expression compiler for the Strata modeling language.
//!
//! `strata-expr` lowers a typed expression tree into a SQL *fragment
//! sequence*: literal text chunks interleaved with structured placeholders
//! (field references, aggregate calls, filtered expressions) that a
//! downstream writer splices into dialect SQL.
//!
//! # Overview
//!
//! - **Expression AST** ([`expr`]): one variant per source-language form,
//!   with fluent builders for tests and embedders.
//! - **Translation** ([`translate`]): the `translate` / `request_translation`
//!   / `apply` contract. Partial forms (ranges, alternation trees, picks
//!   that cannot self-evaluate) have no value of their own and combine
//!   through `apply` instead.
//! - **Binary engine** ([`apply`]): the operator × type matrix, including
//!   temporal promotion, granular truncation, regex matching, and
//!   null-safe negation.
//! - **Compilation** ([`compile`]): the one-walk public entry producing a
//!   compressed fragment sequence plus diagnostics.
//!
//! Translation never aborts on user errors: problems are logged against
//! source spans and an inert `error`-typed value propagates instead.
//!
//! # Example
//!
//! ```rust
//! use strata_core::testing::MapFieldSpace;
//! use strata_expr::{compile_expression, expr};
//!
//! let space = MapFieldSpace::orders();
//!
//! // price * qty > 100
//! let ast = expr::field("price")
//!     .mul(expr::field("qty"))
//!     .gt(expr::number("100"));
//!
//! let compiled = compile_expression(&ast, &space);
//! assert!(compiled.is_ok());
//! assert_eq!(strata_core::render(&compiled.value.value), "price * qty > 100");
//! ```

pub mod apply;
pub mod check;
pub mod compile;
pub mod expr;
pub mod translate;

// Re-export the compiler surface
pub use compile::{compile_expression, Compiled};
pub use translate::{apply as apply_expr, request_translation, translate as translate_expr};

// Re-export expression types at crate root for convenience
pub use expr::{
    AggFunc, AltOp, BinaryOp, CastType, Expr, LogicalOp, PickWhen, TimeKind, WhenClause,
};
