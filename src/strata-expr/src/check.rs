//! Legal-child-type checking.

use strata_core::{Diagnostics, ExprType, ExprValue, Span, TypeShape};

/// Boolean operand at any aggregation-ness.
pub(crate) const BOOL_OPERAND: &[TypeShape] = &[TypeShape::of(ExprType::Bool)];

/// Numeric operand at any aggregation-ness.
pub(crate) const NUMBER_OPERAND: &[TypeShape] = &[TypeShape::of(ExprType::Number)];

/// Boolean or null operand, as `not` accepts.
pub(crate) const BOOL_OR_NULL_OPERAND: &[TypeShape] = &[
    TypeShape::of(ExprType::Bool),
    TypeShape::of(ExprType::Null),
];

/// Check a translated operand against a node's legal child shapes.
///
/// On failure, logs `'<element_type>' Can't use type <type>` against the
/// operand's source span and returns false; the caller must then produce
/// an error value without composing further.
///
/// An `Error`-typed operand fails the check silently: its failure was
/// already diagnosed where it was produced.
pub fn type_check(
    element_type: &str,
    operand_span: Span,
    value: &ExprValue,
    legal: &[TypeShape],
    diags: &mut Diagnostics,
) -> bool {
    if value.is_error() {
        return false;
    }
    if legal
        .iter()
        .any(|shape| shape.admits(value.data_type, value.aggregate))
    {
        return true;
    }
    diags.log(
        operand_span,
        format!(
            "'{element_type}' Can't use type {}",
            value.describe_type()
        ),
    );
    false
}
