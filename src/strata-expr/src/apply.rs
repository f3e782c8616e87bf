//! The binary application engine.
//!
//! `apply_binary` is the single entry point for composing two expressions
//! under a binary operator. It dispatches on the operator and the operands'
//! data types, handling numeric arithmetic, comparisons with temporal
//! promotion and granular truncation, regex matching, and boolean
//! combination. Partial right-hand forms never reach this module; their
//! `apply` overrides in `translate` take the application apart first.

use strata_core::{
    compose, Diagnostics, ExprType, ExprValue, FieldSpace, Fragment, Span, Timeframe, TypeShape,
};

use crate::check::{type_check, BOOL_OPERAND, NUMBER_OPERAND};
use crate::expr::{BinaryOp, Expr, LogicalOp};
use crate::translate::translate;

const MATCH_OPERAND: &[TypeShape] = &[
    TypeShape::of(ExprType::String),
    TypeShape::of(ExprType::Regex),
];
const MATCH_RHS_OF_REGEX: &[TypeShape] = &[TypeShape::of(ExprType::String)];

/// Compose two translated expressions under a binary operator.
pub fn apply_binary(
    fs: &dyn FieldSpace,
    left: &Expr,
    op: BinaryOp,
    right: &Expr,
    diags: &mut Diagnostics,
) -> ExprValue {
    if op.is_arithmetic() {
        arithmetic(fs, left, op, right, diags)
    } else if op.is_comparison() {
        comparison(fs, left, op, right, diags)
    } else {
        pattern_match(fs, left, op, right, diags)
    }
}

fn arithmetic(
    fs: &dyn FieldSpace,
    left: &Expr,
    op: BinaryOp,
    right: &Expr,
    diags: &mut Diagnostics,
) -> ExprValue {
    let lv = translate(left, fs, diags);
    let rv = translate(right, fs, diags);

    let l_ok = type_check(op.symbol(), left.span(), &lv, NUMBER_OPERAND, diags);
    let r_ok = type_check(op.symbol(), right.span(), &rv, NUMBER_OPERAND, diags);
    if !l_ok || !r_ok {
        return ExprValue::error();
    }

    ExprValue::new(
        ExprType::Number,
        lv.aggregate || rv.aggregate,
        compose(&lv.value, op.symbol(), &rv.value),
    )
}

fn comparison(
    fs: &dyn FieldSpace,
    left: &Expr,
    op: BinaryOp,
    right: &Expr,
    diags: &mut Diagnostics,
) -> ExprValue {
    let mut lv = translate(left, fs, diags);
    let mut rv = translate(right, fs, diags);
    if lv.is_error() || rv.is_error() {
        return ExprValue::error();
    }

    // Mixed temporal comparison promotes the coarser side to timestamp.
    if lv.data_type.is_temporal() && rv.data_type.is_temporal() && lv.data_type != rv.data_type {
        if lv.data_type == ExprType::Date {
            lv = promote_to_timestamp(lv);
        } else {
            rv = promote_to_timestamp(rv);
        }
    }

    // Granular equality truncates the non-granular side first.
    if op.is_equality() {
        if lv.is_granular() && rv.data_type.is_temporal() && !rv.is_granular() {
            rv = truncate_to(rv, lv.timeframe.unwrap_or(Timeframe::Day));
        } else if rv.is_granular() && lv.data_type.is_temporal() && !lv.is_granular() {
            lv = truncate_to(lv, rv.timeframe.unwrap_or(Timeframe::Day));
        }
    }

    if !lv.loose_type_equal(&rv) {
        diags.log(
            right.span(),
            format!("'{}' Can't use type {}", op.symbol(), rv.describe_type()),
        );
        return ExprValue::error();
    }

    ExprValue::new(
        ExprType::Bool,
        lv.aggregate || rv.aggregate,
        compose(&lv.value, op.symbol(), &rv.value),
    )
}

fn pattern_match(
    fs: &dyn FieldSpace,
    left: &Expr,
    op: BinaryOp,
    right: &Expr,
    diags: &mut Diagnostics,
) -> ExprValue {
    let lv = translate(left, fs, diags);
    let rv = translate(right, fs, diags);

    if !type_check(op.symbol(), left.span(), &lv, MATCH_OPERAND, diags) {
        return ExprValue::error();
    }
    let legal_right = if lv.data_type == ExprType::Regex {
        MATCH_RHS_OF_REGEX
    } else {
        MATCH_OPERAND
    };
    if !type_check(op.symbol(), right.span(), &rv, legal_right, diags) {
        return ExprValue::error();
    }

    let aggregate = lv.aggregate || rv.aggregate;
    let matched = match (lv.data_type, rv.data_type) {
        (ExprType::String, ExprType::Regex) => regex_match(&lv.value, &rv.value),
        (ExprType::Regex, ExprType::String) => regex_match(&rv.value, &lv.value),
        _ => compose(&lv.value, "LIKE", &rv.value),
    };

    let value = match op {
        BinaryOp::NotMatch => nullsafe_not(&matched),
        _ => matched,
    };
    ExprValue::new(ExprType::Bool, aggregate, value)
}

/// Compose two already-translated boolean values with `and` / `or`.
///
/// Both the boolean combinator nodes and alternation distribution come
/// through here; the emitted SQL preserves the operand order.
pub fn compose_logical(
    op: LogicalOp,
    left: (ExprValue, Span),
    right: (ExprValue, Span),
    diags: &mut Diagnostics,
) -> ExprValue {
    let (lv, l_span) = left;
    let (rv, r_span) = right;

    let l_ok = type_check(op.sql(), l_span, &lv, BOOL_OPERAND, diags);
    let r_ok = type_check(op.sql(), r_span, &rv, BOOL_OPERAND, diags);
    if !l_ok || !r_ok {
        return ExprValue::error();
    }

    ExprValue::new(
        ExprType::Bool,
        lv.aggregate || rv.aggregate,
        compose(&lv.value, op.sql(), &rv.value),
    )
}

/// Null-safe negation: yields true when the inner expression is null,
/// preserving the three-valued-logic intent that `not null` must not
/// suppress rows from filtering.
pub fn nullsafe_not(inner: &[Fragment]) -> Vec<Fragment> {
    let mut out = Vec::with_capacity(2 * inner.len() + 3);
    out.push(Fragment::text("(("));
    out.extend_from_slice(inner);
    out.push(Fragment::text(") is null or not ("));
    out.extend_from_slice(inner);
    out.push(Fragment::text("))"));
    out
}

/// Promote a date value to a timestamp.
fn promote_to_timestamp(value: ExprValue) -> ExprValue {
    let mut out = Vec::with_capacity(value.value.len() + 2);
    out.push(Fragment::text("TIMESTAMP("));
    out.extend(value.value);
    out.push(Fragment::text(")"));
    ExprValue::new(ExprType::Timestamp, value.aggregate, out).with_timeframe(value.timeframe)
}

/// Truncate a temporal value to a timeframe.
fn truncate_to(value: ExprValue, timeframe: Timeframe) -> ExprValue {
    let trunc = match value.data_type {
        ExprType::Date => "DATE_TRUNC(",
        _ => "TIMESTAMP_TRUNC(",
    };
    let mut out = Vec::with_capacity(value.value.len() + 3);
    out.push(Fragment::text(trunc));
    out.extend(value.value);
    out.push(Fragment::text(format!(", {})", timeframe.sql_unit())));
    ExprValue::new(value.data_type, value.aggregate, out).with_timeframe(Some(timeframe))
}

fn regex_match(text: &[Fragment], pattern: &[Fragment]) -> Vec<Fragment> {
    let mut out = Vec::with_capacity(text.len() + pattern.len() + 3);
    out.push(Fragment::text("REGEXP_CONTAINS("));
    out.extend_from_slice(text);
    out.push(Fragment::text(", "));
    out.extend_from_slice(pattern);
    out.push(Fragment::text(")"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::render;

    #[test]
    fn test_nullsafe_not_shape() {
        let inner = vec![Fragment::field("flag")];
        assert_eq!(render(&nullsafe_not(&inner)), "((flag) is null or not (flag))");
    }

    #[test]
    fn test_truncate_units() {
        let date = ExprValue::scalar(ExprType::Date, vec![Fragment::field("d")]);
        let truncated = truncate_to(date, Timeframe::Week);
        assert_eq!(render(&truncated.value), "DATE_TRUNC(d, WEEK)");
        assert!(truncated.is_granular());

        let ts = ExprValue::scalar(ExprType::Timestamp, vec![Fragment::field("t")]);
        let truncated = truncate_to(ts, Timeframe::Month);
        assert_eq!(render(&truncated.value), "TIMESTAMP_TRUNC(t, MONTH)");
    }

    #[test]
    fn test_promotion_wraps_in_timestamp() {
        let date = ExprValue::scalar(ExprType::Date, vec![Fragment::field("d")]);
        let promoted = promote_to_timestamp(date);
        assert_eq!(promoted.data_type, ExprType::Timestamp);
        assert_eq!(render(&promoted.value), "TIMESTAMP(d)");
    }
}
