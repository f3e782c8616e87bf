//! Node-by-node translation of the expression tree.
//!
//! Three operations make up the contract:
//!
//! - [`translate`] lowers a node to a typed [`ExprValue`]. Partial nodes
//!   (ranges, alternation trees, picks that cannot self-evaluate) have no
//!   value; asking them for one is diagnosed and yields an error value.
//! - [`request_translation`] is the polite form: it returns `None` instead
//!   of diagnosing when the node is partial, letting a parent decide to
//!   apply it instead.
//! - [`apply`] composes a left-hand expression with a node under a binary
//!   operator. Dispatch is on the *right-hand* node so that partial forms
//!   can take the application apart: ranges become comparison pairs,
//!   alternation trees distribute, picks become case expressions.

use strata_core::{
    compress_expr, Diagnostics, ExprType, ExprValue, FieldEntry, FieldPath, FieldSpace,
    FilterCond, Fragment, Span,
};

use crate::apply::{apply_binary, compose_logical, nullsafe_not};
use crate::check::{type_check, BOOL_OPERAND, BOOL_OR_NULL_OPERAND, NUMBER_OPERAND};
use crate::expr::{AggFunc, BinaryOp, CastType, Expr, LogicalOp, PickWhen, WhenClause};

/// Translate an expression to its typed fragment-sequence value.
pub fn translate(expr: &Expr, fs: &dyn FieldSpace, diags: &mut Diagnostics) -> ExprValue {
    match expr {
        Expr::StringLiteral { value, .. } => ExprValue::string(sql_quote(value)),
        Expr::NumberLiteral { value, .. } => ExprValue::number(value.clone()),
        Expr::RegexLiteral { value, .. } => ExprValue::scalar(
            ExprType::Regex,
            vec![Fragment::text(sql_quote(value))],
        ),
        Expr::TimeLiteral {
            kind,
            value,
            timeframe,
            ..
        } => ExprValue::scalar(
            kind.data_type(),
            vec![Fragment::text(format!("{} '{value}'", kind.sql_prefix()))],
        )
        .with_timeframe(*timeframe),
        Expr::BooleanLiteral { value, .. } => {
            ExprValue::boolean(if *value { "true" } else { "false" })
        }
        Expr::NullLiteral { .. } => ExprValue::null(),

        Expr::Field { path, span } => translate_field(path, *span, fs, diags),

        Expr::Parens { expr, .. } => {
            let inner = translate(expr, fs, diags);
            if inner.is_error() {
                return inner;
            }
            let mut value = Vec::with_capacity(inner.value.len() + 2);
            value.push(Fragment::text("("));
            value.extend(inner.value);
            value.push(Fragment::text(")"));
            ExprValue {
                data_type: inner.data_type,
                aggregate: inner.aggregate,
                timeframe: inner.timeframe,
                value,
            }
        }

        Expr::Minus { expr, .. } => {
            let inner = translate(expr, fs, diags);
            if !type_check("unary minus", expr.span(), &inner, NUMBER_OPERAND, diags) {
                return ExprValue::error();
            }
            let compressed = compress_expr(inner.value);
            let value = if compressed.len() > 1 {
                let mut out = Vec::with_capacity(compressed.len() + 2);
                out.push(Fragment::text("-("));
                out.extend(compressed);
                out.push(Fragment::text(")"));
                out
            } else {
                let mut out = Vec::with_capacity(compressed.len() + 1);
                out.push(Fragment::text("-"));
                out.extend(compressed);
                out
            };
            ExprValue::new(ExprType::Number, inner.aggregate, value)
        }

        Expr::Binary {
            left, op, right, ..
        } => apply(right, fs, *op, left, diags),

        Expr::Logical {
            left, op, right, ..
        } => {
            let lv = translate(left, fs, diags);
            let rv = translate(right, fs, diags);
            compose_logical(*op, (lv, left.span()), (rv, right.span()), diags)
        }

        Expr::Not { expr, .. } => {
            let inner = translate(expr, fs, diags);
            if !type_check("not", expr.span(), &inner, BOOL_OR_NULL_OPERAND, diags) {
                return ExprValue::error();
            }
            ExprValue::new(ExprType::Bool, inner.aggregate, nullsafe_not(&inner.value))
        }

        Expr::Alternation { span, .. } => {
            diags.log(*span, "Alternation tree has no value");
            ExprValue::error()
        }

        Expr::Range { span, .. } => {
            diags.log(*span, "Range has no value");
            ExprValue::error()
        }

        Expr::Case {
            whens,
            else_expr,
            span,
        } => translate_case(whens, else_expr.as_deref(), *span, fs, diags),

        Expr::Pick {
            picks,
            else_expr,
            span,
        } => {
            if expr.is_partial() {
                diags.log(*span, "Pick statement has no value");
                return ExprValue::error();
            }
            translate_pick(picks, else_expr.as_deref(), *span, fs, diags)
        }

        Expr::Cast {
            expr, target, safe, ..
        } => translate_cast(expr, *target, *safe, fs, diags),

        Expr::Filter {
            expr, conditions, ..
        } => translate_filter(expr, conditions, fs, diags),

        Expr::Aggregate {
            func,
            expr,
            source,
            span,
        } => translate_aggregate(*func, expr.as_deref(), source.as_ref(), *span, fs, diags),
    }
}

/// Ask a node for its translation, without diagnosing partial forms.
///
/// Returns `None` (denial) when the node cannot self-evaluate.
pub fn request_translation(
    expr: &Expr,
    fs: &dyn FieldSpace,
    diags: &mut Diagnostics,
) -> Option<ExprValue> {
    if expr.is_partial() {
        None
    } else {
        Some(translate(expr, fs, diags))
    }
}

/// Compose `left op rhs`, dispatching through the right-hand node.
pub fn apply(
    rhs: &Expr,
    fs: &dyn FieldSpace,
    op: BinaryOp,
    left: &Expr,
    diags: &mut Diagnostics,
) -> ExprValue {
    match rhs {
        Expr::Parens { expr, .. } => apply(expr, fs, op, left, diags),

        Expr::Alternation {
            left: branch_l,
            op: alt_op,
            right: branch_r,
            ..
        } => {
            let lv = apply(branch_l, fs, op, left, diags);
            let rv = apply(branch_r, fs, op, left, diags);
            compose_logical(
                alt_op.combiner(),
                (lv, branch_l.span()),
                (rv, branch_r.span()),
                diags,
            )
        }

        Expr::Range {
            first, last, span, ..
        } => range_apply(fs, first, last, op, left, *span, diags),

        Expr::Pick {
            picks, else_expr, ..
        } => pick_apply(fs, picks, else_expr.as_deref(), left, rhs.span(), diags),

        _ => apply_binary(fs, left, op, rhs, diags),
    }
}

fn translate_field(
    path: &FieldPath,
    span: Span,
    fs: &dyn FieldSpace,
    diags: &mut Diagnostics,
) -> ExprValue {
    let name = path.join();
    match fs.field(&name) {
        None => {
            diags.log(span, format!("Reference to undefined field '{name}'"));
            ExprValue::error()
        }
        Some(FieldEntry::Struct) => {
            diags.log(span, format!("Reference to non-atomic field '{name}'"));
            ExprValue::error()
        }
        Some(FieldEntry::Atomic(field)) => {
            let reference = Fragment::field(name);
            // Filter-bearing measures carry their filters into every use.
            let value = if field.aggregate && !field.filter_list.is_empty() {
                vec![Fragment::filter_expression(
                    vec![reference],
                    field.filter_list.clone(),
                )]
            } else {
                vec![reference]
            };
            ExprValue::new(field.data_type, field.aggregate, value)
        }
    }
}

/// Asymmetric range application: `v > first to last` means "past the
/// whole range", so the comparison lands on whichever bound makes that
/// true.
fn range_apply(
    fs: &dyn FieldSpace,
    first: &Expr,
    last: &Expr,
    op: BinaryOp,
    left: &Expr,
    range_span: Span,
    diags: &mut Diagnostics,
) -> ExprValue {
    match op {
        BinaryOp::Eq => {
            let lo = apply_binary(fs, left, BinaryOp::Gte, first, diags);
            let hi = apply_binary(fs, left, BinaryOp::Lt, last, diags);
            compose_logical(
                LogicalOp::And,
                (lo, first.span()),
                (hi, last.span()),
                diags,
            )
        }
        BinaryOp::Ne => {
            let lo = apply_binary(fs, left, BinaryOp::Lt, first, diags);
            let hi = apply_binary(fs, left, BinaryOp::Gte, last, diags);
            compose_logical(
                LogicalOp::Or,
                (lo, first.span()),
                (hi, last.span()),
                diags,
            )
        }
        BinaryOp::Gt => apply_binary(fs, left, BinaryOp::Gte, last, diags),
        BinaryOp::Gte => apply_binary(fs, left, BinaryOp::Gte, first, diags),
        BinaryOp::Lt => apply_binary(fs, left, BinaryOp::Lt, first, diags),
        BinaryOp::Lte => apply_binary(fs, left, BinaryOp::Lt, last, diags),
        _ => {
            diags.log(
                range_span,
                format!("Cannot apply '{}' to a range", op.symbol()),
            );
            ExprValue::error()
        }
    }
}

fn translate_case(
    whens: &[WhenClause],
    else_expr: Option<&Expr>,
    span: Span,
    fs: &dyn FieldSpace,
    diags: &mut Diagnostics,
) -> ExprValue {
    let mut value = vec![Fragment::text("CASE")];
    let mut aggregate = false;
    let mut failed = false;
    let mut branches: Vec<(ExprValue, Span, &'static str)> = Vec::new();

    for arm in whens {
        let cond = translate(&arm.condition, fs, diags);
        if !type_check("case", arm.condition.span(), &cond, BOOL_OPERAND, diags) {
            failed = true;
        }
        let result = translate(&arm.result, fs, diags);
        if result.is_error() {
            failed = true;
        }
        aggregate |= cond.aggregate || result.aggregate;

        value.push(Fragment::text(" WHEN "));
        value.extend(cond.value);
        value.push(Fragment::text(" THEN "));
        value.extend(result.value.clone());
        branches.push((result, arm.result.span(), "THEN"));
    }

    if let Some(else_expr) = else_expr {
        let else_value = translate(else_expr, fs, diags);
        if else_value.is_error() {
            failed = true;
        }
        aggregate |= else_value.aggregate;
        value.push(Fragment::text(" ELSE "));
        value.extend(else_value.value.clone());
        branches.push((else_value, else_expr.span(), "ELSE"));
    }
    value.push(Fragment::text(" END"));

    if failed {
        return ExprValue::error();
    }
    match branch_type("case", span, &branches, diags) {
        Some(data_type) => ExprValue::new(data_type, aggregate, value),
        None => ExprValue::error(),
    }
}

fn translate_pick(
    picks: &[PickWhen],
    else_expr: Option<&Expr>,
    span: Span,
    fs: &dyn FieldSpace,
    diags: &mut Diagnostics,
) -> ExprValue {
    let mut value = vec![Fragment::text("CASE")];
    let mut aggregate = false;
    let mut failed = false;
    let mut branches: Vec<(ExprValue, Span, &'static str)> = Vec::new();

    for arm in picks {
        let when = translate(&arm.when, fs, diags);
        if !type_check("pick", arm.when.span(), &when, BOOL_OPERAND, diags) {
            failed = true;
        }
        // Value mode is only reached when every arm carries a pick value.
        let Some(pick) = &arm.pick else {
            return ExprValue::error();
        };
        let picked = translate(pick, fs, diags);
        if picked.is_error() {
            failed = true;
        }
        aggregate |= when.aggregate || picked.aggregate;

        value.push(Fragment::text(" WHEN "));
        value.extend(when.value);
        value.push(Fragment::text(" THEN "));
        value.extend(picked.value.clone());
        branches.push((picked, pick.span(), "pick"));
    }

    // Value mode is only reached with an else present.
    let Some(else_expr) = else_expr else {
        return ExprValue::error();
    };
    let else_value = translate(else_expr, fs, diags);
    if else_value.is_error() {
        failed = true;
    }
    aggregate |= else_value.aggregate;
    value.push(Fragment::text(" ELSE "));
    value.extend(else_value.value.clone());
    branches.push((else_value, else_expr.span(), "ELSE"));
    value.push(Fragment::text(" END"));

    if failed {
        return ExprValue::error();
    }
    match branch_type("pick", span, &branches, diags) {
        Some(data_type) => ExprValue::new(data_type, aggregate, value),
        None => ExprValue::error(),
    }
}

/// Pick application: each arm's `when` is compared against the applied
/// expression, each `pick` is the then-branch (defaulting to the applied
/// expression when omitted), and a missing else defaults the same way.
fn pick_apply(
    fs: &dyn FieldSpace,
    picks: &[PickWhen],
    else_expr: Option<&Expr>,
    left: &Expr,
    span: Span,
    diags: &mut Diagnostics,
) -> ExprValue {
    let mut applied_cache: Option<ExprValue> = None;
    let mut value = vec![Fragment::text("CASE")];
    let mut aggregate = false;
    let mut failed = false;
    let mut branches: Vec<(ExprValue, Span, &'static str)> = Vec::new();

    for arm in picks {
        let cond = apply(&arm.when, fs, BinaryOp::Eq, left, diags);
        if cond.is_error() {
            failed = true;
        }
        let (picked, pick_span) = match &arm.pick {
            Some(pick) => (translate(pick, fs, diags), pick.span()),
            None => (
                applied_value(&mut applied_cache, left, fs, diags),
                left.span(),
            ),
        };
        if picked.is_error() {
            failed = true;
        }
        aggregate |= cond.aggregate || picked.aggregate;

        value.push(Fragment::text(" WHEN "));
        value.extend(cond.value);
        value.push(Fragment::text(" THEN "));
        value.extend(picked.value.clone());
        branches.push((picked, pick_span, "pick"));
    }

    let (else_value, else_span) = match else_expr {
        Some(e) => (translate(e, fs, diags), e.span()),
        None => (
            applied_value(&mut applied_cache, left, fs, diags),
            left.span(),
        ),
    };
    if else_value.is_error() {
        failed = true;
    }
    aggregate |= else_value.aggregate;
    value.push(Fragment::text(" ELSE "));
    value.extend(else_value.value.clone());
    branches.push((else_value, else_span, "ELSE"));
    value.push(Fragment::text(" END"));

    if failed {
        return ExprValue::error();
    }
    match branch_type("pick", span, &branches, diags) {
        Some(data_type) => ExprValue::new(data_type, aggregate, value),
        None => ExprValue::error(),
    }
}

fn applied_value(
    cache: &mut Option<ExprValue>,
    left: &Expr,
    fs: &dyn FieldSpace,
    diags: &mut Diagnostics,
) -> ExprValue {
    if cache.is_none() {
        *cache = Some(translate(left, fs, diags));
    }
    cache.clone().unwrap_or_else(ExprValue::error)
}

/// Infer the result type of a branching expression.
///
/// The first non-null branch decides; every other non-null branch must
/// loosely agree. All-null branches are untypable.
fn branch_type(
    element: &str,
    span: Span,
    branches: &[(ExprValue, Span, &'static str)],
    diags: &mut Diagnostics,
) -> Option<ExprType> {
    let mut result: Option<ExprType> = None;
    for (value, branch_span, label) in branches {
        if value.data_type == ExprType::Null {
            continue;
        }
        match result {
            None => result = Some(value.data_type),
            Some(expected) => {
                if value.data_type != expected {
                    diags.log(*branch_span, format!("Mismatched {label} clause types"));
                    return None;
                }
            }
        }
    }
    if result.is_none() {
        diags.log(span, format!("{element} statement type not computable"));
    }
    result
}

fn translate_cast(
    expr: &Expr,
    target: CastType,
    safe: bool,
    fs: &dyn FieldSpace,
    diags: &mut Diagnostics,
) -> ExprValue {
    let inner = translate(expr, fs, diags);
    if inner.is_error() {
        return inner;
    }

    match (inner.data_type, target) {
        (ExprType::Date, CastType::Timestamp) => {
            let mut value = Vec::with_capacity(inner.value.len() + 2);
            value.push(Fragment::text("TIMESTAMP("));
            value.extend(inner.value);
            value.push(Fragment::text(")"));
            ExprValue::new(ExprType::Timestamp, inner.aggregate, value)
        }
        (ExprType::Timestamp, CastType::Date) => {
            let mut value = Vec::with_capacity(inner.value.len() + 2);
            value.push(Fragment::text("DATE("));
            value.extend(inner.value);
            value.push(Fragment::text(")"));
            ExprValue::new(ExprType::Date, inner.aggregate, value)
                .with_timeframe(Some(strata_core::Timeframe::Day))
        }
        _ if inner.data_type == target.data_type() => inner,
        _ => {
            let cast = if safe { "SAFE_CAST(" } else { "CAST(" };
            let mut value = Vec::with_capacity(inner.value.len() + 2);
            value.push(Fragment::text(cast));
            value.extend(inner.value);
            value.push(Fragment::text(format!(" AS {})", target.sql_name())));
            ExprValue::new(target.data_type(), inner.aggregate, value)
        }
    }
}

fn translate_filter(
    expr: &Expr,
    conditions: &[Expr],
    fs: &dyn FieldSpace,
    diags: &mut Diagnostics,
) -> ExprValue {
    let inner = translate(expr, fs, diags);

    let mut filter_list = Vec::with_capacity(conditions.len());
    let mut failed = false;
    for cond in conditions {
        let cond_value = translate(cond, fs, diags);
        if cond_value.is_error() {
            failed = true;
            continue;
        }
        if cond_value.aggregate {
            diags.log(
                cond.span(),
                "Cannot filter a field with an aggregate computation",
            );
            failed = true;
            continue;
        }
        if !type_check(
            "filtered expression",
            cond.span(),
            &cond_value,
            BOOL_OPERAND,
            diags,
        ) {
            failed = true;
            continue;
        }
        filter_list.push(FilterCond {
            value: compress_expr(cond_value.value),
            aggregate: false,
        });
    }

    if inner.is_error() || failed {
        return ExprValue::error();
    }
    // A filter over a scalar restricts nothing; pass the value through.
    if !inner.aggregate {
        return inner;
    }

    ExprValue {
        data_type: inner.data_type,
        aggregate: true,
        timeframe: inner.timeframe,
        value: vec![Fragment::filter_expression(
            compress_expr(inner.value),
            filter_list,
        )],
    }
}

fn translate_aggregate(
    func: AggFunc,
    expr: Option<&Expr>,
    source: Option<&FieldPath>,
    span: Span,
    fs: &dyn FieldSpace,
    diags: &mut Diagnostics,
) -> ExprValue {
    let mut struct_path: Option<String> = None;
    let mut source_value: Option<ExprValue> = None;

    if let Some(source) = source {
        let name = source.join();
        match fs.field(&name) {
            None => {
                diags.log(span, format!("Reference to undefined field '{name}'"));
                return ExprValue::error();
            }
            Some(FieldEntry::Struct) => {
                diags.log(
                    span,
                    format!("Aggregate source '{name}' is not an atomic field"),
                );
                return ExprValue::error();
            }
            Some(FieldEntry::Atomic(field)) => {
                struct_path = source.prefix().map(|prefix| prefix.join());
                if expr.is_none() && func.requires_expression() {
                    source_value = Some(ExprValue::new(
                        field.data_type,
                        field.aggregate,
                        vec![Fragment::field(name)],
                    ));
                }
            }
        }
    }

    let operand: Option<(ExprValue, Span)> = match expr {
        Some(e) => Some((translate(e, fs, diags), e.span())),
        None => source_value.map(|value| (value, span)),
    };

    if !func.requires_expression() {
        // count: the legal-child set is empty, so any operand is a mistake.
        if let Some((value, operand_span)) = operand {
            type_check(
                func.name(),
                operand_span,
                &value,
                func.legal_child_types(),
                diags,
            );
            return ExprValue::error();
        }
        return ExprValue::new(
            func.returns(None),
            true,
            vec![Fragment::aggregate(func.name(), Vec::new(), struct_path)],
        );
    }

    let Some((value, operand_span)) = operand else {
        diags.log(span, "Missing expression for aggregate function");
        return ExprValue::error();
    };
    if !type_check(
        func.name(),
        operand_span,
        &value,
        func.legal_child_types(),
        diags,
    ) {
        return ExprValue::error();
    }

    ExprValue::new(
        func.returns(Some(value.data_type)),
        true,
        vec![Fragment::aggregate(
            func.name(),
            compress_expr(value.value),
            struct_path,
        )],
    )
}

/// Quote a literal for SQL, doubling embedded single quotes.
fn sql_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}
