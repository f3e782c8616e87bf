//! The expression tree.
//!
//! One enum variant per syntactic form of the source language. Nodes own
//! their children and are immutable after construction; every node carries
//! the source span diagnostics are attached to. Behaviour that varies per
//! form (value translation, partial-expression application, aggregate
//! locality) lives in the `translate` module as match arms over this enum.

use serde::{Deserialize, Serialize};

use strata_core::{ExprType, FieldPath, Span, Timeframe};

use super::{AggFunc, AltOp, BinaryOp, LogicalOp};

/// Kind of a time literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeKind {
    /// Calendar date literal.
    Date,
    /// Timestamp literal.
    Timestamp,
}

impl TimeKind {
    /// The expression type a literal of this kind carries.
    pub const fn data_type(&self) -> ExprType {
        match self {
            Self::Date => ExprType::Date,
            Self::Timestamp => ExprType::Timestamp,
        }
    }

    /// The SQL literal keyword for this kind.
    pub const fn sql_prefix(&self) -> &'static str {
        match self {
            Self::Date => "DATE",
            Self::Timestamp => "TIMESTAMP",
        }
    }
}

/// Target type of a cast expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastType {
    /// Cast to string.
    String,
    /// Cast to number.
    Number,
    /// Cast to boolean.
    Boolean,
    /// Cast to date.
    Date,
    /// Cast to timestamp.
    Timestamp,
}

impl CastType {
    /// The expression type a successful cast produces.
    pub const fn data_type(&self) -> ExprType {
        match self {
            Self::String => ExprType::String,
            Self::Number => ExprType::Number,
            Self::Boolean => ExprType::Bool,
            Self::Date => ExprType::Date,
            Self::Timestamp => ExprType::Timestamp,
        }
    }

    /// The SQL type name emitted inside `CAST(... AS ...)`.
    pub const fn sql_name(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Number => "FLOAT64",
            Self::Boolean => "BOOLEAN",
            Self::Date => "DATE",
            Self::Timestamp => "TIMESTAMP",
        }
    }
}

/// One `WHEN condition THEN result` arm of a case expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhenClause {
    /// Boolean condition.
    pub condition: Expr,
    /// Result when the condition holds.
    pub result: Expr,
    /// Source location of the arm.
    pub span: Span,
}

impl WhenClause {
    /// Create a new case arm.
    pub fn new(condition: Expr, result: Expr) -> Self {
        Self {
            condition,
            result,
            span: Span::default(),
        }
    }
}

/// One `pick value when condition` arm of a pick expression.
///
/// Both parts are optional in the surface language: a missing `pick`
/// defaults to the applied expression, and the `when` may be a partial
/// (range, alternation) compared against the applied expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickWhen {
    /// Value chosen when the arm matches; defaults to the applied value.
    pub pick: Option<Expr>,
    /// The arm's match expression.
    pub when: Expr,
    /// Source location of the arm.
    pub span: Span,
}

impl PickWhen {
    /// Create a new pick arm.
    pub fn new(pick: Option<Expr>, when: Expr) -> Self {
        Self {
            pick,
            when,
            span: Span::default(),
        }
    }
}

/// An expression node.
///
/// Value-bearing forms translate to a typed fragment sequence; partial
/// forms (ranges, alternation trees, picks without an else) carry no value
/// of their own and only combine with an apply operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// String literal; the raw text, quoted at emission time.
    StringLiteral { value: String, span: Span },
    /// Numeric literal, emitted verbatim.
    NumberLiteral { value: String, span: Span },
    /// Regular-expression literal; the raw pattern.
    RegexLiteral { value: String, span: Span },
    /// Date or timestamp literal, optionally granular.
    TimeLiteral {
        kind: TimeKind,
        value: String,
        timeframe: Option<Timeframe>,
        span: Span,
    },
    /// Boolean literal.
    BooleanLiteral { value: bool, span: Span },
    /// The null literal.
    NullLiteral { span: Span },

    /// Reference to a field in the enclosing `FieldSpace`.
    Field { path: FieldPath, span: Span },

    /// Parenthesized expression; transparent to apply and translation
    /// requests.
    Parens { expr: Box<Expr>, span: Span },

    /// Unary numeric negation.
    Minus { expr: Box<Expr>, span: Span },

    /// Binary operation dispatched through the right-hand node, so that
    /// partial right-hand sides (ranges, alternations, picks) can take
    /// over the application.
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
        span: Span,
    },

    /// Boolean conjunction or disjunction; composes directly.
    Logical {
        left: Box<Expr>,
        op: LogicalOp,
        right: Box<Expr>,
        span: Span,
    },

    /// Null-safe boolean negation.
    Not { expr: Box<Expr>, span: Span },

    /// Alternation tree; a partial combining branches with `|` or `&`.
    Alternation {
        left: Box<Expr>,
        op: AltOp,
        right: Box<Expr>,
        span: Span,
    },

    /// Half-open range `first to last`; a partial.
    Range {
        first: Box<Expr>,
        last: Box<Expr>,
        span: Span,
    },

    /// SQL case expression.
    Case {
        whens: Vec<WhenClause>,
        else_expr: Option<Box<Expr>>,
        span: Span,
    },

    /// Pick expression; value-bearing only when it has an else and every
    /// arm's `when` is itself value-bearing.
    Pick {
        picks: Vec<PickWhen>,
        else_expr: Option<Box<Expr>>,
        span: Span,
    },

    /// Cast to another type, optionally null-on-failure (`safe_cast`).
    Cast {
        expr: Box<Expr>,
        target: CastType,
        safe: bool,
        span: Span,
    },

    /// Expression evaluated under filter conditions.
    Filter {
        expr: Box<Expr>,
        conditions: Vec<Expr>,
        span: Span,
    },

    /// Aggregate function call, possibly local to a named source field.
    Aggregate {
        func: AggFunc,
        expr: Option<Box<Expr>>,
        source: Option<FieldPath>,
        span: Span,
    },
}

impl Expr {
    // ========== Constructors ==========

    /// Create a string literal.
    pub fn string(value: impl Into<String>) -> Self {
        Self::StringLiteral {
            value: value.into(),
            span: Span::default(),
        }
    }

    /// Create a numeric literal.
    pub fn number(value: impl Into<String>) -> Self {
        Self::NumberLiteral {
            value: value.into(),
            span: Span::default(),
        }
    }

    /// Create a regular-expression literal.
    pub fn regex(value: impl Into<String>) -> Self {
        Self::RegexLiteral {
            value: value.into(),
            span: Span::default(),
        }
    }

    /// Create a time literal.
    pub fn time(kind: TimeKind, value: impl Into<String>) -> Self {
        Self::TimeLiteral {
            kind,
            value: value.into(),
            timeframe: None,
            span: Span::default(),
        }
    }

    /// Create a granular time literal.
    pub fn granular_time(
        kind: TimeKind,
        value: impl Into<String>,
        timeframe: Timeframe,
    ) -> Self {
        Self::TimeLiteral {
            kind,
            value: value.into(),
            timeframe: Some(timeframe),
            span: Span::default(),
        }
    }

    /// Create a boolean literal.
    pub fn boolean(value: bool) -> Self {
        Self::BooleanLiteral {
            value,
            span: Span::default(),
        }
    }

    /// Create the null literal.
    pub fn null() -> Self {
        Self::NullLiteral {
            span: Span::default(),
        }
    }

    /// Create a field reference.
    pub fn field(path: impl Into<FieldPath>) -> Self {
        Self::Field {
            path: path.into(),
            span: Span::default(),
        }
    }

    /// Parenthesize an expression.
    pub fn parens(expr: Expr) -> Self {
        Self::Parens {
            expr: Box::new(expr),
            span: Span::default(),
        }
    }

    /// Negate a numeric expression.
    pub fn negate(expr: Expr) -> Self {
        Self::Minus {
            expr: Box::new(expr),
            span: Span::default(),
        }
    }

    /// Create a binary expression.
    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Self::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
            span: Span::default(),
        }
    }

    /// Create a boolean combinator expression.
    pub fn logical(left: Expr, op: LogicalOp, right: Expr) -> Self {
        Self::Logical {
            left: Box::new(left),
            op,
            right: Box::new(right),
            span: Span::default(),
        }
    }

    /// Create an alternation tree.
    pub fn alternation(left: Expr, op: AltOp, right: Expr) -> Self {
        Self::Alternation {
            left: Box::new(left),
            op,
            right: Box::new(right),
            span: Span::default(),
        }
    }

    /// Create a range partial.
    pub fn range(first: Expr, last: Expr) -> Self {
        Self::Range {
            first: Box::new(first),
            last: Box::new(last),
            span: Span::default(),
        }
    }

    /// Create a case expression.
    pub fn case(whens: Vec<WhenClause>, else_expr: Option<Expr>) -> Self {
        Self::Case {
            whens,
            else_expr: else_expr.map(Box::new),
            span: Span::default(),
        }
    }

    /// Create a pick expression.
    pub fn pick(picks: Vec<PickWhen>, else_expr: Option<Expr>) -> Self {
        Self::Pick {
            picks,
            else_expr: else_expr.map(Box::new),
            span: Span::default(),
        }
    }

    /// Create a cast expression.
    pub fn cast(expr: Expr, target: CastType) -> Self {
        Self::Cast {
            expr: Box::new(expr),
            target,
            safe: false,
            span: Span::default(),
        }
    }

    /// Create a null-on-failure cast expression.
    pub fn safe_cast(expr: Expr, target: CastType) -> Self {
        Self::Cast {
            expr: Box::new(expr),
            target,
            safe: true,
            span: Span::default(),
        }
    }

    /// Create a filtered expression.
    pub fn filtered(expr: Expr, conditions: Vec<Expr>) -> Self {
        Self::Filter {
            expr: Box::new(expr),
            conditions,
            span: Span::default(),
        }
    }

    /// Create an aggregate function call.
    pub fn aggregate(func: AggFunc, expr: Option<Expr>, source: Option<FieldPath>) -> Self {
        Self::Aggregate {
            func,
            expr: expr.map(Box::new),
            source,
            span: Span::default(),
        }
    }

    /// Attach a source span.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        *self.span_mut() = span;
        self
    }

    // ========== Convenience builders ==========

    /// Addition.
    #[must_use]
    pub fn add(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Add, other)
    }

    /// Subtraction.
    #[must_use]
    pub fn sub(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Sub, other)
    }

    /// Multiplication.
    #[must_use]
    pub fn mul(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Mul, other)
    }

    /// Division.
    #[must_use]
    pub fn div(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Div, other)
    }

    /// Equality comparison.
    #[must_use]
    pub fn eq(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Eq, other)
    }

    /// Inequality comparison.
    #[must_use]
    pub fn ne(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Ne, other)
    }

    /// Less-than comparison.
    #[must_use]
    pub fn lt(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Lt, other)
    }

    /// Less-than-or-equal comparison.
    #[must_use]
    pub fn lte(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Lte, other)
    }

    /// Greater-than comparison.
    #[must_use]
    pub fn gt(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Gt, other)
    }

    /// Greater-than-or-equal comparison.
    #[must_use]
    pub fn gte(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Gte, other)
    }

    /// Pattern match (`~`).
    #[must_use]
    pub fn matches(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Match, other)
    }

    /// Negated pattern match (`!~`).
    #[must_use]
    pub fn not_matches(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::NotMatch, other)
    }

    /// Logical conjunction.
    #[must_use]
    pub fn and(self, other: Expr) -> Self {
        Self::logical(self, LogicalOp::And, other)
    }

    /// Logical disjunction.
    #[must_use]
    pub fn or(self, other: Expr) -> Self {
        Self::logical(self, LogicalOp::Or, other)
    }

    /// Null-safe negation.
    #[must_use]
    pub fn not(self) -> Self {
        Self::Not {
            expr: Box::new(self),
            span: Span::default(),
        }
    }

    /// Half-open range `self to last`.
    #[must_use]
    pub fn to(self, last: Expr) -> Self {
        Self::range(self, last)
    }

    // ========== Accessors ==========

    /// The node's source span.
    pub fn span(&self) -> Span {
        match self {
            Self::StringLiteral { span, .. }
            | Self::NumberLiteral { span, .. }
            | Self::RegexLiteral { span, .. }
            | Self::TimeLiteral { span, .. }
            | Self::BooleanLiteral { span, .. }
            | Self::NullLiteral { span }
            | Self::Field { span, .. }
            | Self::Parens { span, .. }
            | Self::Minus { span, .. }
            | Self::Binary { span, .. }
            | Self::Logical { span, .. }
            | Self::Not { span, .. }
            | Self::Alternation { span, .. }
            | Self::Range { span, .. }
            | Self::Case { span, .. }
            | Self::Pick { span, .. }
            | Self::Cast { span, .. }
            | Self::Filter { span, .. }
            | Self::Aggregate { span, .. } => *span,
        }
    }

    fn span_mut(&mut self) -> &mut Span {
        match self {
            Self::StringLiteral { span, .. }
            | Self::NumberLiteral { span, .. }
            | Self::RegexLiteral { span, .. }
            | Self::TimeLiteral { span, .. }
            | Self::BooleanLiteral { span, .. }
            | Self::NullLiteral { span }
            | Self::Field { span, .. }
            | Self::Parens { span, .. }
            | Self::Minus { span, .. }
            | Self::Binary { span, .. }
            | Self::Logical { span, .. }
            | Self::Not { span, .. }
            | Self::Alternation { span, .. }
            | Self::Range { span, .. }
            | Self::Case { span, .. }
            | Self::Pick { span, .. }
            | Self::Cast { span, .. }
            | Self::Filter { span, .. }
            | Self::Aggregate { span, .. } => span,
        }
    }

    /// Human-readable tag for this node form, used in diagnostics.
    pub fn element_type(&self) -> &'static str {
        match self {
            Self::StringLiteral { .. } => "string literal",
            Self::NumberLiteral { .. } => "numeric literal",
            Self::RegexLiteral { .. } => "regular expression literal",
            Self::TimeLiteral { .. } => "time literal",
            Self::BooleanLiteral { .. } => "boolean literal",
            Self::NullLiteral { .. } => "null",
            Self::Field { .. } => "field reference",
            Self::Parens { .. } => "(expression)",
            Self::Minus { .. } => "unary minus",
            Self::Binary { op, .. } => op.symbol(),
            Self::Logical { op, .. } => op.sql(),
            Self::Not { .. } => "not",
            Self::Alternation { .. } => "alternation",
            Self::Range { .. } => "range",
            Self::Case { .. } => "case",
            Self::Pick { .. } => "pick",
            Self::Cast { .. } => "cast",
            Self::Filter { .. } => "filtered expression",
            Self::Aggregate { func, .. } => func.name(),
        }
    }

    /// Check whether this node is a partial expression: one that carries
    /// no value of its own and only combines with an apply operator.
    pub fn is_partial(&self) -> bool {
        match self {
            Self::Alternation { .. } | Self::Range { .. } => true,
            Self::Parens { expr, .. } => expr.is_partial(),
            Self::Pick {
                picks, else_expr, ..
            } => {
                else_expr.is_none()
                    || picks
                        .iter()
                        .any(|arm| arm.pick.is_none() || arm.when.is_partial())
            }
            _ => false,
        }
    }

    /// Default output-field name for asymmetric aggregates (`sum`, `avg`)
    /// computed against a named source with no explicit expression.
    pub fn default_field_name(&self) -> Option<String> {
        match self {
            Self::Aggregate {
                func,
                expr: None,
                source: Some(source),
                ..
            } => func
                .default_name_prefix()
                .map(|prefix| format!("{prefix}{}", source.leaf())),
            _ => None,
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StringLiteral { value, .. } => write!(f, "'{value}'"),
            Self::NumberLiteral { value, .. } => write!(f, "{value}"),
            Self::RegexLiteral { value, .. } => write!(f, "r'{value}'"),
            Self::TimeLiteral { value, .. } => write!(f, "@{value}"),
            Self::BooleanLiteral { value, .. } => write!(f, "{value}"),
            Self::NullLiteral { .. } => write!(f, "null"),
            Self::Field { path, .. } => write!(f, "{path}"),
            Self::Parens { expr, .. } => write!(f, "({expr})"),
            Self::Minus { expr, .. } => write!(f, "-{expr}"),
            Self::Binary {
                left, op, right, ..
            } => write!(f, "{left} {op} {right}"),
            Self::Logical {
                left, op, right, ..
            } => write!(f, "{left} {op} {right}"),
            Self::Not { expr, .. } => write!(f, "not {expr}"),
            Self::Alternation {
                left, op, right, ..
            } => write!(f, "{left} {op} {right}"),
            Self::Range { first, last, .. } => write!(f, "{first} to {last}"),
            Self::Case {
                whens, else_expr, ..
            } => {
                write!(f, "case")?;
                for arm in whens {
                    write!(f, " when {} then {}", arm.condition, arm.result)?;
                }
                if let Some(e) = else_expr {
                    write!(f, " else {e}")?;
                }
                write!(f, " end")
            }
            Self::Pick {
                picks, else_expr, ..
            } => {
                for arm in picks {
                    match &arm.pick {
                        Some(value) => write!(f, "pick {value} when {} ", arm.when)?,
                        None => write!(f, "pick when {} ", arm.when)?,
                    }
                }
                match else_expr {
                    Some(e) => write!(f, "else {e}"),
                    None => Ok(()),
                }
            }
            Self::Cast {
                expr, target, safe, ..
            } => {
                let op = if *safe { ":::" } else { "::" };
                write!(f, "{expr}{op}{}", target.sql_name())
            }
            Self::Filter {
                expr, conditions, ..
            } => {
                write!(f, "{expr} {{ where")?;
                for (i, cond) in conditions.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {cond}")?;
                }
                write!(f, " }}")
            }
            Self::Aggregate {
                func, expr, source, ..
            } => {
                if let Some(source) = source {
                    write!(f, "{source}.")?;
                }
                match expr {
                    Some(e) => write!(f, "{func}({e})"),
                    None => write!(f, "{func}()"),
                }
            }
        }
    }
}
