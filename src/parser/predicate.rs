use std::fmt;

use ordered_float::NotNan;
use sqlparser::ast::{BinaryOperator, Expr, Ident, Value};

use crate::having::{format_threshold, HavingCondition};

/// HAVING predicate built by the inserter before it is lowered into the
/// parser's own expression tree.
#[derive(Clone, PartialEq)]
pub enum Predicate {
    BinaryExpr {
        operator: BinaryOperator,
        left: Box<Predicate>,
        right: Box<Predicate>,
        parenthesized: bool,
    },
    ColumnRef { table: Option<String>, column: String },
    NumberLiteral { value: NotNan<f64> },
    /// An expression taken as-is from a parsed query.
    Parsed(Expr),
}

impl Predicate {
    /// Turns a parsed column expression into a column reference when it is
    /// one; anything else (`count(*)`, `a.b.c`) is kept as parsed.
    pub fn column(expr: Expr) -> Self {
        match expr {
            Expr::Identifier(ident) => Predicate::ColumnRef { table: None, column: ident.value },
            Expr::CompoundIdentifier(mut idents) if idents.len() == 2 => {
                let column = idents.pop().map(|ident| ident.value).unwrap_or_default();
                let table = idents.pop().map(|ident| ident.value);
                Predicate::ColumnRef { table, column }
            },
            expr => Predicate::Parsed(expr),
        }
    }

    /// `column <op> threshold` for a validated condition.
    pub fn comparison(column: Predicate, condition: &HavingCondition) -> Self {
        Predicate::BinaryExpr {
            operator: condition.operator().to_binary_operator(),
            left: Box::new(column),
            right: Box::new(Predicate::NumberLiteral { value: condition.threshold_value() }),
            parenthesized: false,
        }
    }

    /// `(existing) AND addition`. The existing side is always parenthesized
    /// so an OR chain keeps its grouping.
    pub fn conjunction(existing: Expr, addition: Predicate) -> Self {
        Predicate::BinaryExpr {
            operator: BinaryOperator::And,
            left: Box::new(Predicate::Parsed(existing).parenthesize()),
            right: Box::new(addition),
            parenthesized: false,
        }
    }

    pub fn parenthesize(self) -> Self {
        match self {
            Predicate::BinaryExpr { operator, left, right, .. } => Predicate::BinaryExpr {
                operator,
                left,
                right,
                parenthesized: true,
            },
            Predicate::Parsed(Expr::Nested(expr)) => Predicate::Parsed(Expr::Nested(expr)),
            Predicate::Parsed(expr) => Predicate::Parsed(Expr::Nested(Box::new(expr))),
            other => other,
        }
    }

    pub fn into_expr(self) -> Expr {
        match self {
            Predicate::BinaryExpr { operator, left, right, parenthesized } => {
                let expr = Expr::BinaryOp {
                    left: Box::new(left.into_expr()),
                    op: operator,
                    right: Box::new(right.into_expr()),
                };
                if parenthesized {
                    Expr::Nested(Box::new(expr))
                } else {
                    expr
                }
            },
            Predicate::ColumnRef { table: Some(table), column } => {
                Expr::CompoundIdentifier(vec![Ident::new(table), Ident::new(column)])
            },
            Predicate::ColumnRef { table: None, column } => Expr::Identifier(Ident::new(column)),
            Predicate::NumberLiteral { value } => {
                Expr::Value(Value::Number(format_threshold(value.into_inner()), false))
            },
            Predicate::Parsed(expr) => expr,
        }
    }
}

impl From<Predicate> for Expr {
    fn from(predicate: Predicate) -> Self {
        predicate.into_expr()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clone().into_expr())
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::BinaryExpr { .. } => write!(f, "BinaryExpr({})", self),
            Predicate::ColumnRef { .. } => write!(f, "ColumnRef({})", self),
            Predicate::NumberLiteral { .. } => write!(f, "NumberLiteral({})", self),
            Predicate::Parsed(_) => write!(f, "Parsed({})", self),
        }
    }
}
