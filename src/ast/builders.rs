//! Ergonomic builder functions for expression trees.
//!
//! # Example
//! ```
//! use qail_sqlite::ast::builders::*;
//! use qail_sqlite::ast::{Query, SortOrder};
//!
//! let query = Query::table("posts")
//!     .select([field(0, "id"), field(0, "title")])
//!     .filter(eq(field(0, "published"), lit(true)))
//!     .order_by(field(0, "inserted_at"), SortOrder::Desc)
//!     .limit(lit(10));
//! assert_eq!(query.wheres.len(), 1);
//! ```

use crate::ast::{BinaryOp, ColumnType, Expr, Fragment, InList, Value};

/// Column `column` of the source at position `source`.
pub fn field(source: usize, column: impl Into<String>) -> Expr {
    Expr::Field {
        source,
        column: column.into(),
    }
}

/// Every field of a source.
pub fn row(source: usize) -> Expr {
    Expr::Row(source)
}

/// Inline literal.
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}

/// Bound parameter.
pub fn param(value: impl Into<Value>) -> Expr {
    Expr::Param(value.into())
}

pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn eq(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Eq, left, right)
}

pub fn ne(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Ne, left, right)
}

pub fn lt(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Lt, left, right)
}

pub fn lte(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Lte, left, right)
}

pub fn gt(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Gt, left, right)
}

pub fn gte(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Gte, left, right)
}

pub fn like(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Like, left, right)
}

pub fn and(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::And, left, right)
}

pub fn or(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Or, left, right)
}

pub fn not(expr: Expr) -> Expr {
    Expr::Not(Box::new(expr))
}

pub fn is_nil(expr: Expr) -> Expr {
    Expr::IsNull(Box::new(expr))
}

pub fn cast(expr: Expr, target: ColumnType) -> Expr {
    Expr::Cast {
        expr: Box::new(expr),
        target,
    }
}

/// `left IN (e1, e2, ...)`
pub fn in_list<I>(left: Expr, items: I) -> Expr
where
    I: IntoIterator<Item = Expr>,
{
    Expr::In {
        left: Box::new(left),
        right: InList::Exprs(items.into_iter().collect()),
    }
}

/// `left IN (?n, ?n+1, ...)`, one placeholder per value.
pub fn in_params<I, V>(left: Expr, values: I) -> Expr
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Expr::In {
        left: Box::new(left),
        right: InList::Params(values.into_iter().map(Into::into).collect()),
    }
}

/// `left IN (<fragment>)`
pub fn in_fragment(left: Expr, fragment: Fragment) -> Expr {
    Expr::In {
        left: Box::new(left),
        right: InList::Fragment(fragment),
    }
}

/// Raw SQL with `?` splice points.
pub fn fragment(sql: impl Into<String>, args: Vec<Expr>) -> Expr {
    Expr::Fragment(Fragment::new(sql, args))
}

/// Function call.
pub fn func(name: impl Into<String>, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
        distinct: false,
    }
}

/// `count(expr)`, or `count(*)` when `expr` is `None`.
pub fn count(expr: Option<Expr>) -> Expr {
    func("count", expr.into_iter().collect())
}

/// `count(DISTINCT expr)`
pub fn count_distinct(expr: Expr) -> Expr {
    Expr::Function {
        name: "count".to_string(),
        args: vec![expr],
        distinct: true,
    }
}
