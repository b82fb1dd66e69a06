use serde::{Deserialize, Serialize};

use crate::ast::{BinaryOp, ColumnType, Value};

/// A general expression node.
///
/// Sources are referenced by position (`0` is the primary source, joins
/// follow in order), never by alias; aliases are assigned by the compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// A column of a source (`m0."x"`)
    Field { source: usize, column: String },
    /// Every field of a source's schema
    Row(usize),
    /// An inline literal
    Literal(Value),
    /// A value bound as a positional placeholder
    Param(Value),
    /// Binary operator application
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Boolean negation
    Not(Box<Expr>),
    /// `expr IS NULL`
    IsNull(Box<Expr>),
    /// Type cast
    Cast { expr: Box<Expr>, target: ColumnType },
    /// Membership test
    In { left: Box<Expr>, right: InList },
    /// Raw SQL with spliced sub-expressions
    Fragment(Fragment),
    /// Function call; `distinct` renders `name(DISTINCT args)`
    Function {
        name: String,
        args: Vec<Expr>,
        #[serde(default)]
        distinct: bool,
    },
}

/// Right-hand side of an `IN` test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InList {
    /// Each element compiled on its own; literals and params may mix.
    Exprs(Vec<Expr>),
    /// A bound list, one placeholder per element.
    Params(Vec<Value>),
    /// A raw fragment, typically a subquery.
    Fragment(Fragment),
}

/// Raw SQL fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fragment {
    /// Template with `?` splice points consumed in order by `args`.
    /// A literal question mark is written `\?`.
    Template { sql: String, args: Vec<Expr> },
    /// Keyword-style arguments. SQLite has no rendering for these.
    Keyword(Vec<(String, Expr)>),
}

impl Fragment {
    pub fn new(sql: impl Into<String>, args: Vec<Expr>) -> Self {
        Fragment::Template {
            sql: sql.into(),
            args,
        }
    }

    /// A fragment without splices.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }
}
