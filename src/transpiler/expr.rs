//! Expression compiler.
//!
//! Parameter numbering is carried by an explicit [`ParamContext`] that the
//! caller threads through every clause of a statement, so placeholders are
//! numbered by order of appearance across the whole statement.

use crate::ast::*;
use crate::error::{QailError, QailResult};
use crate::transpiler::sources::SourceRef;
use crate::transpiler::sql::sqlite::cast_type;
use crate::transpiler::traits::SqlGenerator;

/// Context for parameterized query building.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamContext {
    /// Last placeholder index handed out (1-based placeholders).
    pub index: usize,
    /// Collected parameter values in order
    pub params: Vec<Value>,
}

impl ParamContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value and return the placeholder for it.
    pub fn add_param(&mut self, value: Value, generator: &dyn SqlGenerator) -> String {
        self.index += 1;
        self.params.push(value);
        generator.placeholder(self.index)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Everything an expression needs besides itself: the renderer and the
/// resolved sources of the enclosing statement.
pub struct ExprContext<'a> {
    pub generator: &'a dyn SqlGenerator,
    pub sources: &'a [SourceRef<'a>],
}

impl<'a> ExprContext<'a> {
    pub fn new(generator: &'a dyn SqlGenerator, sources: &'a [SourceRef<'a>]) -> Self {
        Self { generator, sources }
    }

    /// Compile `expr`, appending any bound values to `params`.
    pub fn compile(&self, expr: &Expr, params: &mut ParamContext) -> QailResult<String> {
        match expr {
            Expr::Field { source, column } => {
                let src = self.source(*source)?;
                Ok(format!("{}.{}", src.alias, self.generator.quote_identifier(column)))
            }
            Expr::Row(source) => self.row(*source),
            Expr::Literal(value) => Ok(self.generator.render_literal(value)),
            Expr::Param(value) => Ok(params.add_param(value.clone(), self.generator)),
            Expr::Binary { op, left, right } => {
                let left = self.operand(left, params)?;
                let right = self.operand(right, params)?;
                Ok(format!("{} {} {}", left, op.as_sql(), right))
            }
            Expr::Not(inner) => Ok(format!("NOT ({})", self.compile(inner, params)?)),
            Expr::IsNull(inner) => Ok(format!("{} IS NULL", self.operand(inner, params)?)),
            Expr::Cast { expr, target } => {
                if target.is_array() {
                    return Err(QailError::unsupported(
                        "Array type is not supported by SQLite",
                    ));
                }
                let inner = self.compile(expr, params)?;
                Ok(format!("CAST ({} AS {})", inner, cast_type(target)?))
            }
            Expr::In { left, right } => {
                let left = self.operand(left, params)?;
                let items = match right {
                    InList::Exprs(items) => self.compile_list(items, params)?,
                    InList::Params(values) => values
                        .iter()
                        .map(|v| params.add_param(v.clone(), self.generator))
                        .collect::<Vec<_>>()
                        .join(", "),
                    InList::Fragment(fragment) => self.fragment(fragment, params)?,
                };
                Ok(format!("{} IN ({})", left, items))
            }
            Expr::Fragment(fragment) => self.fragment(fragment, params),
            Expr::Function {
                name,
                args,
                distinct,
            } => {
                let args = if args.is_empty() && name.eq_ignore_ascii_case("count") {
                    "*".to_string()
                } else {
                    self.compile_list(args, params)?
                };
                let distinct = if *distinct { "DISTINCT " } else { "" };
                Ok(format!("{}({}{})", name, distinct, args))
            }
        }
    }

    /// Compile an operand of an operator. Anything that is not a single
    /// term is parenthesized so the operator keeps its meaning.
    pub fn operand(&self, expr: &Expr, params: &mut ParamContext) -> QailResult<String> {
        let sql = self.compile(expr, params)?;
        if matches!(
            expr,
            Expr::Binary { .. }
                | Expr::Fragment(_)
                | Expr::In { .. }
                | Expr::IsNull(_)
                | Expr::Not(_)
        ) {
            Ok(format!("({})", sql))
        } else {
            Ok(sql)
        }
    }

    /// Compile each expression and join with `", "`.
    pub fn compile_list(&self, exprs: &[Expr], params: &mut ParamContext) -> QailResult<String> {
        let parts = exprs
            .iter()
            .map(|e| self.compile(e, params))
            .collect::<QailResult<Vec<_>>>()?;
        Ok(parts.join(", "))
    }

    /// Expand a fragment template, compiling each splice in order.
    pub fn fragment(&self, fragment: &Fragment, params: &mut ParamContext) -> QailResult<String> {
        let (sql, args) = match fragment {
            Fragment::Template { sql, args } => (sql, args),
            Fragment::Keyword(_) => {
                return Err(QailError::unsupported(
                    "keyword lists in fragments are not supported by SQLite",
                ));
            }
        };

        let mut out = String::with_capacity(sql.len());
        let mut args = args.iter();
        let mut chars = sql.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' if chars.peek() == Some(&'?') => {
                    chars.next();
                    out.push('?');
                }
                '?' => {
                    let arg = args.next().ok_or_else(|| {
                        QailError::invalid(format!(
                            "fragment `{}` has more splice points than arguments",
                            sql
                        ))
                    })?;
                    out.push_str(&self.compile(arg, params)?);
                }
                c => out.push(c),
            }
        }
        if args.next().is_some() {
            return Err(QailError::invalid(format!(
                "fragment `{}` has more arguments than splice points",
                sql
            )));
        }
        Ok(out)
    }

    pub fn source(&self, index: usize) -> QailResult<&SourceRef<'a>> {
        self.sources.get(index).ok_or_else(|| {
            QailError::invalid(format!(
                "reference to source {} but the statement has {}",
                index,
                self.sources.len()
            ))
        })
    }

    /// Every field of a schema-backed source.
    fn row(&self, index: usize) -> QailResult<String> {
        let src = self.source(index)?;
        match src.source {
            Source::Table {
                fields: Some(fields),
                ..
            } => Ok(fields
                .iter()
                .map(|f| format!("{}.{}", src.alias, self.generator.quote_identifier(f)))
                .collect::<Vec<_>>()
                .join(", ")),
            _ => Err(QailError::SchemaRequired {
                table: src.table.clone().unwrap_or_else(|| src.alias.clone()),
            }),
        }
    }
}
