//! SELECT SQL generation.

use tracing::{debug, trace};

use crate::ast::*;
use crate::error::{QailError, QailResult};
use crate::transpiler::CompiledSql;
use crate::transpiler::dml::filters_sql;
use crate::transpiler::expr::{ExprContext, ParamContext};
use crate::transpiler::sources::{AliasMode, SourceRef, create_names};
use crate::transpiler::sql::sqlite::SqliteGenerator;
use crate::transpiler::traits::SqlGenerator;

/// Generate a SELECT statement.
///
/// Clauses are emitted in the order
/// `SELECT [DISTINCT] .. FROM .. [JOIN ..] [WHERE] [GROUP BY] [HAVING] [ORDER BY] [LIMIT] [OFFSET]`
/// and placeholders are numbered in that same order.
pub fn build_select(query: &Query) -> QailResult<CompiledSql> {
    let generator = SqliteGenerator;
    let mut params = ParamContext::new();
    let sql = select_sql(query, &generator, &mut params).inspect_err(|e| {
        debug!(error = %e, "SELECT compilation failed");
    })?;
    debug!(sources = query.source_count(), params = params.len(), "compiled SELECT");
    trace!(sql = %sql, "generated SQL");
    Ok(CompiledSql::with_params(sql, params))
}

pub(crate) fn select_sql(
    query: &Query,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> QailResult<String> {
    if query.lock.is_some() {
        return Err(QailError::unsupported("locks are not supported by SQLite"));
    }
    let distinct = distinct_sql(query.distinct.as_ref())?;

    let sources = create_names(query, generator, AliasMode::Select);
    let ctx = ExprContext::new(generator, &sources);

    let mut sql = String::from("SELECT ");
    sql.push_str(distinct);

    // Columns
    match &query.select {
        None => sql.push_str(&ctx.compile(&Expr::Row(0), params)?),
        Some(exprs) if exprs.is_empty() => {
            return Err(QailError::invalid("SELECT needs at least one expression"));
        }
        Some(exprs) => sql.push_str(&ctx.compile_list(exprs, params)?),
    }

    // FROM
    sql.push_str(" FROM ");
    sql.push_str(&source_sql(&ctx, &sources[0], params)?);

    // JOINS
    for (i, join) in query.joins.iter().enumerate() {
        sql.push_str(&join_sql(&ctx, join, i + 1, params)?);
    }

    sql.push_str(&filters_sql("WHERE", &query.wheres, &ctx, params)?);

    if !query.group_by.is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&ctx.compile_list(&query.group_by, params)?);
    }

    sql.push_str(&filters_sql("HAVING", &query.havings, &ctx, params)?);

    if !query.order_by.is_empty() {
        let parts = query
            .order_by
            .iter()
            .map(|o| {
                let expr = ctx.compile(&o.expr, params)?;
                Ok(match o.direction {
                    SortOrder::Asc => expr,
                    SortOrder::Desc => format!("{} DESC", expr),
                })
            })
            .collect::<QailResult<Vec<_>>>()?;
        sql.push_str(" ORDER BY ");
        sql.push_str(&parts.join(", "));
    }

    if let Some(limit) = &query.limit {
        sql.push_str(" LIMIT ");
        sql.push_str(&ctx.compile(limit, params)?);
    }
    if let Some(offset) = &query.offset {
        sql.push_str(" OFFSET ");
        sql.push_str(&ctx.compile(offset, params)?);
    }

    Ok(sql)
}

fn distinct_sql(distinct: Option<&Distinct>) -> QailResult<&'static str> {
    match distinct {
        None | Some(Distinct::Flag(false)) => Ok(""),
        Some(Distinct::Flag(true)) => Ok("DISTINCT "),
        Some(Distinct::Exprs(exprs)) if exprs.is_empty() => Ok(""),
        Some(Distinct::Exprs(_)) => Err(QailError::unsupported(
            "DISTINCT with multiple columns is not supported by SQLite",
        )),
    }
}

/// `"table" AS t0` or `(<fragment>) AS f0`.
fn source_sql(
    ctx: &ExprContext<'_>,
    source: &SourceRef<'_>,
    params: &mut ParamContext,
) -> QailResult<String> {
    let body = match (source.source, &source.table) {
        (Source::Fragment(fragment), _) => format!("({})", ctx.fragment(fragment, params)?),
        (Source::Table { .. }, Some(table)) => table.clone(),
        (Source::Table { name, .. }, None) => ctx.generator.quote_identifier(name),
    };
    Ok(format!("{} AS {}", body, source.alias))
}

fn join_sql(
    ctx: &ExprContext<'_>,
    join: &Join,
    position: usize,
    params: &mut ParamContext,
) -> QailResult<String> {
    let source = ctx.source(position)?;
    match join {
        Join::On { kind, on, .. } => {
            let qual = match kind {
                JoinKind::Inner => "INNER JOIN",
                JoinKind::Left => "LEFT OUTER JOIN",
                JoinKind::Right | JoinKind::Full => {
                    return Err(QailError::unsupported(
                        "RIGHT and FULL OUTER joins are not supported by SQLite",
                    ));
                }
            };
            let source = source_sql(ctx, source, params)?;
            let on = ctx.compile(on, params)?;
            Ok(format!(" {} {} ON {}", qual, source, on))
        }
        Join::Cross { .. } => Ok(format!(" CROSS JOIN {}", source_sql(ctx, source, params)?)),
        Join::Assoc { assoc, .. } => {
            if assoc.owner >= position {
                return Err(QailError::invalid(format!(
                    "association owner {} must be joined before source {}",
                    assoc.owner, position
                )));
            }
            let owner = ctx.source(assoc.owner)?;
            let quote = |column: &str| ctx.generator.quote_identifier(column);
            let on = match assoc.cardinality {
                Cardinality::BelongsTo => format!(
                    "{}.{} = {}.{}",
                    source.alias,
                    quote(&assoc.key),
                    owner.alias,
                    quote(&assoc.foreign_key)
                ),
                Cardinality::HasOne | Cardinality::HasMany => format!(
                    "{}.{} = {}.{}",
                    source.alias,
                    quote(&assoc.foreign_key),
                    owner.alias,
                    quote(&assoc.key)
                ),
            };
            let source = source_sql(ctx, source, params)?;
            Ok(format!(" INNER JOIN {} ON {}", source, on))
        }
    }
}
