//! UPDATE SQL generation.

use tracing::debug;

use crate::ast::{Query, UpdateOp, Value};
use crate::error::{QailError, QailResult};
use crate::returning::DmlOperation;
use crate::transpiler::CompiledSql;
use crate::transpiler::dml::{check_bulk, equality_filters, filters_sql, returning_clause};
use crate::transpiler::expr::{ExprContext, ParamContext};
use crate::transpiler::sources::{AliasMode, create_names};
use crate::transpiler::sql::sqlite::SqliteGenerator;
use crate::transpiler::traits::SqlGenerator;

/// Generate a single-row UPDATE.
///
/// SET placeholders are numbered first, WHERE placeholders continue the
/// sequence. Both `fields` and `filters` must be non-empty; use
/// [`build_update_all`] for unfiltered updates.
pub fn build_update(
    prefix: Option<&str>,
    table: &str,
    fields: &[(&str, Value)],
    filters: &[(&str, Value)],
    returning: &[&str],
) -> QailResult<CompiledSql> {
    if fields.is_empty() {
        return Err(QailError::invalid("UPDATE needs at least one field"));
    }
    if filters.is_empty() {
        return Err(QailError::invalid(
            "UPDATE needs at least one filter to identify the row",
        ));
    }
    let generator = SqliteGenerator;
    let mut params = ParamContext::new();

    let sets: Vec<String> = fields
        .iter()
        .map(|(column, value)| {
            format!(
                "{} = {}",
                generator.quote_identifier(column),
                params.add_param(value.clone(), &generator)
            )
        })
        .collect();

    let mut sql = format!(
        "UPDATE {} SET {}",
        generator.quote_qualified(prefix, table),
        sets.join(", ")
    );
    sql.push_str(" WHERE ");
    sql.push_str(&equality_filters(filters, &generator, &mut params));
    sql.push_str(&returning_clause(
        &generator,
        prefix,
        table,
        returning,
        DmlOperation::Update,
    ));

    debug!(table, params = params.len(), "compiled UPDATE");
    Ok(CompiledSql::with_params(sql, params))
}

/// Generate a bulk UPDATE from a query's assignments and filters.
///
/// Queries with joins are rejected: SQLite has no multi-table UPDATE.
pub fn build_update_all(query: &Query) -> QailResult<CompiledSql> {
    check_bulk(query, DmlOperation::Update).inspect_err(|e| {
        debug!(error = %e, "bulk UPDATE rejected");
    })?;
    if query.updates.is_empty() {
        return Err(QailError::invalid("bulk UPDATE needs at least one assignment"));
    }

    let generator = SqliteGenerator;
    let mut params = ParamContext::new();
    let sources = create_names(query, &generator, AliasMode::Bulk);
    let ctx = ExprContext::new(&generator, &sources);

    let sets = query
        .updates
        .iter()
        .map(|op| match op {
            UpdateOp::Set { field, value } => Ok(format!(
                "{} = {}",
                generator.quote_identifier(field),
                ctx.compile(value, &mut params)?
            )),
            UpdateOp::Inc { field, value } => {
                let column = generator.quote_identifier(field);
                Ok(format!(
                    "{} = {} + {}",
                    column,
                    column,
                    ctx.operand(value, &mut params)?
                ))
            }
            UpdateOp::Push { .. } | UpdateOp::Pull { .. } => Err(QailError::unsupported(
                "Array operations are not supported by SQLite",
            )),
        })
        .collect::<QailResult<Vec<_>>>()?;

    let mut sql = format!("UPDATE {} SET {}", sources[0].alias, sets.join(", "));
    sql.push_str(&filters_sql("WHERE", &query.wheres, &ctx, &mut params)?);

    debug!(params = params.len(), "compiled bulk UPDATE");
    Ok(CompiledSql::with_params(sql, params))
}
