//! DELETE SQL generation.

use tracing::debug;

use crate::ast::{Query, Value};
use crate::error::{QailError, QailResult};
use crate::returning::DmlOperation;
use crate::transpiler::CompiledSql;
use crate::transpiler::dml::{check_bulk, equality_filters, filters_sql, returning_clause};
use crate::transpiler::expr::{ExprContext, ParamContext};
use crate::transpiler::sources::{AliasMode, create_names};
use crate::transpiler::sql::sqlite::SqliteGenerator;
use crate::transpiler::traits::SqlGenerator;

/// Generate a single-row DELETE filtered by column equality.
///
/// `filters` must be non-empty; use [`build_delete_all`] for unfiltered
/// deletes.
pub fn build_delete(
    prefix: Option<&str>,
    table: &str,
    filters: &[(&str, Value)],
    returning: &[&str],
) -> QailResult<CompiledSql> {
    if filters.is_empty() {
        return Err(QailError::invalid(
            "DELETE needs at least one filter to identify the row",
        ));
    }
    let generator = SqliteGenerator;
    let mut params = ParamContext::new();

    let mut sql = String::from("DELETE FROM ");
    sql.push_str(&generator.quote_qualified(prefix, table));
    sql.push_str(" WHERE ");
    sql.push_str(&equality_filters(filters, &generator, &mut params));
    sql.push_str(&returning_clause(
        &generator,
        prefix,
        table,
        returning,
        DmlOperation::Delete,
    ));

    debug!(table, params = params.len(), "compiled DELETE");
    Ok(CompiledSql::with_params(sql, params))
}

/// Generate a bulk DELETE from a query's filters.
///
/// Queries with joins are rejected: SQLite has no multi-table DELETE.
pub fn build_delete_all(query: &Query) -> QailResult<CompiledSql> {
    check_bulk(query, DmlOperation::Delete).inspect_err(|e| {
        debug!(error = %e, "bulk DELETE rejected");
    })?;
    if !query.updates.is_empty() {
        return Err(QailError::invalid("bulk DELETE cannot carry assignments"));
    }

    let generator = SqliteGenerator;
    let mut params = ParamContext::new();
    let sources = create_names(query, &generator, AliasMode::Bulk);
    let ctx = ExprContext::new(&generator, &sources);

    let mut sql = format!("DELETE FROM {}", sources[0].alias);
    sql.push_str(&filters_sql("WHERE", &query.wheres, &ctx, &mut params)?);

    debug!(params = params.len(), "compiled bulk DELETE");
    Ok(CompiledSql::with_params(sql, params))
}
