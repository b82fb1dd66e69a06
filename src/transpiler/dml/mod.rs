//! DML (Data Manipulation Language) SQL generation.
//!
//! SELECT, INSERT, UPDATE and DELETE, plus the bulk UPDATE/DELETE forms
//! compiled from a full query.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

use crate::ast::{Expr, Query, Source, Value};
use crate::error::{QailError, QailResult};
use crate::returning::DmlOperation;
use crate::transpiler::expr::{ExprContext, ParamContext};
use crate::transpiler::traits::SqlGenerator;

/// ` WHERE (a) AND (b)`, or nothing when there are no filters.
pub(crate) fn filters_sql(
    keyword: &str,
    filters: &[Expr],
    ctx: &ExprContext<'_>,
    params: &mut ParamContext,
) -> QailResult<String> {
    if filters.is_empty() {
        return Ok(String::new());
    }
    let parts = filters
        .iter()
        .map(|f| ctx.compile(f, params).map(|sql| format!("({})", sql)))
        .collect::<QailResult<Vec<_>>>()?;
    Ok(format!(" {} {}", keyword, parts.join(" AND ")))
}

/// `"a" = ?n AND "b" = ?n+1` for single-row UPDATE/DELETE filters.
pub(crate) fn equality_filters(
    filters: &[(&str, Value)],
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> String {
    filters
        .iter()
        .map(|(column, value)| {
            format!(
                "{} = {}",
                generator.quote_identifier(column),
                params.add_param(value.clone(), generator)
            )
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// RETURNING emulation: a trailing comment naming the columns the driver
/// must re-fetch after running the statement.
///
/// ` ;--RETURNING ON INSERT "table","col1","col2"`
pub(crate) fn returning_clause(
    generator: &dyn SqlGenerator,
    prefix: Option<&str>,
    table: &str,
    returning: &[&str],
    operation: DmlOperation,
) -> String {
    if returning.is_empty() {
        return String::new();
    }
    let columns = returning
        .iter()
        .map(|c| generator.quote_identifier(c))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        " ;--RETURNING ON {} {},{}",
        operation,
        generator.quote_qualified(prefix, table),
        columns
    )
}

/// Shape checks shared by bulk UPDATE and DELETE.
pub(crate) fn check_bulk(query: &Query, operation: DmlOperation) -> QailResult<()> {
    if !query.joins.is_empty() {
        return Err(QailError::unsupported(format!(
            "JOINs are not supported on {} statements by SQLite",
            operation
        )));
    }
    if query.lock.is_some() {
        return Err(QailError::unsupported("locks are not supported by SQLite"));
    }
    if let Source::Fragment(_) = query.from {
        return Err(QailError::invalid(format!(
            "bulk {} needs a table source",
            operation
        )));
    }
    let ignored = [
        ("a projection", query.select.is_some()),
        ("DISTINCT", query.distinct.is_some()),
        ("GROUP BY", !query.group_by.is_empty()),
        ("HAVING", !query.havings.is_empty()),
        ("ORDER BY", !query.order_by.is_empty()),
        ("LIMIT", query.limit.is_some()),
        ("OFFSET", query.offset.is_some()),
    ];
    if let Some((clause, _)) = ignored.iter().find(|(_, present)| *present) {
        return Err(QailError::invalid(format!(
            "bulk {} cannot carry {}",
            operation, clause
        )));
    }
    Ok(())
}
