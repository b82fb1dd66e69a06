//! INSERT SQL generation.

use tracing::debug;

use crate::ast::Value;
use crate::error::QailResult;
use crate::returning::DmlOperation;
use crate::transpiler::CompiledSql;
use crate::transpiler::dml::returning_clause;
use crate::transpiler::expr::ParamContext;
use crate::transpiler::sql::sqlite::SqliteGenerator;
use crate::transpiler::traits::SqlGenerator;

/// Generate a single-row INSERT.
///
/// Placeholders are numbered 1..n in field order. With no fields the row
/// is inserted with `DEFAULT VALUES`. A non-empty `returning` appends the
/// RETURNING-emulation comment.
pub fn build_insert(
    prefix: Option<&str>,
    table: &str,
    fields: &[(&str, Value)],
    returning: &[&str],
) -> QailResult<CompiledSql> {
    let generator = SqliteGenerator;
    let mut params = ParamContext::new();

    let mut sql = String::from("INSERT INTO ");
    sql.push_str(&generator.quote_qualified(prefix, table));

    if fields.is_empty() {
        sql.push_str(" DEFAULT VALUES");
    } else {
        let cols: Vec<String> = fields
            .iter()
            .map(|(c, _)| generator.quote_identifier(c))
            .collect();
        let values: Vec<String> = fields
            .iter()
            .map(|(_, v)| params.add_param(v.clone(), &generator))
            .collect();
        sql.push_str(&format!(" ({}) VALUES ({})", cols.join(", "), values.join(", ")));
    }

    sql.push_str(&returning_clause(
        &generator,
        prefix,
        table,
        returning,
        DmlOperation::Insert,
    ));

    debug!(table, params = params.len(), "compiled INSERT");
    Ok(CompiledSql::with_params(sql, params))
}
