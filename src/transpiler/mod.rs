//! SQLite compiler for query and schema-change trees.
//!
//! All entry points are pure: input tree in, SQL text plus ordered
//! parameters out.

pub mod ddl;
pub mod dml;
pub mod expr;
pub mod sources;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::ast::{Query, SchemaChange, Value};
use crate::error::QailResult;

pub use ddl::build_schema_change;
pub use dml::delete::{build_delete, build_delete_all};
pub use dml::insert::build_insert;
pub use dml::select::build_select;
pub use dml::update::{build_update, build_update_all};
pub use expr::{ExprContext, ParamContext};
pub use sql::sqlite::SqliteGenerator;
pub use traits::SqlGenerator;

/// A compiled statement and the values for its placeholders, in
/// placeholder order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledSql {
    pub sql: String,
    pub params: Vec<Value>,
}

impl CompiledSql {
    /// Statement without parameters.
    pub fn text(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub(crate) fn with_params(sql: String, params: ParamContext) -> Self {
        Self {
            sql,
            params: params.params,
        }
    }
}

impl std::fmt::Display for CompiledSql {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql)
    }
}

/// Trait for converting AST nodes to SQLite SQL.
pub trait ToSql {
    fn to_sql(&self) -> QailResult<CompiledSql>;
}

impl ToSql for Query {
    /// Compile as a SELECT.
    fn to_sql(&self) -> QailResult<CompiledSql> {
        build_select(self)
    }
}

impl ToSql for SchemaChange {
    fn to_sql(&self) -> QailResult<CompiledSql> {
        build_schema_change(self).map(CompiledSql::text)
    }
}
