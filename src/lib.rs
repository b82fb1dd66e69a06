//! # qail-sqlite
//!
//! SQLite dialect compiler for QAIL query and schema trees.
//!
//! Turns an already-planned [`Query`](ast::Query) or
//! [`SchemaChange`](ast::SchemaChange) into exact SQLite text plus the
//! ordered values for its `?N` placeholders. Shapes SQLite cannot express
//! (multi-column DISTINCT, locks, joins in bulk UPDATE/DELETE, column
//! ALTER/RENAME/DROP) fail with a typed error instead of producing SQL.
//!
//! ## Quick Example
//!
//! ```
//! use qail_sqlite::prelude::*;
//! use qail_sqlite::ast::builders::*;
//!
//! let query = Query::from(Source::table("model"))
//!     .select(vec![field(0, "x")])
//!     .filter(eq(field(0, "x"), param(123)));
//!
//! let compiled = query.to_sql().unwrap();
//! assert_eq!(compiled.sql, r#"SELECT m0."x" FROM "model" AS m0 WHERE (m0."x" = ?1)"#);
//! assert_eq!(compiled.params, vec![Value::Int(123)]);
//! ```
//!
//! ## RETURNING
//!
//! SQLite statements built with a RETURNING list end in a comment such as
//! ` ;--RETURNING ON INSERT "model","id"`. Drivers split it off with
//! [`returning::split_returning`] and re-fetch the listed columns.

pub mod ast;
pub mod config;
pub mod error;
pub mod returning;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::error::*;
    pub use crate::returning::{DmlOperation, ReturningHint, split_returning};
    pub use crate::transpiler::{
        CompiledSql, ToSql, build_delete, build_delete_all, build_insert, build_schema_change,
        build_select, build_update, build_update_all,
    };
}

pub use error::{QailError, QailResult};
pub use transpiler::{CompiledSql, ToSql};
