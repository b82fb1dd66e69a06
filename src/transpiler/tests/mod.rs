//! Transpiler test modules.
//!
//! Tests are organized by category:
//! - `core`: SELECT compilation, aliases, joins, clause order
//! - `expressions`: operators, IN, casts, fragments, parameter numbering
//! - `dml`: INSERT, UPDATE, DELETE, bulk forms, RETURNING emulation
//! - `ddl`: CREATE/ALTER/DROP/RENAME TABLE, indexes

mod dml;
mod expressions;
