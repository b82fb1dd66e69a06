pub mod builders;
pub mod ddl;
pub mod expr;
pub mod joins;
pub mod operators;
pub mod query;
pub mod types;
pub mod values;

pub use self::ddl::{
    ColumnChange, ColumnDefault, ColumnOptions, ColumnSpec, Index, IndexColumn, OnDelete,
    Reference, SchemaChange, Table,
};
pub use self::expr::{Expr, Fragment, InList};
pub use self::joins::{Association, Join};
pub use self::operators::{BinaryOp, Cardinality, JoinKind, SortOrder};
pub use self::query::{Distinct, OrderBy, Query, Source, UpdateOp};
pub use self::types::ColumnType;
pub use self::values::Value;
