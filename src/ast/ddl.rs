//! Schema-change descriptors.

use serde::{Deserialize, Serialize};

use crate::ast::{ColumnType, Value};

/// A table targeted by a schema change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub prefix: Option<String>,
    /// Raw text appended after the column list, e.g. `WITHOUT ROWID`.
    #[serde(default)]
    pub options: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            options: None,
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }
}

/// DEFAULT value of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnDefault {
    Value(Value),
    /// SQL expression, emitted parenthesized and unescaped.
    Raw(String),
}

/// Per-column options.
///
/// Every field defaults to "not specified": no DEFAULT, nullability left
/// to the engine, no size/precision/scale, not a primary key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnOptions {
    pub default: Option<ColumnDefault>,
    /// `Some(false)` emits NOT NULL; `None` and `Some(true)` emit nothing.
    pub null: Option<bool>,
    /// Accepted for portability; SQLite types ignore it.
    pub size: Option<u32>,
    /// Decimal precision. With it, decimals render as `DECIMAL(p,s)`.
    pub precision: Option<u32>,
    /// Decimal scale, 0 when only precision is set.
    pub scale: Option<u32>,
    pub primary_key: bool,
}

impl ColumnOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(ColumnDefault::Value(value.into()));
        self
    }

    pub fn default_raw(mut self, sql: impl Into<String>) -> Self {
        self.default = Some(ColumnDefault::Raw(sql.into()));
        self
    }

    pub fn null(mut self, null: bool) -> Self {
        self.null = Some(null);
        self
    }

    pub fn not_null(self) -> Self {
        self.null(false)
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}

/// ON DELETE action of a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDelete {
    #[default]
    Nothing,
    Cascade,
    SetNull,
}

/// Foreign key target of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub table: String,
    #[serde(default = "default_reference_column")]
    pub column: String,
    /// Constraint name; `<table>_<column>_fkey` when absent.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub on_delete: OnDelete,
    /// Qualifier of the referenced table; falls back to the owning table's.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Type of the referencing column.
    #[serde(default = "default_reference_type")]
    pub column_type: ColumnType,
}

fn default_reference_column() -> String {
    "id".to_string()
}

fn default_reference_type() -> ColumnType {
    ColumnType::Id
}

impl Reference {
    pub fn to(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: default_reference_column(),
            name: None,
            on_delete: OnDelete::Nothing,
            prefix: None,
            column_type: default_reference_type(),
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn on_delete(mut self, action: OnDelete) -> Self {
        self.on_delete = action;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn column_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }
}

/// What a column holds: a plain type or a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSpec {
    Type(ColumnType),
    References(Reference),
}

impl From<ColumnType> for ColumnSpec {
    fn from(ty: ColumnType) -> Self {
        ColumnSpec::Type(ty)
    }
}

impl From<Reference> for ColumnSpec {
    fn from(reference: Reference) -> Self {
        ColumnSpec::References(reference)
    }
}

/// A column directive inside CREATE/ALTER TABLE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnChange {
    Add {
        name: String,
        spec: ColumnSpec,
        #[serde(default)]
        options: ColumnOptions,
    },
    Modify {
        name: String,
        spec: ColumnSpec,
        #[serde(default)]
        options: ColumnOptions,
    },
    Remove {
        name: String,
    },
    Rename {
        from: String,
        to: String,
    },
}

impl ColumnChange {
    pub fn add(name: impl Into<String>, spec: impl Into<ColumnSpec>, options: ColumnOptions) -> Self {
        ColumnChange::Add {
            name: name.into(),
            spec: spec.into(),
            options,
        }
    }

    pub fn modify(
        name: impl Into<String>,
        spec: impl Into<ColumnSpec>,
        options: ColumnOptions,
    ) -> Self {
        ColumnChange::Modify {
            name: name.into(),
            spec: spec.into(),
            options,
        }
    }

    pub fn remove(name: impl Into<String>) -> Self {
        ColumnChange::Remove { name: name.into() }
    }

    pub fn rename(from: impl Into<String>, to: impl Into<String>) -> Self {
        ColumnChange::Rename {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// An index column: a name, or a raw expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexColumn {
    Name(String),
    Raw(String),
}

impl From<&str> for IndexColumn {
    fn from(name: &str) -> Self {
        IndexColumn::Name(name.to_string())
    }
}

/// Index definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub table: String,
    /// Qualifier of the indexed table. Index names are database-wide.
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub columns: Vec<IndexColumn>,
    #[serde(default)]
    pub unique: bool,
    /// Raw predicate for a partial index.
    #[serde(default, rename = "where")]
    pub where_clause: Option<String>,
}

impl Index {
    pub fn new<I, C>(table: impl Into<String>, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<IndexColumn>,
    {
        Self {
            name: name.into(),
            table: table.into(),
            prefix: None,
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
            where_clause: None,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn where_clause(mut self, sql: impl Into<String>) -> Self {
        self.where_clause = Some(sql.into());
        self
    }
}

/// One DDL operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaChange {
    CreateTable {
        table: Table,
        columns: Vec<ColumnChange>,
        #[serde(default)]
        if_not_exists: bool,
    },
    AlterTable {
        table: Table,
        changes: Vec<ColumnChange>,
    },
    DropTable {
        table: Table,
        #[serde(default)]
        if_exists: bool,
    },
    RenameTable {
        from: Table,
        to: Table,
    },
    CreateIndex {
        index: Index,
        #[serde(default)]
        if_not_exists: bool,
    },
    DropIndex {
        index: Index,
        #[serde(default)]
        if_exists: bool,
    },
    /// Passed through verbatim.
    Raw(String),
}
