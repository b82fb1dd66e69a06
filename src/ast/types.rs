use serde::{Deserialize, Serialize};

/// Abstract column type shared by casts and column definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Id,
    BinaryId,
    Serial,
    Integer,
    BigInt,
    Float,
    Decimal,
    Boolean,
    String,
    Text,
    Binary,
    Uuid,
    Map,
    Date,
    Time,
    DateTime,
    Array(Box<ColumnType>),
    /// Any other type name, emitted upper-cased
    Custom(String),
}

impl ColumnType {
    pub fn is_array(&self) -> bool {
        matches!(self, ColumnType::Array(_))
    }
}
