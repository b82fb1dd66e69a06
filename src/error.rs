//! Error types for the SQLite compiler.

use thiserror::Error;

/// The main error type for qail-sqlite operations.
///
/// Every compile failure aborts the whole statement; no partial SQL is
/// ever returned alongside an error.
#[derive(Debug, Error)]
pub enum QailError {
    /// The query shape or schema change cannot be expressed in SQLite.
    #[error("{0}")]
    Unsupported(String),

    /// The statement needs column names only a schema can provide.
    #[error(
        "selecting all fields from {table} requires an associated schema, \
         please specify a schema or select the fields explicitly"
    )]
    SchemaRequired { table: String },

    /// The input tree is malformed (dangling source index, bad fragment).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Failed to parse a RETURNING hint.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QailError {
    /// Create an unsupported-feature error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    /// Create an invalid-query error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidQuery(message.into())
    }

    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// True for failures caused by SQLite's reduced feature set.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

/// Result type alias for qail-sqlite operations.
pub type QailResult<T> = Result<T, QailError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_display_is_bare_message() {
        let err = QailError::unsupported("DROP COLUMN not supported by SQLite");
        assert_eq!(err.to_string(), "DROP COLUMN not supported by SQLite");
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_schema_required_display() {
        let err = QailError::SchemaRequired {
            table: "\"posts\"".to_string(),
        };
        assert!(err.to_string().starts_with("selecting all fields from \"posts\""));
        assert!(err.to_string().contains("requires an associated schema"));
    }

    #[test]
    fn test_parse_display() {
        let err = QailError::parse(5, "expected ;--RETURNING");
        assert_eq!(err.to_string(), "Parse error at position 5: expected ;--RETURNING");
    }
}
