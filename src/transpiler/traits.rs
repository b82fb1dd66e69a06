//! Identifier and literal rendering.

use crate::ast::Value;

/// Double every embedded single quote and wrap in single quotes.
pub fn escape_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Trait for dialect-specific rendering of identifiers, placeholders and
/// literals.
pub trait SqlGenerator {
    /// Quote an identifier (table or column name).
    fn quote_identifier(&self, name: &str) -> String;

    /// Generate the parameter placeholder for a 1-based index.
    fn placeholder(&self, index: usize) -> String;

    /// Get the boolean literal (true/false vs 1/0).
    fn bool_literal(&self, val: bool) -> String;

    /// Render a blob literal.
    fn binary_literal(&self, bytes: &[u8]) -> String;

    /// Render a float literal.
    fn float_literal(&self, val: f64) -> String;

    /// `"prefix"."name"`, or `"name"` without a prefix.
    fn quote_qualified(&self, prefix: Option<&str>, name: &str) -> String {
        match prefix {
            Some(p) => format!("{}.{}", self.quote_identifier(p), self.quote_identifier(name)),
            None => self.quote_identifier(name),
        }
    }

    /// Render a value as an inline SQL literal.
    fn render_literal(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => self.bool_literal(*b),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => self.float_literal(*f),
            Value::Decimal(d) => d.to_string(),
            Value::String(s) => escape_string(s),
            Value::Binary(bytes) => self.binary_literal(bytes),
            Value::Date(d) => escape_string(&d.to_string()),
            Value::Time(t) => escape_string(&t.to_string()),
            Value::DateTime(dt) => escape_string(&dt.to_string()),
        }
    }
}
