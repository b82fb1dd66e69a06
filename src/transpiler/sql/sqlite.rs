use super::super::traits::SqlGenerator;
use crate::ast::ColumnType;
use crate::error::{QailError, QailResult};

pub struct SqliteGenerator;

impl SqlGenerator for SqliteGenerator {
    fn quote_identifier(&self, id: &str) -> String {
        format!("\"{}\"", id.replace('"', "\"\""))
    }

    fn placeholder(&self, index: usize) -> String {
        format!("?{}", index)
    }

    fn bool_literal(&self, val: bool) -> String {
        if val {
            "1".to_string()
        } else {
            "0".to_string()
        }
    }

    fn binary_literal(&self, bytes: &[u8]) -> String {
        let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
        format!("X'{}'", hex)
    }

    fn float_literal(&self, val: f64) -> String {
        // SQLite has no NaN literal and overflows 9e999 to Inf.
        if val.is_nan() {
            "NULL".to_string()
        } else if val.is_infinite() && val > 0.0 {
            "9e999".to_string()
        } else if val.is_infinite() {
            "-9e999".to_string()
        } else if val.fract() == 0.0 {
            if val.abs() < 1e16 {
                format!("{:.1}", val)
            } else {
                format!("{:e}", val)
            }
        } else {
            val.to_string()
        }
    }
}

/// SQL type of a cast target.
pub fn cast_type(ty: &ColumnType) -> QailResult<String> {
    match ty {
        ColumnType::Serial => Ok("INTEGER".to_string()),
        ColumnType::Float => Ok("NUMERIC".to_string()),
        other => column_type(other, None, None),
    }
}

/// SQL type of a column definition.
pub fn column_type(
    ty: &ColumnType,
    precision: Option<u32>,
    scale: Option<u32>,
) -> QailResult<String> {
    let sql = match ty {
        ColumnType::Id | ColumnType::Integer | ColumnType::BigInt => "INTEGER".to_string(),
        ColumnType::Serial => "INTEGER PRIMARY KEY AUTOINCREMENT".to_string(),
        ColumnType::BinaryId
        | ColumnType::String
        | ColumnType::Text
        | ColumnType::Uuid
        | ColumnType::Map => "TEXT".to_string(),
        ColumnType::Float => "FLOAT".to_string(),
        ColumnType::Binary => "BLOB".to_string(),
        ColumnType::Decimal => match precision {
            Some(p) => format!("DECIMAL({},{})", p, scale.unwrap_or(0)),
            None => "NUMERIC".to_string(),
        },
        ColumnType::Boolean => "BOOLEAN".to_string(),
        ColumnType::Date => "DATE".to_string(),
        ColumnType::Time => "TIME".to_string(),
        ColumnType::DateTime => "DATETIME".to_string(),
        ColumnType::Array(_) => {
            return Err(QailError::unsupported("Array type is not supported by SQLite"));
        }
        ColumnType::Custom(name) => name.to_uppercase(),
    };
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Value;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(SqliteGenerator.quote_identifier("posts"), "\"posts\"");
        assert_eq!(SqliteGenerator.quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_quote_qualified() {
        assert_eq!(SqliteGenerator.quote_qualified(Some("foo"), "posts"), "\"foo\".\"posts\"");
        assert_eq!(SqliteGenerator.quote_qualified(None, "posts"), "\"posts\"");
    }

    #[test]
    fn test_render_literal() {
        let g = SqliteGenerator;
        assert_eq!(g.render_literal(&Value::Null), "NULL");
        assert_eq!(g.render_literal(&Value::Bool(true)), "1");
        assert_eq!(g.render_literal(&Value::Bool(false)), "0");
        assert_eq!(g.render_literal(&Value::Int(-3)), "-3");
        assert_eq!(g.render_literal(&Value::Float(1.0)), "1.0");
        assert_eq!(g.render_literal(&Value::Float(-2.5)), "-2.5");
        assert_eq!(g.render_literal(&Value::Float(f64::INFINITY)), "9e999");
        assert_eq!(g.render_literal(&Value::Float(f64::NAN)), "NULL");
        assert_eq!(g.render_literal(&Value::Decimal(Decimal::new(150, 2))), "1.50");
        assert_eq!(g.render_literal(&Value::String("it's".into())), "'it''s'");
        assert_eq!(g.render_literal(&Value::Binary(vec![0x0a, 0xff])), "X'0AFF'");
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(g.render_literal(&Value::Date(date)), "'2024-01-02'");
        let dt = date.and_hms_opt(3, 4, 5).unwrap();
        assert_eq!(g.render_literal(&Value::DateTime(dt)), "'2024-01-02 03:04:05'");
    }

    #[test]
    fn test_column_type_mapping() {
        assert_eq!(column_type(&ColumnType::String, None, None).unwrap(), "TEXT");
        assert_eq!(column_type(&ColumnType::Decimal, None, None).unwrap(), "NUMERIC");
        assert_eq!(column_type(&ColumnType::Decimal, Some(10), Some(2)).unwrap(), "DECIMAL(10,2)");
        assert_eq!(column_type(&ColumnType::Decimal, Some(10), None).unwrap(), "DECIMAL(10,0)");
        assert_eq!(
            column_type(&ColumnType::Custom("citext".into()), None, None).unwrap(),
            "CITEXT"
        );
        let err = column_type(&ColumnType::Array(Box::new(ColumnType::Integer)), None, None)
            .unwrap_err();
        assert_eq!(err.to_string(), "Array type is not supported by SQLite");
    }

    #[test]
    fn test_cast_type_mapping() {
        assert_eq!(cast_type(&ColumnType::Serial).unwrap(), "INTEGER");
        assert_eq!(cast_type(&ColumnType::Float).unwrap(), "NUMERIC");
        assert_eq!(cast_type(&ColumnType::Binary).unwrap(), "BLOB");
    }
}
