//! Sql literals for oplog document values.
//!
//! Only scalar values have a literal:
//! string: single quoted, embedded `'` is doubled, nothing else is escaped.
//! number: the digits of the source value, unquoted, exponent spelling may be normalized.
//! boolean: `true` or `false`, unquoted.

use bson::Bson;
use serde_json::Value;
use std::fmt;

use crate::{Result, TranslateError};

/// Sql literal of one document field value.
#[derive(Debug, PartialEq)]
pub enum SqlLiteral<'a> {
    /// string value, borrowed from the oplog.
    Str(&'a str),
    /// integer or decimal value, keeps the source digits.
    Number(String),
    /// boolean value.
    Bool(bool),
}

impl<'a> SqlLiteral<'a> {
    /// Make literal for json `value` of document field `field`.
    ///
    /// # Example
    /// ```
    /// use oplog2sql::literal::SqlLiteral;
    /// use serde_json::json;
    /// let value = json!("O'Neil");
    /// let literal = SqlLiteral::from_json("name", &value).unwrap();
    /// assert_eq!(literal.to_string(), "'O''Neil'");
    /// ```
    pub fn from_json(field: &str, value: &'a Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(SqlLiteral::Str(s)),
            // with `arbitrary_precision`, number keeps the digits written in source json.
            Value::Number(n) => Ok(SqlLiteral::Number(n.to_string())),
            Value::Bool(b) => Ok(SqlLiteral::Bool(*b)),
            Value::Null => Err(unsupported(field, "null")),
            Value::Array(_) => Err(unsupported(field, "array")),
            Value::Object(_) => Err(unsupported(field, "object")),
        }
    }

    /// Make literal for bson `value` of document field `field`.
    pub fn from_bson(field: &str, value: &'a Bson) -> Result<Self> {
        match value {
            Bson::String(s) => Ok(SqlLiteral::Str(s)),
            Bson::Int32(i) => Ok(SqlLiteral::Number(i.to_string())),
            Bson::Int64(i) => Ok(SqlLiteral::Number(i.to_string())),
            // Debug output is the shortest text which round trips, and keeps `.0` for whole numbers.
            Bson::Double(f) if f.is_finite() => Ok(SqlLiteral::Number(format!("{:?}", f))),
            Bson::Double(_) => Err(unsupported(field, "non-finite double")),
            Bson::Boolean(b) => Ok(SqlLiteral::Bool(*b)),
            other => Err(unsupported(field, &format!("{:?}", other.element_type()))),
        }
    }
}

impl fmt::Display for SqlLiteral<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlLiteral::Str(s) => write!(f, "'{}'", s.replace('\'', "''")),
            SqlLiteral::Number(n) => f.write_str(n),
            SqlLiteral::Bool(b) => write!(f, "{}", b),
        }
    }
}

fn unsupported(field: &str, kind: &str) -> TranslateError {
    TranslateError::UnsupportedFieldType {
        field: field.to_string(),
        kind: kind.to_string(),
    }
}
