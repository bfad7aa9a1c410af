use std::fmt;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

/// A bound statement parameter or a decoded column value.
///
/// Only integers and text ever reach the store; the variant decides how the
/// value is bound, it is never spliced into SQL text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Text(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Integer => f.write_str("integer"),
            ValueKind::Text => f.write_str("text"),
        }
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            Value::Integer(_) => None,
        }
    }

    /// Convert into `kind`, or `None` when the value has no faithful representation there.
    pub fn coerce(&self, kind: ValueKind) -> Option<Value> {
        match (self, kind) {
            (Value::Integer(v), ValueKind::Integer) => Some(Value::Integer(*v)),
            (Value::Text(v), ValueKind::Text) => Some(Value::Text(v.clone())),
            (Value::Integer(v), ValueKind::Text) => Some(Value::Text(v.to_string())),
            (Value::Text(v), ValueKind::Integer) => v.parse::<i64>().ok().map(Value::Integer),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Value::Integer(v) => Ok(ToSqlOutput::from(*v)),
            Value::Text(v) => Ok(ToSqlOutput::from(v.as_str())),
        }
    }
}

impl FromSql for Value {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(v) => Ok(Value::Integer(v)),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map(|s| Value::Text(s.to_string()))
                .map_err(|err| FromSqlError::Other(Box::new(err))),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_text_to_integer_requires_digits() {
        assert_eq!(
            Value::from("42").coerce(ValueKind::Integer),
            Some(Value::Integer(42))
        );
        assert_eq!(Value::from("4x").coerce(ValueKind::Integer), None);
    }

    #[test]
    fn coerce_integer_to_text_formats_decimal() {
        assert_eq!(
            Value::Integer(-7).coerce(ValueKind::Text),
            Some(Value::Text("-7".to_string()))
        );
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![Value::Integer(1), Value::from("a")]).unwrap();
        assert_eq!(json, r#"[1,"a"]"#);
    }
}
