use std::fmt;

use rusqlite::ffi;
use thiserror::Error;

use super::value::ValueKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Primary key or unique index collision.
    Unique,
    /// Row references a parent that does not exist, or is still referenced.
    ForeignKey,
    /// NOT NULL, CHECK and anything else SQLite reports as a constraint.
    Other,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Unique => f.write_str("unique"),
            ConstraintKind::ForeignKey => f.write_str("foreign key"),
            ConstraintKind::Other => f.write_str("other"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(rusqlite::Error),
    #[error("{kind} constraint violated: {message}")]
    Constraint {
        kind: ConstraintKind,
        message: String,
    },
    #[error("empty value set for {table}.{column} lookup")]
    EmptyValueSet {
        table: &'static str,
        column: &'static str,
    },
    #[error("column {column} does not belong to table {table}")]
    UnexpectedColumn {
        table: &'static str,
        column: &'static str,
    },
    #[error("cannot bind {value} as {expected} for {column}")]
    Bind {
        column: &'static str,
        expected: ValueKind,
        value: String,
    },
    #[error("cannot decode {table} row: {reason}")]
    Decode {
        table: &'static str,
        reason: String,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, message) = &err {
            if code.code == ffi::ErrorCode::ConstraintViolation {
                let kind = match code.extended_code {
                    ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
                        ConstraintKind::Unique
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
                    _ => ConstraintKind::Other,
                };
                return StorageError::Constraint {
                    kind,
                    message: message.clone().unwrap_or_else(|| code.to_string()),
                };
            }
        }
        StorageError::Sqlite(err)
    }
}
