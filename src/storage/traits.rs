use super::{error::StorageError, value::Value, StorageResult};

/// Outcome of a data-modifying statement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Execution {
    /// Rows matched by the statement's WHERE clause.
    pub rows_affected: usize,
    pub last_insert_id: i64,
}

/// The two capabilities the data layer needs from a relational store.
///
/// Statement text is produced from typed descriptors only; `params` carries
/// every caller-supplied value as a bound parameter.
pub trait Executor {
    /// Run a SELECT and return each row as positional values.
    fn query(&self, sql: &str, params: &[Value]) -> StorageResult<Vec<Vec<Value>>>;

    fn execute(&self, sql: &str, params: &[Value]) -> StorageResult<Execution>;
}

/// A shareable store handle that can also run several statements atomically.
pub trait Store: Executor + Clone + Send + Sync + 'static {
    /// Run `f` inside a transaction. Commits when `f` returns `Ok`, rolls back otherwise.
    fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn Executor) -> Result<T, E>,
        E: From<StorageError>;
}
