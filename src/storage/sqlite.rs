use std::path::Path;

use rusqlite::{params_from_iter, Connection, TransactionBehavior};

use super::{
    error::{StorageError, StorageResult},
    schema::{self, SchemaReport},
    traits::{Execution, Executor, Store},
    value::Value,
};

/// File-backed SQLite store. Each unit of work opens its own connection.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pub path: String,
}

/// Executor bound to a single open connection or transaction.
pub struct SqliteExecutor<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteExecutor<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

fn run_query(conn: &Connection, sql: &str, params: &[Value]) -> StorageResult<Vec<Vec<Value>>> {
    let mut stmt = conn.prepare(sql)?;
    let width = stmt.column_count();
    let rows = stmt
        .query_map(params_from_iter(params.iter()), |row| {
            (0..width)
                .map(|idx| row.get::<_, Value>(idx))
                .collect::<rusqlite::Result<Vec<_>>>()
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn run_execute(conn: &Connection, sql: &str, params: &[Value]) -> StorageResult<Execution> {
    let rows_affected = conn.execute(sql, params_from_iter(params.iter()))?;
    Ok(Execution {
        rows_affected,
        last_insert_id: conn.last_insert_rowid(),
    })
}

impl Executor for SqliteExecutor<'_> {
    fn query(&self, sql: &str, params: &[Value]) -> StorageResult<Vec<Vec<Value>>> {
        run_query(self.conn, sql, params)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> StorageResult<Execution> {
        run_execute(self.conn, sql, params)
    }
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }

    /// Remove the backing database file, and its WAL sidecars, to force a clean start.
    pub fn reset_all(&self) -> StorageResult<()> {
        for suffix in ["", "-wal", "-shm"] {
            let path = format!("{}{}", self.path, suffix);
            if Path::new(&path).exists() {
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Provision the managed tables. Safe to call on every startup.
    pub fn init(&self) -> StorageResult<SchemaReport> {
        self.transaction(schema::ensure_schema)
    }

    /// Drop the managed tables and forget their versions.
    pub fn uninstall(&self) -> StorageResult<()> {
        self.transaction(|tx| -> StorageResult<()> {
            schema::drop_all(tx)?;
            schema::clear_versions(tx)
        })
    }

    fn open(&self) -> StorageResult<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(std::time::Duration::from_millis(500))?;
        Ok(conn)
    }

    fn with_conn<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Connection) -> StorageResult<T>,
    {
        let conn = self.open()?;
        f(&conn)
    }
}

impl Executor for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> StorageResult<Vec<Vec<Value>>> {
        self.with_conn(|conn| run_query(conn, sql, params))
    }

    fn execute(&self, sql: &str, params: &[Value]) -> StorageResult<Execution> {
        self.with_conn(|conn| run_execute(conn, sql, params))
    }
}

impl Store for SqliteStore {
    fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn Executor) -> Result<T, E>,
        E: From<StorageError>,
    {
        let mut conn = self.open()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StorageError::from)?;
        let out = f(&SqliteExecutor::new(&tx))?;
        tx.commit().map_err(StorageError::from)?;
        Ok(out)
    }
}
