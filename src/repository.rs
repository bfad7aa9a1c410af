//! Parameterized CRUD over the links, keywords and links-keywords tables.
//!
//! Statement text is assembled from [`Table`] and [`Column`] descriptors only.
//! Caller input reaches SQLite exclusively as bound [`Value`]s.

use thiserror::Error;

use crate::{
    storage::{
        Column, ConstraintKind, Executor, StorageError, Store, Table, Value, ValueKind,
    },
    types::{Association, Keyword, Link, Record},
};

/// SQLite caps the number of bound variables per statement.
const WHERE_IN_CHUNK: usize = 900;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Storage(StorageError),
    #[error("{table} has no row with id {id}")]
    NotFound { table: Table, id: i64 },
    #[error("{table} already contains this row")]
    Duplicate { table: Table },
    #[error("{table} row references a missing parent row")]
    MissingReference { table: Table },
    #[error("{table} row is still referenced")]
    StillReferenced { table: Table },
    #[error("missing required field {column} for {table}")]
    MissingField { table: Table, column: Column },
    #[error("field {column} must not be empty")]
    EmptyField { column: Column },
    #[error("{table} does not support {operation}")]
    Unsupported {
        table: Table,
        operation: &'static str,
    },
    #[error("invalid key for {table}: {reason}")]
    InvalidKey { table: Table, reason: String },
}

impl From<StorageError> for RepositoryError {
    fn from(err: StorageError) -> Self {
        RepositoryError::Storage(err)
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Column/value pairs handed to insert, update and delete.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fields(Vec<(Column, Value)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `column`, replacing any earlier value for it.
    pub fn with(mut self, column: Column, value: impl Into<Value>) -> Self {
        let value = value.into();
        match self.0.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.0.push((column, value)),
        }
        self
    }

    pub fn get(&self, column: Column) -> Option<&Value> {
        self.0.iter().find(|(c, _)| *c == column).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Column, Value)> {
        self.0.iter()
    }
}

fn classify(table: Table, err: StorageError, on_foreign_key: RepositoryError) -> RepositoryError {
    match err {
        StorageError::Constraint {
            kind: ConstraintKind::Unique,
            ..
        } => RepositoryError::Duplicate { table },
        StorageError::Constraint {
            kind: ConstraintKind::ForeignKey,
            ..
        } => on_foreign_key,
        other => RepositoryError::Storage(other),
    }
}

fn placeholders(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("?{i}")).collect()
}

fn decode_rows(table: Table, rows: Vec<Vec<Value>>) -> RepositoryResult<Vec<Record>> {
    rows.into_iter()
        .map(|row| table.decode(row).map_err(RepositoryError::from))
        .collect()
}

fn required(table: Table, fields: &Fields, column: Column) -> RepositoryResult<Value> {
    let raw = fields
        .get(column)
        .ok_or(RepositoryError::MissingField { table, column })?;
    let value = column.bind(raw)?;
    if let Value::Text(text) = &value {
        if text.trim().is_empty() {
            return Err(RepositoryError::EmptyField { column });
        }
    }
    Ok(value)
}

fn db_fetch_all(ex: &dyn Executor, table: Table) -> RepositoryResult<Vec<Record>> {
    let sql = format!(
        "SELECT {} FROM {} ORDER BY rowid",
        table.select_list(),
        table.name()
    );
    decode_rows(table, ex.query(&sql, &[])?)
}

fn db_exists(ex: &dyn Executor, table: Table, column: Column, id: i64) -> RepositoryResult<bool> {
    table.ensure_owns(column)?;
    let sql = format!(
        "SELECT 1 FROM {} WHERE {} = ?1 LIMIT 1",
        table.name(),
        column.name()
    );
    Ok(!ex.query(&sql, &[Value::Integer(id)])?.is_empty())
}

fn db_find_by_value(
    ex: &dyn Executor,
    table: Table,
    column: Column,
    value: &Value,
) -> RepositoryResult<Vec<Record>> {
    table.ensure_owns(column)?;
    let sql = format!(
        "SELECT {} FROM {} WHERE {} = ?1 ORDER BY rowid",
        table.select_list(),
        table.name(),
        column.name()
    );
    decode_rows(table, ex.query(&sql, std::slice::from_ref(value))?)
}

fn db_find_values_by_key(
    ex: &dyn Executor,
    table: Table,
    key_column: Column,
    key_value: &Value,
    value_column: Column,
) -> RepositoryResult<Vec<Value>> {
    table.ensure_owns(key_column)?;
    table.ensure_owns(value_column)?;
    let sql = format!(
        "SELECT {} FROM {} WHERE {} = ?1 ORDER BY rowid",
        value_column.name(),
        table.name(),
        key_column.name()
    );
    Ok(ex
        .query(&sql, std::slice::from_ref(key_value))?
        .into_iter()
        .filter_map(|row| row.into_iter().next())
        .collect())
}

fn db_find_where_in(
    ex: &dyn Executor,
    table: Table,
    column: Column,
    values: &[Value],
) -> RepositoryResult<Vec<Record>> {
    table.ensure_owns(column)?;
    let first = values.first().ok_or(StorageError::EmptyValueSet {
        table: table.name(),
        column: column.name(),
    })?;

    // Every placeholder is bound with the type of the first element.
    let kind: ValueKind = first.kind();
    let bound = values
        .iter()
        .map(|v| {
            v.coerce(kind).ok_or_else(|| StorageError::Bind {
                column: column.name(),
                expected: kind,
                value: v.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = Vec::new();
    for chunk in bound.chunks(WHERE_IN_CHUNK) {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} IN ({}) ORDER BY rowid",
            table.select_list(),
            table.name(),
            column.name(),
            placeholders(chunk.len()).join(", ")
        );
        out.extend(decode_rows(table, ex.query(&sql, chunk)?)?);
    }
    Ok(out)
}

fn db_insert(ex: &dyn Executor, table: Table, fields: &Fields) -> RepositoryResult<i64> {
    let columns = table.insertable();
    let params = columns
        .iter()
        .map(|c| required(table, fields, *c))
        .collect::<RepositoryResult<Vec<_>>>()?;

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.name(),
        columns
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", "),
        placeholders(columns.len()).join(", ")
    );
    let done = ex
        .execute(&sql, &params)
        .map_err(|err| classify(table, err, RepositoryError::MissingReference { table }))?;
    Ok(done.last_insert_id)
}

fn db_update(ex: &dyn Executor, table: Table, fields: &Fields) -> RepositoryResult<i64> {
    let columns = table.mutable();
    if columns.is_empty() {
        return Err(RepositoryError::Unsupported {
            table,
            operation: "update",
        });
    }

    let key = table.primary_key()[0];
    let id = required(table, fields, key)?
        .as_integer()
        .ok_or_else(|| RepositoryError::InvalidKey {
            table,
            reason: format!("{key} must be an integer"),
        })?;

    let mut params = columns
        .iter()
        .map(|c| required(table, fields, *c))
        .collect::<RepositoryResult<Vec<_>>>()?;
    params.push(Value::Integer(id));

    let assignments = columns
        .iter()
        .zip(placeholders(columns.len()))
        .map(|(c, p)| format!("{} = {}", c.name(), p))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?{}",
        table.name(),
        assignments,
        key.name(),
        columns.len() + 1
    );

    // SQLite counts matched rows, so rewriting identical values still reports 1.
    let done = ex
        .execute(&sql, &params)
        .map_err(|err| classify(table, err, RepositoryError::MissingReference { table }))?;
    if done.rows_affected == 0 {
        return Err(RepositoryError::NotFound { table, id });
    }
    Ok(id)
}

fn db_delete(ex: &dyn Executor, table: Table, key: &Fields) -> RepositoryResult<usize> {
    let allowed = table.primary_key();
    if key.is_empty() || key.len() > allowed.len() {
        return Err(RepositoryError::InvalidKey {
            table,
            reason: format!("expected 1 to {} key fields, got {}", allowed.len(), key.len()),
        });
    }

    let mut conditions = Vec::with_capacity(key.len());
    let mut params = Vec::with_capacity(key.len());
    for (idx, (column, value)) in key.iter().enumerate() {
        if !allowed.contains(column) {
            return Err(RepositoryError::InvalidKey {
                table,
                reason: format!("{column} is not a key column"),
            });
        }
        conditions.push(format!("{} = ?{}", column.name(), idx + 1));
        params.push(column.bind(value)?);
    }

    let sql = format!(
        "DELETE FROM {} WHERE {}",
        table.name(),
        conditions.join(" AND ")
    );
    let done = ex
        .execute(&sql, &params)
        .map_err(|err| classify(table, err, RepositoryError::StillReferenced { table }))?;
    Ok(done.rows_affected)
}

#[derive(Clone)]
pub struct Repository<S: Store> {
    store: S,
}

impl<S: Store> Repository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Every row of `table`, in storage order.
    pub fn fetch_all(&self, table: Table) -> RepositoryResult<Vec<Record>> {
        db_fetch_all(&self.store, table)
    }

    pub fn exists(&self, table: Table, column: Column, id: i64) -> RepositoryResult<bool> {
        db_exists(&self.store, table, column, id)
    }

    /// Whole rows where `column` equals `value`, lowest rowid first.
    pub fn find_by_value(
        &self,
        table: Table,
        column: Column,
        value: &Value,
    ) -> RepositoryResult<Vec<Record>> {
        db_find_by_value(&self.store, table, column, value)
    }

    /// Project `value_column` from rows where `key_column` equals `key_value`.
    pub fn find_values_by_key(
        &self,
        table: Table,
        key_column: Column,
        key_value: &Value,
        value_column: Column,
    ) -> RepositoryResult<Vec<Value>> {
        db_find_values_by_key(&self.store, table, key_column, key_value, value_column)
    }

    /// Whole rows whose `column` is any of `values`. Rejects an empty set.
    pub fn find_where_in(
        &self,
        table: Table,
        column: Column,
        values: &[Value],
    ) -> RepositoryResult<Vec<Record>> {
        db_find_where_in(&self.store, table, column, values)
    }

    /// Insert the table's known columns from `fields`, returning the new row id.
    pub fn insert(&self, table: Table, fields: &Fields) -> RepositoryResult<i64> {
        db_insert(&self.store, table, fields)
    }

    /// Replace every mutable column of the row identified by its id field.
    ///
    /// Succeeds whenever the row exists, even if nothing changed.
    pub fn update(&self, table: Table, fields: &Fields) -> RepositoryResult<i64> {
        db_update(&self.store, table, fields)
    }

    /// Delete by a single key or by the full composite key.
    pub fn delete(&self, table: Table, key: &Fields) -> RepositoryResult<bool> {
        Ok(db_delete(&self.store, table, key)? > 0)
    }

    /// Delete a link or keyword together with every association mentioning it.
    pub fn delete_cascade(&self, table: Table, id: i64) -> RepositoryResult<bool> {
        if table == Table::LinksKeywords {
            return Err(RepositoryError::Unsupported {
                table,
                operation: "cascading delete",
            });
        }
        let key = Fields::new().with(table.primary_key()[0], id);

        self.store.transaction(|tx| -> RepositoryResult<bool> {
            let junction = Table::LinksKeywords;
            let mut detached = 0;
            if db_exists(tx, junction, table.primary_key()[0], id)? {
                detached = db_delete(tx, junction, &key)?;
            }
            let deleted = db_delete(tx, table, &key)?;
            if deleted > 0 {
                log::debug!("Deleted {} {} and {} associations", table, id, detached);
            }
            Ok(deleted > 0)
        })
    }

    pub fn links(&self) -> RepositoryResult<Vec<Link>> {
        Ok(self
            .fetch_all(Table::Links)?
            .into_iter()
            .filter_map(Record::into_link)
            .collect())
    }

    pub fn keywords(&self) -> RepositoryResult<Vec<Keyword>> {
        Ok(self
            .fetch_all(Table::Keywords)?
            .into_iter()
            .filter_map(Record::into_keyword)
            .collect())
    }

    pub fn associations(&self) -> RepositoryResult<Vec<Association>> {
        Ok(self
            .fetch_all(Table::LinksKeywords)?
            .into_iter()
            .filter_map(Record::into_association)
            .collect())
    }

    pub fn link(&self, id: i64) -> RepositoryResult<Option<Link>> {
        Ok(self
            .find_by_value(Table::Links, Column::LinkId, &Value::Integer(id))?
            .into_iter()
            .find_map(Record::into_link))
    }

    pub fn keyword(&self, id: i64) -> RepositoryResult<Option<Keyword>> {
        Ok(self
            .find_by_value(Table::Keywords, Column::KeywordId, &Value::Integer(id))?
            .into_iter()
            .find_map(Record::into_keyword))
    }
}
