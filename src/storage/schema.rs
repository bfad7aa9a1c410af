//! Table provisioning and per-table version markers.
//!
//! Versions live in a small key-value settings table, one entry per managed
//! table, so a table is only (re)provisioned when its marker differs from the
//! version this build expects.

use super::{
    error::StorageResult,
    table::Table,
    traits::Executor,
    value::Value,
};

pub const SETTINGS_TABLE: &str = "letmehelp_settings";

/// Tables whose create statement was issued during [`ensure_schema`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub provisioned: Vec<Table>,
}

impl SchemaReport {
    pub fn is_noop(&self) -> bool {
        self.provisioned.is_empty()
    }
}

fn ensure_settings(ex: &dyn Executor) -> StorageResult<()> {
    ex.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS {SETTINGS_TABLE} (name TEXT PRIMARY KEY, value TEXT NOT NULL)"
        ),
        &[],
    )?;
    Ok(())
}

fn table_exists(ex: &dyn Executor, name: &str) -> StorageResult<bool> {
    let rows = ex.query(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        &[Value::from(name)],
    )?;
    Ok(!rows.is_empty())
}

/// Recorded version for `table`, if any.
pub fn stored_version(ex: &dyn Executor, table: Table) -> StorageResult<Option<String>> {
    if !table_exists(ex, SETTINGS_TABLE)? {
        return Ok(None);
    }
    let rows = ex.query(
        &format!("SELECT value FROM {SETTINGS_TABLE} WHERE name = ?1"),
        &[Value::from(table.version_key())],
    )?;
    Ok(rows
        .into_iter()
        .next()
        .and_then(|row| row.into_iter().next())
        .and_then(|v| v.as_text().map(str::to_string)))
}

fn record_version(ex: &dyn Executor, table: Table) -> StorageResult<()> {
    ex.execute(
        &format!(
            "INSERT INTO {SETTINGS_TABLE} (name, value) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value"
        ),
        &[Value::from(table.version_key()), Value::from(table.version())],
    )?;
    Ok(())
}

/// Create or upgrade each managed table whose stored version is stale.
///
/// Create statements are `IF NOT EXISTS`, so re-running them never touches
/// existing rows.
pub fn ensure_schema(ex: &dyn Executor) -> StorageResult<SchemaReport> {
    ensure_settings(ex)?;

    let mut report = SchemaReport::default();
    for table in Table::ALL {
        let exists = table_exists(ex, table.name())?;
        let current = stored_version(ex, table)?;
        if exists && current.as_deref() == Some(table.version()) {
            continue;
        }

        log::info!(
            "Provisioning table {}: {} -> {}",
            table,
            current.as_deref().unwrap_or("none"),
            table.version()
        );
        ex.execute(&table.create_sql(), &[])?;
        record_version(ex, table)?;
        report.provisioned.push(table);
    }
    Ok(report)
}

pub fn drop_all(ex: &dyn Executor) -> StorageResult<()> {
    for table in Table::DROP_ORDER {
        ex.execute(&format!("DROP TABLE IF EXISTS {}", table.name()), &[])?;
        log::info!("Dropped table {}", table);
    }
    Ok(())
}

pub fn clear_versions(ex: &dyn Executor) -> StorageResult<()> {
    if !table_exists(ex, SETTINGS_TABLE)? {
        return Ok(());
    }
    for table in Table::ALL {
        ex.execute(
            &format!("DELETE FROM {SETTINGS_TABLE} WHERE name = ?1"),
            &[Value::from(table.version_key())],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{traits::Store, SqliteStore};
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, SqliteStore) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::new(dir.path().join("schema.sqlite"));
        (dir, store)
    }

    #[test]
    fn first_run_provisions_every_table() {
        let (_dir, store) = temp_store();
        let report = store.init().unwrap();
        assert_eq!(report.provisioned, Table::ALL.to_vec());

        for table in Table::ALL {
            assert!(table_exists(&store, table.name()).unwrap());
            assert_eq!(
                stored_version(&store, table).unwrap().as_deref(),
                Some(table.version())
            );
        }
    }

    #[test]
    fn second_run_is_a_noop_and_keeps_rows() {
        let (_dir, store) = temp_store();
        store.init().unwrap();
        store
            .execute(
                &format!("INSERT INTO {} (keyword_text) VALUES (?1)", Table::Keywords),
                &[Value::from("billing")],
            )
            .unwrap();

        let report = store.init().unwrap();
        assert!(report.is_noop());

        let rows = store
            .query(&format!("SELECT keyword_text FROM {}", Table::Keywords), &[])
            .unwrap();
        assert_eq!(rows, vec![vec![Value::from("billing")]]);
    }

    #[test]
    fn stale_version_is_reprovisioned_without_data_loss() {
        let (_dir, store) = temp_store();
        store.init().unwrap();
        store
            .execute(
                &format!(
                    "INSERT INTO {} (link_url, link_label) VALUES (?1, ?2)",
                    Table::Links
                ),
                &[Value::from("https://x"), Value::from("X")],
            )
            .unwrap();
        store
            .execute(
                &format!("UPDATE {SETTINGS_TABLE} SET value = '0.9' WHERE name = ?1"),
                &[Value::from(Table::Links.version_key())],
            )
            .unwrap();

        let report = store.init().unwrap();
        assert_eq!(report.provisioned, vec![Table::Links]);
        assert_eq!(
            stored_version(&store, Table::Links).unwrap().as_deref(),
            Some("1.0")
        );
        let rows = store
            .query(&format!("SELECT link_label FROM {}", Table::Links), &[])
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn missing_table_with_recorded_version_is_recreated() {
        let (_dir, store) = temp_store();
        store.init().unwrap();
        store
            .execute(
                &format!("DROP TABLE {}", Table::LinksKeywords),
                &[],
            )
            .unwrap();

        let report = store.init().unwrap();
        assert_eq!(report.provisioned, vec![Table::LinksKeywords]);
    }

    #[test]
    fn clear_versions_forgets_markers() {
        let (_dir, store) = temp_store();
        store.init().unwrap();
        store
            .transaction(|tx| -> StorageResult<()> {
                drop_all(tx)?;
                clear_versions(tx)
            })
            .unwrap();

        for table in Table::ALL {
            assert_eq!(stored_version(&store, table).unwrap(), None);
            assert!(!table_exists(&store, table.name()).unwrap());
        }
    }

    #[test]
    fn clear_versions_without_settings_table_is_ok() {
        let (_dir, store) = temp_store();
        clear_versions(&store).unwrap();
    }
}
