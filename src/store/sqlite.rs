// src/store/sqlite.rs
use std::path::Path;

use async_trait::async_trait;
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{RelationalStore, StoreResult};
use crate::model::{DataRow, Dataset, DiscoveredTable, Value};
use crate::sql::{Dialect, SqlDialect};

const USER_TABLES: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY rowid";

static NULL: Value = Value::Null;

/// Embedded SQLite store.
///
/// Holds one connection behind an async mutex, so a single store can be
/// shared between tasks.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a database file. The path `:memory:` opens a private in-memory
    /// database.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if path == Path::new(":memory:") {
            return Self::open_in_memory();
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened sqlite store");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an empty in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create `table` and insert `rows` into it.
    ///
    /// Columns are the union of the rows' keys in first-seen order. Each
    /// column's type affinity follows its first non-null value. An empty
    /// row set creates nothing.
    pub async fn load_table(&self, table: &str, rows: &[DataRow]) -> StoreResult<()> {
        let mut conn = self.conn.lock().await;
        load_rows(&mut conn, table, rows)
    }

    /// Drop every user table, then load each table of `dataset`.
    pub async fn reset_and_load(&self, dataset: &Dataset) -> StoreResult<()> {
        let mut conn = self.conn.lock().await;

        for table in user_tables(&conn)? {
            conn.execute(
                &format!("DROP TABLE IF EXISTS {}", Dialect::Sqlite.quote_identifier(&table)),
                [],
            )?;
        }

        for (table, rows) in dataset.tables() {
            load_rows(&mut conn, table, rows)?;
        }
        Ok(())
    }
}

#[async_trait]
impl RelationalStore for SqliteStore {
    async fn execute_query(&self, sql: &str) -> StoreResult<Vec<DataRow>> {
        if sql.trim().is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.conn.lock().await;
        query_rows(&conn, sql).map_err(|e| {
            warn!(sql, error = %e, "query failed");
            e.into()
        })
    }

    async fn discover_tables(&self) -> StoreResult<Vec<DiscoveredTable>> {
        let conn = self.conn.lock().await;

        let mut tables = Vec::new();
        for name in user_tables(&conn)? {
            let mut stmt = conn.prepare(&format!(
                "PRAGMA table_info({})",
                Dialect::Sqlite.quote_identifier(&name)
            ))?;
            let fields = stmt
                .query_map([], |row| row.get::<_, String>(1))?
                .collect::<Result<Vec<_>, _>>()?;
            tables.push(DiscoveredTable::new(name, fields));
        }

        debug!(count = tables.len(), "discovered tables");
        Ok(tables)
    }
}

fn user_tables(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(USER_TABLES)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

fn query_rows(conn: &Connection, sql: &str) -> rusqlite::Result<Vec<DataRow>> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut data = DataRow::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            data.insert(column.as_str(), from_value_ref(row.get_ref(i)?));
        }
        out.push(data);
    }
    Ok(out)
}

fn load_rows(conn: &mut Connection, table: &str, rows: &[DataRow]) -> StoreResult<()> {
    if rows.is_empty() {
        return Ok(());
    }

    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for column in row.columns() {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
    }

    let dialect = Dialect::Sqlite;
    let definitions = columns
        .iter()
        .map(|column| {
            let quoted = dialect.quote_identifier(column);
            match affinity(rows, column) {
                Some(kind) => format!("{} {}", quoted, kind),
                None => quoted,
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    let table_ident = dialect.quote_identifier(table);
    let placeholders = vec!["?"; columns.len()].join(", ");

    let tx = conn.transaction()?;
    tx.execute(&format!("CREATE TABLE {} ({})", table_ident, definitions), [])?;
    {
        let mut insert = tx.prepare(&format!(
            "INSERT INTO {} VALUES ({})",
            table_ident, placeholders
        ))?;
        for row in rows {
            insert.execute(params_from_iter(
                columns.iter().map(|column| row.get(column).unwrap_or(&NULL)),
            ))?;
        }
    }
    tx.commit()?;

    debug!(table, rows = rows.len(), columns = columns.len(), "loaded table");
    Ok(())
}

fn affinity(rows: &[DataRow], column: &str) -> Option<&'static str> {
    rows.iter()
        .filter_map(|row| row.get(column))
        .find(|value| !value.is_null())
        .map(|value| match value {
            Value::Integer(_) => "INTEGER",
            Value::Real(_) => "REAL",
            _ => "TEXT",
        })
}

fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Real(r) => ToSqlOutput::Borrowed(ValueRef::Real(*r)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}
