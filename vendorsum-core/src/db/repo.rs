//! Database repository layer
//!
//! Provides the read (query into a row set) and write (full table replace)
//! operations used by the pipeline.

use crate::error::{Error, Result};
use crate::types::{Table, Value};
use rusqlite::{params_from_iter, Connection};
use std::path::Path;

/// Upper bound on bound parameters per statement (SQLITE_MAX_VARIABLE_NUMBER default).
const MAX_BOUND_PARAMS: usize = 32_766;

/// Database handle owning a single SQLite connection.
///
/// The connection is closed when the handle is dropped.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA cache_size = -64000;  -- 64MB cache
            ",
        )?;

        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Get the underlying connection (for advanced use)
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    // ============================================
    // Reads
    // ============================================

    /// Run `sql` and collect the result into a row set.
    ///
    /// Column types are inferred from the returned values.
    pub fn query_table(&self, sql: &str) -> Result<Table> {
        let mut stmt = self.conn.prepare(sql)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let width = names.len();

        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|idx| row.get::<_, Value>(idx))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Table::with_inferred_types(names, rows)
    }

    /// Read every row of table `name`, in rowid order.
    pub fn read_table(&self, name: &str) -> Result<Table> {
        self.query_table(&format!(
            "SELECT * FROM {} ORDER BY rowid",
            quote_identifier(name)
        ))
    }

    /// Number of rows in table `name`
    pub fn count_rows(&self, name: &str) -> Result<i64> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_identifier(name)),
            [],
            |r| r.get(0),
        )?;
        Ok(count)
    }

    // ============================================
    // Writes
    // ============================================

    /// Replace table `name` with the contents of `table`.
    ///
    /// Drops any existing table, recreates it from the row set's column
    /// types and inserts the rows with multi-row statements of at most
    /// `batch_size` rows. Runs in one transaction: on failure the previous
    /// table is left untouched. Returns the number of rows written.
    pub fn replace_table(&mut self, name: &str, table: &Table, batch_size: usize) -> Result<usize> {
        if table.columns.is_empty() {
            return Err(Error::Schema(format!("row set for {} has no columns", name)));
        }
        if let Some(row) = table.rows.iter().find(|r| r.len() != table.columns.len()) {
            return Err(Error::Schema(format!(
                "row set for {} has a row of {} values, expected {}",
                name,
                row.len(),
                table.columns.len()
            )));
        }

        let ident = quote_identifier(name);
        let column_defs = table
            .columns
            .iter()
            .map(|c| format!("{} {}", quote_identifier(&c.name), c.column_type.as_sql()))
            .collect::<Vec<_>>()
            .join(", ");
        let column_list = table
            .columns
            .iter()
            .map(|c| quote_identifier(&c.name))
            .collect::<Vec<_>>()
            .join(", ");

        let width = table.columns.len();
        let rows_per_insert = batch_size.max(1).min((MAX_BOUND_PARAMS / width).max(1));

        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {ident}; CREATE TABLE {ident} ({column_defs});"
        ))?;

        for chunk in table.rows.chunks(rows_per_insert) {
            let sql = insert_statement(&ident, &column_list, width, chunk.len());
            let mut stmt = tx.prepare_cached(&sql)?;
            stmt.execute(params_from_iter(chunk.iter().flatten()))?;
        }

        tx.commit()?;

        tracing::debug!(
            table = name,
            rows = table.len(),
            rows_per_insert,
            "Replaced table"
        );
        Ok(table.len())
    }
}

/// Quote an SQL identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn insert_statement(ident: &str, column_list: &str, width: usize, rows: usize) -> String {
    let placeholders = format!("({})", vec!["?"; width].join(", "));
    let values = vec![placeholders.as_str(); rows].join(", ");
    format!("INSERT INTO {ident} ({column_list}) VALUES {values}")
}
