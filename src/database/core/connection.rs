//! Database connection management
//!
//! Every gateway operation opens its own [`DatabaseConn`], performs one unit
//! of work, and drops the connection before returning.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::database::core::schema::{quote_identifier, ColumnInfo};
use crate::error::{Result, SklError};

/// Core database connection wrapper
///
/// `DatabaseConn` is a thin wrapper around a SQLite connection with the
/// introspection queries the gateway needs.
pub struct DatabaseConn {
    pub conn: Connection,
}

impl DatabaseConn {
    /// Open a database file, creating it when absent
    pub fn open_or_create(path: &Path) -> Result<Self> {
        debug!("opening (or creating) database at {}", path.display());
        let db = DatabaseConn {
            conn: Connection::open(path)?,
        };
        db.configure()?;
        Ok(db)
    }

    /// Open an existing database file
    ///
    /// Fails with [`SklError::DatabaseNotFound`] instead of creating a new
    /// empty file.
    pub fn open_existing(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SklError::DatabaseNotFound {
                path: path.display().to_string(),
            });
        }

        debug!("opening database at {}", path.display());
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let db = DatabaseConn {
            conn: Connection::open_with_flags(path, flags)?,
        };
        db.configure()?;
        Ok(db)
    }

    /// Create an in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let db = DatabaseConn {
            conn: Connection::open_in_memory()?,
        };
        db.configure()?;
        Ok(db)
    }

    fn configure(&self) -> Result<()> {
        self.conn.execute("PRAGMA foreign_keys=ON", [])?;
        Ok(())
    }

    /// Execute a SQL statement without parameters
    pub fn execute(&self, sql: &str) -> Result<usize> {
        debug!("{}", sql);
        Ok(self.conn.execute(sql, [])?)
    }

    /// Begin an unchecked transaction
    ///
    /// Dropping the transaction without committing rolls it back.
    pub fn transaction(&self) -> Result<rusqlite::Transaction<'_>> {
        Ok(self.conn.unchecked_transaction()?)
    }

    /// Check if a table exists in the database
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table_name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Names of all user tables in creation order
    ///
    /// Engine-internal tables (`sqlite_sequence` and friends) are skipped.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type='table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\'
             ORDER BY rowid",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Column metadata of a table, in column order
    pub fn table_info(&self, table_name: &str) -> Result<Vec<ColumnInfo>> {
        let mut stmt = self
            .conn
            .prepare("SELECT cid, name, type, pk FROM pragma_table_info(?1) ORDER BY cid")?;
        let columns = stmt
            .query_map([table_name], |row| {
                Ok(ColumnInfo {
                    cid: row.get(0)?,
                    name: row.get(1)?,
                    declared_type: row.get(2)?,
                    pk: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(columns)
    }

    /// Get the row count for a table
    pub fn table_count(&self, table_name: &str) -> Result<u64> {
        let query = format!("SELECT COUNT(*) FROM {}", quote_identifier(table_name));
        let count: i64 = self.conn.query_row(&query, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = DatabaseConn::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_open_existing_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nothing.sqlite");

        let result = DatabaseConn::open_existing(&path);
        assert!(matches!(result, Err(SklError::DatabaseNotFound { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_open_or_create_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.sqlite");

        let db = DatabaseConn::open_or_create(&path).unwrap();
        db.execute("CREATE TABLE t (id INTEGER PRIMARY KEY)").unwrap();
        drop(db);

        assert!(path.exists());
        assert!(DatabaseConn::open_existing(&path).is_ok());
    }

    #[test]
    fn test_table_exists() {
        let db = DatabaseConn::open_in_memory().unwrap();
        db.execute("CREATE TABLE test_table (id INTEGER PRIMARY KEY)")
            .unwrap();

        assert!(db.table_exists("test_table").unwrap());
        assert!(!db.table_exists("nonexistent_table").unwrap());
    }

    #[test]
    fn test_list_tables_skips_internal() {
        let db = DatabaseConn::open_in_memory().unwrap();
        db.execute("CREATE TABLE b (id INTEGER PRIMARY KEY AUTOINCREMENT)")
            .unwrap();
        db.execute("CREATE TABLE a (id INTEGER PRIMARY KEY)").unwrap();

        assert_eq!(db.list_tables().unwrap(), vec!["b", "a"]);
    }

    #[test]
    fn test_table_info() {
        let db = DatabaseConn::open_in_memory().unwrap();
        db.execute(
            "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT(100) NOT NULL)",
        )
        .unwrap();

        let columns = db.table_info("users").unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].name, "id");
        assert!(columns[0].is_primary_key());
        assert_eq!(columns[1].name, "name");
        assert_eq!(columns[1].declared_type, "TEXT(100)");
        assert!(!columns[1].is_primary_key());

        assert!(db.table_info("missing").unwrap().is_empty());
    }

    #[test]
    fn test_table_count() {
        let db = DatabaseConn::open_in_memory().unwrap();
        db.execute("CREATE TABLE test_table (id INTEGER PRIMARY KEY)")
            .unwrap();
        db.execute("INSERT INTO test_table (id) VALUES (1), (2), (3)")
            .unwrap();

        assert_eq!(db.table_count("test_table").unwrap(), 3);
    }
}
