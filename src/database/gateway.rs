//! Database gateway
//!
//! [`Database`] mediates all access to the backing SQLite file. It holds the
//! table descriptors and the file path, never a connection: each operation
//! opens a connection, performs one unit of work, commits or rolls back, and
//! closes it again.
//!
//! Tables are addressed by their position in the table list. Row values are
//! always bound as statement parameters; table and column names are quoted
//! identifiers.

use std::path::{Path, PathBuf};

use rusqlite::{params_from_iter, OptionalExtension};
use tracing::{debug, info, warn};

use crate::config::SklConfig;
use crate::database::core::{
    primary_key_column, quote_identifier, ColumnInfo, DatabaseConn, Field, SchemaStatus, Table,
};
use crate::database::value::{display_value, Row, Value};
use crate::error::{Result, SklError};

/// File name used when a gateway is built from a directory
pub const DEFAULT_DB_FILE_NAME: &str = "database.sqlite";

/// Gateway over a single SQLite database file
#[derive(Debug, Clone, PartialEq)]
pub struct Database {
    table_list: Vec<Table>,
    db_path: PathBuf,
}

impl Database {
    /// Describe a database file named `database.sqlite` inside `dir`
    ///
    /// Nothing is written until [`scaffold`](Self::scaffold) is called.
    pub fn new(dir: impl AsRef<Path>, tables: Vec<Table>) -> Self {
        Self::at_path(dir.as_ref().join(DEFAULT_DB_FILE_NAME), tables)
    }

    /// Describe a database at an exact file path
    pub fn at_path(db_path: impl Into<PathBuf>, tables: Vec<Table>) -> Self {
        Database {
            table_list: tables,
            db_path: db_path.into(),
        }
    }

    /// Describe the database file named by the configuration
    pub fn from_config(config: &SklConfig, tables: Vec<Table>) -> Self {
        Self::at_path(config.sqlite_path(), tables)
    }

    /// Same as [`new`](Self::new), then scaffold every table right away
    pub fn scaffolded(dir: impl AsRef<Path>, tables: Vec<Table>) -> Result<Self> {
        let db = Self::new(dir, tables);
        db.scaffold()?;
        Ok(db)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn tables(&self) -> &[Table] {
        &self.table_list
    }

    /// Table descriptor at `index`
    pub fn table(&self, index: usize) -> Result<&Table> {
        self.table_list.get(index).ok_or(SklError::IndexOutOfRange {
            index,
            len: self.table_list.len(),
        })
    }

    /// Append a table descriptor; the file is untouched until the next scaffold
    pub fn insert_table(&mut self, table: Table) {
        self.table_list.push(table);
    }

    /// Remove a table descriptor from the table list
    ///
    /// This only changes the in-memory list: the table stays in the database
    /// file. Use [`drop_table_by_index`](Self::drop_table_by_index) to remove
    /// it from the file as well.
    pub fn remove_table_by_index(&mut self, index: usize) -> Result<Table> {
        self.table(index)?;
        Ok(self.table_list.remove(index))
    }

    /// Drop a table from the database file and remove its descriptor
    pub fn drop_table_by_index(&mut self, index: usize) -> Result<Table> {
        let table_name = self.table(index)?.table_name.clone();

        let db = DatabaseConn::open_existing(&self.db_path)?;
        if !db.table_exists(&table_name)? {
            return Err(SklError::TableNotFound(table_name));
        }
        let tx = db.transaction()?;
        db.execute(&format!("DROP TABLE {};", quote_identifier(&table_name)))?;
        tx.commit()?;
        info!("Dropped table {}", table_name);

        Ok(self.table_list.remove(index))
    }

    /// Position of the first table named exactly `table_name`
    pub fn get_table_index(&self, table_name: &str) -> Option<usize> {
        self.table_list
            .iter()
            .position(|t| t.table_name == table_name)
    }

    /// Field names of the table at `index`, in declared order
    pub fn get_table_fieldnames(&self, index: usize) -> Result<Vec<String>> {
        Ok(self.table(index)?.field_names())
    }

    /// Create the database file and every table of the table list
    ///
    /// Each table is created in its own unit of work: when a table fails,
    /// the tables before it stay created and the ones after it are not
    /// attempted.
    pub fn scaffold(&self) -> Result<()> {
        if self.table_list.is_empty() {
            return Err(SklError::ZeroTables);
        }

        for table in &self.table_list {
            self.scaffold_table(table)?;
        }

        info!(
            "Scaffolded {} tables in {}",
            self.table_list.len(),
            self.db_path.display()
        );
        Ok(())
    }

    fn scaffold_table(&self, table: &Table) -> Result<()> {
        let sql = table.create_statement()?;

        let db = DatabaseConn::open_or_create(&self.db_path)?;
        if db.table_exists(&table.table_name)? {
            return Err(SklError::DuplicateTable(table.table_name.clone()));
        }

        let tx = db.transaction()?;
        db.execute(&sql)?;
        tx.commit()?;
        Ok(())
    }

    /// Insert one row and return its rowid
    ///
    /// Columns not present in `row` take no value, so every `NOT NULL`
    /// column other than the primary key must be supplied.
    pub fn insert_one_tuple(&self, index: usize, row: &Row) -> Result<i64> {
        let table_name = &self.table(index)?.table_name;

        let sql = if row.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES;", quote_identifier(table_name))
        } else {
            let columns = row
                .columns()
                .map(quote_identifier)
                .collect::<Vec<_>>()
                .join(", ");
            let placeholders = (1..=row.len())
                .map(|i| format!("?{}", i))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "INSERT INTO {} ({}) VALUES ({});",
                quote_identifier(table_name),
                columns,
                placeholders
            )
        };

        self.in_transaction(table_name, "insert into", |db| {
            if !db.table_exists(table_name)? {
                return Err(SklError::TableNotFound(table_name.clone()));
            }
            debug!("{}", sql);
            db.conn.execute(&sql, params_from_iter(row.values()))?;
            Ok(db.conn.last_insert_rowid())
        })
    }

    /// Fetch the row whose primary key equals `key`
    pub fn get_one_tuple(&self, index: usize, key: impl Into<Value>) -> Result<Row> {
        let table_name = &self.table(index)?.table_name;
        let key = key.into();

        let db = DatabaseConn::open_existing(&self.db_path)?;
        let columns = Self::live_columns(&db, table_name)?;
        let pk = Self::live_primary_key(&columns, table_name)?;

        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1;",
            Self::column_list(&columns),
            quote_identifier(table_name),
            quote_identifier(pk)
        );
        debug!("{}", sql);

        db.conn
            .query_row(&sql, [&key], |row| Self::read_row(&columns, row))
            .optional()?
            .ok_or_else(|| SklError::RowNotFound {
                table: table_name.clone(),
                key: display_value(&key),
            })
    }

    /// Fetch every row of a table, in the engine's result order
    pub fn get_all_tuples(&self, index: usize) -> Result<Vec<Row>> {
        let table_name = &self.table(index)?.table_name;

        let db = DatabaseConn::open_existing(&self.db_path)?;
        let columns = Self::live_columns(&db, table_name)?;

        let sql = format!(
            "SELECT {} FROM {};",
            Self::column_list(&columns),
            quote_identifier(table_name)
        );
        debug!("{}", sql);

        let mut stmt = db.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| Self::read_row(&columns, row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Change the given columns of the row whose primary key equals `key`
    ///
    /// One `UPDATE` statement is issued per column, all committed together.
    /// The primary key column, when present in `new_values`, is written last
    /// so the other statements still find the row under its old key.
    /// Returns the number of rows matched by the key.
    pub fn update_one_tuple(
        &self,
        index: usize,
        key: impl Into<Value>,
        new_values: &Row,
    ) -> Result<usize> {
        let table_name = &self.table(index)?.table_name;
        let key = key.into();

        self.in_transaction(table_name, "update", |db| {
            let columns = Self::live_columns(db, table_name)?;
            let pk = Self::live_primary_key(&columns, table_name)?;

            let (key_updates, other_updates): (Vec<_>, Vec<_>) = new_values
                .iter()
                .partition(|(column, _)| column.eq_ignore_ascii_case(pk));

            let mut matched = 0;
            for (column, value) in other_updates.into_iter().chain(key_updates) {
                let sql = format!(
                    "UPDATE {} SET {} = ?1 WHERE {} = ?2;",
                    quote_identifier(table_name),
                    quote_identifier(column),
                    quote_identifier(pk)
                );
                debug!("{}", sql);
                let changed = db.conn.execute(&sql, [value, &key])?;
                matched = matched.max(changed);
            }
            Ok(matched)
        })
    }

    /// Delete the row whose primary key equals `key`, returning rows deleted
    pub fn delete_one_tuple(&self, index: usize, key: impl Into<Value>) -> Result<usize> {
        let table_name = &self.table(index)?.table_name;
        let key = key.into();

        self.in_transaction(table_name, "delete from", |db| {
            let columns = Self::live_columns(db, table_name)?;
            let pk = Self::live_primary_key(&columns, table_name)?;

            let sql = format!(
                "DELETE FROM {} WHERE {} = ?1;",
                quote_identifier(table_name),
                quote_identifier(pk)
            );
            debug!("{}", sql);
            Ok(db.conn.execute(&sql, [&key])?)
        })
    }

    /// Number of rows in the table at `index`
    pub fn table_count(&self, index: usize) -> Result<u64> {
        let table_name = &self.table(index)?.table_name;
        let db = DatabaseConn::open_existing(&self.db_path)?;
        if !db.table_exists(table_name)? {
            return Err(SklError::TableNotFound(table_name.clone()));
        }
        db.table_count(table_name)
    }

    /// Compare the table list against the tables present in the file
    pub fn schema_status(&self) -> Result<SchemaStatus> {
        if !self.db_path.is_file() {
            return Ok(SchemaStatus::NotInitialized);
        }

        let existing = DatabaseConn::open_existing(&self.db_path)?.list_tables()?;
        let missing: Vec<String> = self
            .table_list
            .iter()
            .filter(|t| !existing.contains(&t.table_name))
            .map(|t| t.table_name.clone())
            .collect();

        if missing.is_empty() {
            Ok(SchemaStatus::Current)
        } else {
            Ok(SchemaStatus::Partial { missing })
        }
    }

    /// Run `work` inside a transaction on a fresh connection
    ///
    /// Commits on success. On failure the transaction is rolled back, a
    /// warning is logged, and the error is returned.
    fn in_transaction<T>(
        &self,
        table_name: &str,
        action: &str,
        work: impl FnOnce(&DatabaseConn) -> Result<T>,
    ) -> Result<T> {
        let db = DatabaseConn::open_existing(&self.db_path)?;
        let tx = db.transaction()?;

        let result = work(&db).and_then(|value| {
            tx.commit()?;
            Ok(value)
        });

        if let Err(e) = &result {
            warn!("Failed to {} {}: {}", action, table_name, e);
        }
        result
    }

    fn live_columns(db: &DatabaseConn, table_name: &str) -> Result<Vec<ColumnInfo>> {
        let columns = db.table_info(table_name)?;
        if columns.is_empty() {
            return Err(SklError::TableNotFound(table_name.to_string()));
        }
        Ok(columns)
    }

    fn live_primary_key<'c>(columns: &'c [ColumnInfo], table_name: &str) -> Result<&'c str> {
        primary_key_column(columns).ok_or_else(|| SklError::NoPrimaryKey(table_name.to_string()))
    }

    fn column_list(columns: &[ColumnInfo]) -> String {
        columns
            .iter()
            .map(|c| quote_identifier(&c.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn read_row(columns: &[ColumnInfo], row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
        let mut out = Row::new();
        for (i, column) in columns.iter().enumerate() {
            out.insert(&column.name, row.get::<_, Value>(i)?);
        }
        Ok(out)
    }
}

/// Map an existing database file back into a [`Database`]
///
/// Every user table becomes a [`Table`] whose fields are rebuilt from the
/// engine's column metadata. The gateway keeps `db_path` exactly as given.
pub fn connect(db_path: impl AsRef<Path>) -> Result<Database> {
    let db_path = db_path.as_ref();
    let db = DatabaseConn::open_existing(db_path)?;

    let mut tables = Vec::new();
    for table_name in db.list_tables()? {
        let fields = db
            .table_info(&table_name)?
            .iter()
            .map(Field::from_column)
            .collect::<Result<Vec<_>>>()?;
        tables.push(Table::new(&table_name, fields));
    }

    info!(
        "Connected to {} with {} tables",
        db_path.display(),
        tables.len()
    );
    Ok(Database::at_path(db_path, tables))
}
