pub mod rows;
pub mod tables;

use skl::{connect, Database, SklConfig, Value};
use std::path::PathBuf;

/// Map the database file given on the command line, or the configured one
pub(crate) fn open_database(config: &SklConfig, db: &Option<PathBuf>) -> Option<Database> {
    let path = db.clone().unwrap_or_else(|| config.sqlite_path());
    match connect(&path) {
        Ok(db) => Some(db),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            None
        }
    }
}

/// Resolve a table name to its index, reporting unknown names
pub(crate) fn table_index(db: &Database, table: &str) -> Option<usize> {
    let index = db.get_table_index(table);
    if index.is_none() {
        eprintln!(
            "ERROR: table '{}' not found in {}",
            table,
            db.db_path().display()
        );
    }
    index
}

/// Primary key values that look like integers are bound as integers
pub(crate) fn parse_key(key: &str) -> Value {
    key.parse::<i64>()
        .map(Value::Integer)
        .unwrap_or_else(|_| Value::Text(key.to_string()))
}
