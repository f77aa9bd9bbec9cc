//! Error types for the skl library
//!
//! Errors fall into two tiers:
//!
//! - **structural**: the request itself is wrong (no tables to scaffold, a
//!   missing database file, a bad table index, a malformed field). These are
//!   detected before any statement reaches the engine.
//! - **operational**: the state of the database file rejected the work
//!   (constraint violation, type mismatch, a table that already exists). The
//!   unit of work is rolled back before the error is returned.

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, SklError>;

/// Errors produced by the schema model and the database gateway
#[derive(Debug, Error)]
pub enum SklError {
    /// `scaffold` was called with an empty table list
    #[error("You need to create at least one table to scaffold your Database")]
    ZeroTables,

    /// No database file exists at the given path
    #[error("The file path '{path}' does not match an existing sqlite database file")]
    DatabaseNotFound { path: String },

    /// A table index outside the table list
    #[error("Table index {index} is out of range (table list has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    /// A field definition that cannot be rendered to a column
    #[error("Invalid field definition: {0}")]
    InvalidFieldSpec(String),

    /// A table without fields cannot be created
    #[error("Table '{0}' has no fields")]
    EmptyTable(String),

    /// The table already exists in the database file
    #[error("Table '{0}' already exists")]
    DuplicateTable(String),

    /// The table is described in memory but absent from the database file
    #[error("Table '{0}' does not exist in the database file")]
    TableNotFound(String),

    /// Key-addressed operation on a table without a primary key column
    #[error("Table '{0}' has no primary key column")]
    NoPrimaryKey(String),

    /// No row matched the given primary key value
    #[error("No row in table '{table}' has primary key {key}")]
    RowNotFound { table: String, key: String },

    /// Any failure raised by the SQLite engine
    #[error("Database engine error: {0}")]
    Engine(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SklError {
    /// Whether the error was detected before any statement reached the engine
    pub fn is_structural(&self) -> bool {
        !self.is_operational()
    }

    /// Whether the error was raised by the file's state during a unit of work
    pub fn is_operational(&self) -> bool {
        matches!(
            self,
            SklError::Engine(_) | SklError::Io(_) | SklError::DuplicateTable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_split() {
        assert!(SklError::ZeroTables.is_structural());
        assert!(SklError::IndexOutOfRange { index: 3, len: 1 }.is_structural());
        assert!(SklError::DatabaseNotFound {
            path: "missing.sqlite".to_string()
        }
        .is_structural());

        let engine = SklError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(engine.is_operational());
        assert!(!engine.is_structural());

        let duplicate = SklError::DuplicateTable("Users".to_string());
        assert!(duplicate.is_operational());
        assert!(!duplicate.is_structural());
    }

    #[test]
    fn test_messages() {
        let err = SklError::IndexOutOfRange { index: 5, len: 2 };
        assert_eq!(
            err.to_string(),
            "Table index 5 is out of range (table list has 2 entries)"
        );

        let err = SklError::RowNotFound {
            table: "Users".to_string(),
            key: "7".to_string(),
        };
        assert_eq!(err.to_string(), "No row in table 'Users' has primary key 7");
    }
}
