#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! skl - table descriptors, scaffolding and CRUD over a single SQLite file
//!
//! skl lets a caller describe tables and fields declaratively, create the
//! backing database file from those descriptors, and read or write rows by
//! table index and primary-key value. An existing file can be mapped back
//! into descriptors with [`connect`].
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | `display` | Table formatting with `tabled` | `tabled` |
//! | `cli` | `skl` binary | All above + `clap`, `tracing-subscriber` |
//!
//! # Architecture
//!
//! - **[`database`]**: schema model, connection wrapper and the [`Database`] gateway
//! - **[`config`]**: configuration management
//! - **[`output`]**: rendering descriptors and rows as tables or JSON
//! - **[`error`]**: the [`SklError`] type shared by all of the above
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use skl::{connect, Database, Field, Row, Table};
//!
//! let users = Table::new(
//!     "Users",
//!     vec![
//!         Field::primary_key("Id")?,
//!         Field::text("Name", Some(100))?,
//!         Field::integer("Age")?,
//!     ],
//! );
//!
//! // Creates ./database.sqlite with the Users table
//! let db = Database::scaffolded(".", vec![users])?;
//! let users = db.get_table_index("Users").ok_or("no Users table")?;
//!
//! let id = db.insert_one_tuple(users, &Row::new().with("Name", "Alice".to_string()).with("Age", 30))?;
//! db.update_one_tuple(users, id, &Row::new().with("Age", 31))?;
//! println!("{:?}", db.get_one_tuple(users, id)?);
//!
//! // Mutators return typed results; `is_ok()` gives the plain success flag
//! let deleted = db.delete_one_tuple(users, id).is_ok();
//!
//! // Map the file back into descriptors
//! let db = connect("./database.sqlite")?;
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod output;

pub use config::SklConfig;
pub use error::{Result, SklError};

pub use database::{
    connect, ColumnInfo, Database, DatabaseConn, Field, FieldType, Row, SchemaStatus, Table,
    Value, DEFAULT_DB_FILE_NAME,
};

pub use output::OutputFormat;
