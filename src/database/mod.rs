//! Database module
//!
//! ```text
//! database/
//! ├── core/       # Foundation
//! │   ├── connection  # Short-lived SQLite connection wrapper
//! │   └── schema      # Table/field descriptors, introspection types
//! ├── value       # Scalar values and ordered rows
//! └── gateway     # Scaffold, CRUD and reverse mapping over one file
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use skl::database::{connect, Database, Field, Row, Table};
//!
//! let users = Table::new(
//!     "Users",
//!     vec![Field::primary_key("Id")?, Field::text("Name", Some(100))?],
//! );
//! let db = Database::scaffolded("/tmp/app", vec![users])?;
//!
//! let index = db.get_table_index("Users").expect("scaffolded above");
//! let id = db.insert_one_tuple(index, &Row::new().with("Name", "Alice".to_string()))?;
//! let row = db.get_one_tuple(index, id)?;
//!
//! // Later, map the same file back into descriptors
//! let db = connect("/tmp/app/database.sqlite")?;
//! ```

pub mod core;
pub mod gateway;
pub mod value;

pub use core::{
    parse_declared_type, quote_identifier, ColumnInfo, DatabaseConn, Field, FieldType,
    SchemaStatus, Table,
};
pub use gateway::{connect, Database, DEFAULT_DB_FILE_NAME};
pub use value::{display_value, Row, Value};
