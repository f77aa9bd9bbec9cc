//! Core database infrastructure
//!
//! - `DatabaseConn`: short-lived SQLite connection wrapper with introspection helpers
//! - `schema`: table/field descriptors and schema status

mod connection;
mod schema;

pub use connection::DatabaseConn;
pub use schema::{
    parse_declared_type, primary_key_column, quote_identifier, ColumnInfo, Field, FieldType,
    SchemaStatus, Table,
};
