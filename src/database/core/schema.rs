//! Table and field descriptors
//!
//! This module holds the schema model: [`Field`] and [`Table`] describe the
//! columns and tables a [`Database`](crate::database::Database) scaffolds, and
//! [`ColumnInfo`] is what the engine reports back when a table is introspected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SklError};

/// Column types supported by the schema model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    Integer,
    Text,
}

impl FieldType {
    /// Whether a maximum length may be declared for this type
    pub fn supports_length(&self) -> bool {
        matches!(self, FieldType::Text)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Integer => write!(f, "INTEGER"),
            FieldType::Text => write!(f, "TEXT"),
        }
    }
}

impl FromStr for FieldType {
    type Err = SklError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "INTEGER" => Ok(FieldType::Integer),
            "TEXT" => Ok(FieldType::Text),
            other => Err(SklError::InvalidFieldSpec(format!(
                "unsupported field type '{}', expected INTEGER or TEXT",
                other
            ))),
        }
    }
}

/// A column definition inside a [`Table`]
///
/// Fields are validated on construction and immutable afterwards. Primary
/// key fields are created as auto-incrementing keys; every other field is
/// `NOT NULL`, there is no nullable column support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawField")]
pub struct Field {
    name: String,
    field_type: FieldType,
    max_length: Option<u32>,
    is_primary_key: bool,
}

#[derive(Deserialize)]
struct RawField {
    name: String,
    field_type: FieldType,
    #[serde(default)]
    max_length: Option<u32>,
    #[serde(default)]
    is_primary_key: bool,
}

impl TryFrom<RawField> for Field {
    type Error = SklError;

    fn try_from(raw: RawField) -> Result<Self> {
        Field::new(&raw.name, raw.field_type, raw.max_length, raw.is_primary_key)
    }
}

impl Field {
    /// Create a new field
    ///
    /// Fails with [`SklError::InvalidFieldSpec`] when the name is empty, when
    /// `max_length` is zero, or when a length is given for a type without
    /// length bounds.
    pub fn new(
        name: &str,
        field_type: FieldType,
        max_length: Option<u32>,
        is_primary_key: bool,
    ) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(SklError::InvalidFieldSpec(
                "field name must not be empty".to_string(),
            ));
        }

        if let Some(len) = max_length {
            if !field_type.supports_length() {
                return Err(SklError::InvalidFieldSpec(format!(
                    "field '{}' of type {} does not take a max length",
                    name, field_type
                )));
            }
            if len == 0 {
                return Err(SklError::InvalidFieldSpec(format!(
                    "field '{}' max length must be positive",
                    name
                )));
            }
        }

        Ok(Field {
            name: name.to_string(),
            field_type,
            max_length,
            is_primary_key,
        })
    }

    /// Create a field from a type name such as `"INTEGER"` or `"text"`
    pub fn parse(
        name: &str,
        field_type: &str,
        max_length: Option<u32>,
        is_primary_key: bool,
    ) -> Result<Self> {
        Self::new(name, field_type.parse()?, max_length, is_primary_key)
    }

    /// Auto-incrementing integer primary key
    pub fn primary_key(name: &str) -> Result<Self> {
        Self::new(name, FieldType::Integer, None, true)
    }

    pub fn integer(name: &str) -> Result<Self> {
        Self::new(name, FieldType::Integer, None, false)
    }

    pub fn text(name: &str, max_length: Option<u32>) -> Result<Self> {
        Self::new(name, FieldType::Text, max_length, false)
    }

    /// Rebuild a field from the engine's description of a column
    pub fn from_column(column: &ColumnInfo) -> Result<Self> {
        let (field_type, max_length) = parse_declared_type(&column.declared_type)?;
        Self::new(&column.name, field_type, max_length, column.is_primary_key())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn max_length(&self) -> Option<u32> {
        self.max_length
    }

    pub fn is_primary_key(&self) -> bool {
        self.is_primary_key
    }

    /// Render the column definition, e.g. `Name TEXT(100) NOT NULL`
    pub fn render(&self) -> String {
        self.render_named(&self.name)
    }

    /// Render the column definition with the name quoted for use in DDL
    pub(crate) fn render_quoted(&self) -> String {
        self.render_named(&quote_identifier(&self.name))
    }

    fn render_named(&self, name: &str) -> String {
        let length = self
            .max_length
            .map(|len| format!("({})", len))
            .unwrap_or_default();
        let constraint = if self.is_primary_key {
            "PRIMARY KEY AUTOINCREMENT"
        } else {
            "NOT NULL"
        };
        format!("{} {}{} {}", name, self.field_type, length, constraint)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// A table descriptor: a name and its fields in column order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub table_name: String,
    pub fields: Vec<Field>,
}

impl Table {
    pub fn new(table_name: &str, fields: Vec<Field>) -> Self {
        Self {
            table_name: table_name.to_string(),
            fields,
        }
    }

    /// Field names in declared order
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name().to_string()).collect()
    }

    /// The first field marked as primary key, if any
    pub fn primary_key(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.is_primary_key())
    }

    /// `CREATE TABLE` statement for this table
    pub fn create_statement(&self) -> Result<String> {
        if self.fields.is_empty() {
            return Err(SklError::EmptyTable(self.table_name.clone()));
        }

        let columns = self
            .fields
            .iter()
            .map(Field::render_quoted)
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(
            "CREATE TABLE {} ({});",
            quote_identifier(&self.table_name),
            columns
        ))
    }
}

/// Column metadata as reported by `pragma_table_info`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub cid: i64,
    pub name: String,
    pub declared_type: String,
    /// 1-based position within the primary key, 0 when not part of it
    pub pk: i64,
}

impl ColumnInfo {
    pub fn is_primary_key(&self) -> bool {
        self.pk > 0
    }
}

/// Name of the primary key column among introspected columns
pub fn primary_key_column(columns: &[ColumnInfo]) -> Option<&str> {
    columns
        .iter()
        .filter(|c| c.is_primary_key())
        .min_by_key(|c| c.pk)
        .map(|c| c.name.as_str())
}

/// Split a declared column type into its kind and optional length
///
/// Accepts `INTEGER`, `TEXT(100)` and the spaced form `TEXT (100)`.
pub fn parse_declared_type(declared: &str) -> Result<(FieldType, Option<u32>)> {
    let declared = declared.trim();

    let Some(open) = declared.find('(') else {
        return Ok((declared.parse()?, None));
    };

    let invalid = || {
        SklError::InvalidFieldSpec(format!("cannot parse declared type '{}'", declared))
    };

    let field_type: FieldType = declared[..open].parse()?;
    let length = declared[open + 1..]
        .strip_suffix(')')
        .ok_or_else(invalid)?
        .trim()
        .parse::<u32>()
        .map_err(|_| invalid())?;

    Ok((field_type, Some(length)))
}

/// Quote an SQL identifier, doubling any embedded quote
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Status of the backing file relative to the in-memory table list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStatus {
    /// The database file does not exist yet
    NotInitialized,

    /// Every table in the table list exists in the file
    Current,

    /// Some tables of the table list are absent from the file
    Partial { missing: Vec<String> },
}
