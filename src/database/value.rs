//! Scalar values and row mappings
//!
//! A [`Row`] is never stored as such: it is built fresh from each result set
//! and keeps its columns in table order.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A single SQLite scalar, as rusqlite hands it out
pub use rusqlite::types::Value;

/// Human-readable rendering of a value, used in messages and text output
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

/// Serialize a value as the plain JSON scalar
struct JsonValue<'a>(&'a Value);

impl Serialize for JsonValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Null => serializer.serialize_unit(),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Real(r) => serializer.serialize_f64(*r),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Blob(b) => serializer.serialize_bytes(b),
        }
    }
}

/// One record of a table, as an ordered column → value mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column value, builder style
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a column value, replacing any previous value for the same column
    ///
    /// New columns are appended, existing ones keep their position.
    pub fn insert(&mut self, column: &str, value: impl Into<Value>) -> Option<Value> {
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| name == column) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((column.to_string(), value));
                None
            }
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(name, _)| name == column)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            let column: String = column.into();
            row.insert(&column, value);
        }
        row
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (column, value) in &self.entries {
            map.serialize_entry(column, &JsonValue(value))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_keeps_insertion_order() {
        let row = Row::new()
            .with("Id", 1)
            .with("Name", "Alice".to_string())
            .with("Age", 30);

        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(columns, vec!["Id", "Name", "Age"]);
        assert_eq!(row.get("Name"), Some(&Value::Text("Alice".to_string())));
        assert_eq!(row.get("Missing"), None);
    }

    #[test]
    fn test_row_insert_replaces_in_place() {
        let mut row = Row::new()
            .with("Name", "Alice".to_string())
            .with("Age", 30);

        let old = row.insert("Name", "Bob".to_string());
        assert_eq!(old, Some(Value::Text("Alice".to_string())));

        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(columns, vec!["Name", "Age"]);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_row_remove() {
        let mut row = Row::new().with("Id", 1).with("Name", "Alice".to_string());
        assert_eq!(row.remove("Id"), Some(Value::Integer(1)));
        assert_eq!(row.remove("Id"), None);
        assert_eq!(row, Row::new().with("Name", "Alice".to_string()));
    }

    #[test]
    fn test_row_serializes_in_column_order() {
        let row = Row::new()
            .with("b", 2)
            .with("a", "x".to_string())
            .with("c", Option::<i64>::None);

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"b":2,"a":"x","c":null}"#);
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&Value::Null), "NULL");
        assert_eq!(display_value(&Value::Integer(7)), "7");
        assert_eq!(display_value(&Value::Text("abc".to_string())), "abc");
        assert_eq!(display_value(&Value::Blob(vec![1, 2, 3])), "<3 bytes>");
    }

    #[test]
    fn test_value_sql_roundtrip() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let values = vec![
            Value::Null,
            Value::Integer(-4),
            Value::Real(1.5),
            Value::Text("héllo".to_string()),
            Value::Blob(vec![0, 1, 2]),
        ];

        for value in values {
            let back: Value = conn
                .query_row("SELECT ?1", [&value], |row| row.get(0))
                .unwrap();
            assert_eq!(back, value);
        }
    }
}
