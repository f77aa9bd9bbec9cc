//! Output formatting for schema descriptors and rows
//!
//! Used by the `skl` binary; kept in the library so other callers can render
//! gateway results the same way.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::database::{display_value, Row, Table};

/// Unified output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Pretty table with borders (default)
    #[default]
    Table,
    /// Markdown table format
    Markdown,
    /// Compact JSON (single line)
    Json,
    /// Pretty-printed JSON with indentation
    JsonPretty,
    /// JSON Lines format (one JSON object per line)
    JsonLine,
    /// Pipe-separated values with header
    Psv,
}

impl OutputFormat {
    /// Check if this is a JSON variant
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty | Self::JsonLine)
    }

    /// Get a list of all format names for help text
    pub fn all_names() -> &'static [&'static str] {
        &[
            "table",
            "markdown",
            "json",
            "json-pretty",
            "json-line",
            "psv",
        ]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
            Self::JsonPretty => write!(f, "json-pretty"),
            Self::JsonLine => write!(f, "json-line"),
            Self::Psv => write!(f, "psv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "pretty" => Ok(Self::Table),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "json-pretty" | "jsonpretty" => Ok(Self::JsonPretty),
            "json-line" | "jsonline" | "jsonl" | "ndjson" => Ok(Self::JsonLine),
            "psv" | "pipe" => Ok(Self::Psv),
            _ => Err(format!(
                "Unknown output format '{}'. Valid formats: {}",
                s,
                Self::all_names().join(", ")
            )),
        }
    }
}

/// One field of one table, flattened for tabular display
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct FieldEntry {
    pub table: String,
    pub field: String,
    #[cfg_attr(feature = "display", tabled(rename = "type"))]
    pub field_type: String,
    pub max_length: String,
    pub primary_key: bool,
}

impl FieldEntry {
    pub fn from_tables(tables: &[Table]) -> Vec<FieldEntry> {
        tables
            .iter()
            .flat_map(|t| {
                t.fields.iter().map(|f| FieldEntry {
                    table: t.table_name.clone(),
                    field: f.name().to_string(),
                    field_type: f.field_type().to_string(),
                    max_length: f.max_length().map(|l| l.to_string()).unwrap_or_default(),
                    primary_key: f.is_primary_key(),
                })
            })
            .collect()
    }
}

/// Render table descriptors
pub fn format_tables(tables: &[Table], format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string(tables),
        OutputFormat::JsonPretty => serde_json::to_string_pretty(tables),
        OutputFormat::JsonLine => json_lines(tables),
        OutputFormat::Psv => Ok(entries_psv(&FieldEntry::from_tables(tables))),
        #[cfg(feature = "display")]
        OutputFormat::Table | OutputFormat::Markdown => {
            use tabled::settings::Style;
            let mut table = tabled::Table::new(FieldEntry::from_tables(tables));
            if format == OutputFormat::Markdown {
                table.with(Style::markdown());
            } else {
                table.with(Style::rounded());
            }
            Ok(table.to_string())
        }
        #[cfg(not(feature = "display"))]
        OutputFormat::Table | OutputFormat::Markdown => {
            Ok(entries_psv(&FieldEntry::from_tables(tables)))
        }
    }
}

/// Render rows; column headers are taken from the first row
pub fn format_rows(rows: &[Row], format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string(rows),
        OutputFormat::JsonPretty => serde_json::to_string_pretty(rows),
        OutputFormat::JsonLine => json_lines(rows),
        OutputFormat::Psv => Ok(rows_psv(rows)),
        #[cfg(feature = "display")]
        OutputFormat::Table | OutputFormat::Markdown => {
            use tabled::builder::Builder;
            use tabled::settings::Style;

            let mut builder = Builder::default();
            if let Some(first) = rows.first() {
                builder.push_record(first.columns().map(|c| c.to_string()));
            }
            for row in rows {
                builder.push_record(row.values().map(display_value));
            }
            let mut table = builder.build();
            if format == OutputFormat::Markdown {
                table.with(Style::markdown());
            } else {
                table.with(Style::rounded());
            }
            Ok(table.to_string())
        }
        #[cfg(not(feature = "display"))]
        OutputFormat::Table | OutputFormat::Markdown => Ok(rows_psv(rows)),
    }
}

fn json_lines<T: Serialize>(items: &[T]) -> serde_json::Result<String> {
    let lines = items
        .iter()
        .map(serde_json::to_string)
        .collect::<serde_json::Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

fn rows_psv(rows: &[Row]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    if let Some(first) = rows.first() {
        lines.push(first.columns().collect::<Vec<_>>().join("|"));
    }
    for row in rows {
        lines.push(
            row.values()
                .map(display_value)
                .collect::<Vec<_>>()
                .join("|"),
        );
    }
    lines.join("\n")
}

fn entries_psv(entries: &[FieldEntry]) -> String {
    let mut lines = vec!["table|field|type|max_length|primary_key".to_string()];
    for e in entries {
        lines.push(format!(
            "{}|{}|{}|{}|{}",
            e.table, e.field, e.field_type, e.max_length, e.primary_key
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Field;

    fn rows() -> Vec<Row> {
        vec![
            Row::new().with("Id", 1).with("Name", "Alice".to_string()),
            Row::new().with("Id", 2).with("Name", "Bob".to_string()),
        ]
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(
            OutputFormat::from_str("table").unwrap(),
            OutputFormat::Table
        );
        assert_eq!(
            OutputFormat::from_str("md").unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!(
            OutputFormat::from_str("jsonl").unwrap(),
            OutputFormat::JsonLine
        );
        assert_eq!(OutputFormat::from_str("pipe").unwrap(), OutputFormat::Psv);
        assert!(OutputFormat::from_str("xml").is_err());
    }

    #[test]
    fn test_output_format_display_roundtrip() {
        for name in OutputFormat::all_names() {
            let format = OutputFormat::from_str(name).unwrap();
            assert_eq!(&format.to_string(), name);
        }
    }

    #[test]
    fn test_rows_json_line() {
        let out = format_rows(&rows(), OutputFormat::JsonLine).unwrap();
        assert_eq!(
            out,
            "{\"Id\":1,\"Name\":\"Alice\"}\n{\"Id\":2,\"Name\":\"Bob\"}"
        );
    }

    #[test]
    fn test_rows_psv() {
        let out = format_rows(&rows(), OutputFormat::Psv).unwrap();
        assert_eq!(out, "Id|Name\n1|Alice\n2|Bob");
        assert_eq!(format_rows(&[], OutputFormat::Psv).unwrap(), "");
    }

    #[test]
    fn test_tables_psv() {
        let tables = vec![Table::new(
            "Users",
            vec![
                Field::primary_key("Id").unwrap(),
                Field::text("Name", Some(100)).unwrap(),
            ],
        )];
        let out = format_tables(&tables, OutputFormat::Psv).unwrap();
        assert_eq!(
            out,
            "table|field|type|max_length|primary_key\nUsers|Id|INTEGER||true\nUsers|Name|TEXT|100|false"
        );
    }

    #[cfg(feature = "display")]
    #[test]
    fn test_rows_table_contains_values() {
        let out = format_rows(&rows(), OutputFormat::Table).unwrap();
        assert!(out.contains("Alice"));
        assert!(out.contains("Name"));
    }
}
