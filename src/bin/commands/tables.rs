use skl::output::format_tables;
use skl::{connect, OutputFormat, SklConfig};
use std::path::{Path, PathBuf};

use super::open_database;

pub fn run_tables(config: &SklConfig, db: &Option<PathBuf>, output_format: OutputFormat) {
    let Some(database) = open_database(config, db) else {
        return;
    };

    match format_tables(database.tables(), output_format) {
        Ok(out) => println!("{}", out),
        Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
    }
}

pub fn run_status(config: &SklConfig, db: &Option<PathBuf>) {
    let path = db.clone().unwrap_or_else(|| config.sqlite_path());
    match status_lines(config, &path) {
        Ok(lines) => println!("{}", lines.join("\n")),
        Err(e) => eprintln!("ERROR: {}", e),
    }
}

/// Config summary followed by the tables found in the file and their row counts
fn status_lines(config: &SklConfig, path: &Path) -> skl::Result<Vec<String>> {
    let mut lines = vec![config.summary()];

    if !path.is_file() {
        lines.push(format!("Database File:      not found at {}", path.display()));
        return Ok(lines);
    }

    let database = connect(path)?;
    lines.push(format!("Tables:             {}", database.tables().len()));
    for (index, table) in database.tables().iter().enumerate() {
        let count = database.table_count(index)?;
        lines.push(format!("  {:<18}{} rows", table.table_name, count));
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skl::{Database, Field, Row, Table};

    fn config_for(dir: &Path) -> SklConfig {
        SklConfig {
            data_dir: dir.to_string_lossy().to_string(),
            db_file_name: "database.sqlite".to_string(),
        }
    }

    #[test]
    fn test_status_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());

        let lines = status_lines(&config, &config.sqlite_path()).unwrap();
        assert!(lines.last().unwrap().contains("not found"));
    }

    #[test]
    fn test_status_lists_tables_with_counts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        let users = Table::new(
            "Users",
            vec![
                Field::primary_key("Id").unwrap(),
                Field::text("Name", None).unwrap(),
            ],
        );
        let db = Database::scaffolded(dir.path(), vec![users]).unwrap();
        db.insert_one_tuple(0, &Row::new().with("Name", "Alice".to_string()))
            .unwrap();

        let lines = status_lines(&config, &config.sqlite_path()).unwrap();
        assert!(lines.contains(&"Tables:             1".to_string()));
        assert!(lines.iter().any(|l| l.contains("Users") && l.ends_with("1 rows")));
        assert!(!lines.iter().any(|l| l.contains("missing")));
    }
}
