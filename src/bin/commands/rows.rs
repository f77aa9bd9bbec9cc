use skl::output::format_rows;
use skl::{OutputFormat, SklConfig};
use std::path::PathBuf;

use super::{open_database, parse_key, table_index};

pub fn run_rows(
    config: &SklConfig,
    db: &Option<PathBuf>,
    table: &str,
    output_format: OutputFormat,
) {
    let Some(database) = open_database(config, db) else {
        return;
    };
    let Some(index) = table_index(&database, table) else {
        return;
    };

    let rows = match database.get_all_tuples(index) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return;
        }
    };

    match format_rows(&rows, output_format) {
        Ok(out) => println!("{}", out),
        Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
    }
}

pub fn run_get(
    config: &SklConfig,
    db: &Option<PathBuf>,
    table: &str,
    key: &str,
    output_format: OutputFormat,
) {
    let Some(database) = open_database(config, db) else {
        return;
    };
    let Some(index) = table_index(&database, table) else {
        return;
    };

    match database.get_one_tuple(index, parse_key(key)) {
        Ok(row) => match format_rows(&[row], output_format) {
            Ok(out) => println!("{}", out),
            Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
        },
        Err(e) => eprintln!("ERROR: {}", e),
    }
}

pub fn run_delete(config: &SklConfig, db: &Option<PathBuf>, table: &str, key: &str) {
    let Some(database) = open_database(config, db) else {
        return;
    };
    let Some(index) = table_index(&database, table) else {
        return;
    };

    match database.delete_one_tuple(index, parse_key(key)) {
        Ok(0) => println!("no row in {} with key {}", table, key),
        Ok(n) => println!("deleted {} row(s) from {}", n, table),
        Err(e) => eprintln!("ERROR: {}", e),
    }
}
