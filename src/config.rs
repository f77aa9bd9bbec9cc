use anyhow::{anyhow, Result};
use config::Config;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::database::DEFAULT_DB_FILE_NAME;

pub struct SklConfig {
    /// Directory holding the database file
    pub data_dir: String,

    /// Name of the database file inside `data_dir`
    pub db_file_name: String,
}

const EMPTY_CONFIG: &str = r#"### skl configuration file

### directory holding the database file (default: current directory)
# data_dir = "."

### database file name
# db_file_name = "database.sqlite"
"#;

fn current_dir_string() -> String {
    std::env::current_dir()
        .map(|d| d.to_string_lossy().to_string())
        .unwrap_or_else(|_| ".".to_string())
}

impl Default for SklConfig {
    fn default() -> Self {
        Self {
            data_dir: current_dir_string(),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
        }
    }
}

impl SklConfig {
    /// Function to create and initialize a new configuration
    ///
    /// Sources, lowest priority first: the TOML file, `.env` files, then
    /// `SKL_*` environment variables.
    pub fn new(path: &Option<String>) -> Result<SklConfig> {
        let mut builder = Config::builder();

        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                let skl_dir = Self::config_dir()?;
                std::fs::create_dir_all(&skl_dir)
                    .map_err(|e| anyhow!("Unable to create skl directory: {}", e))?;
                let p = Self::config_file_path()?;
                if p.exists() {
                    let path_str = p
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(&p, EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.display(), e)
                    })?;
                }
            }
        }

        // A missing .env file is not an error
        let _ = dotenvy::dotenv();

        // E.g., `SKL_DATA_DIR=/tmp/data skl tables` would set the data directory
        builder = builder.add_source(config::Environment::with_prefix("SKL"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Ok(Self::from_map(&config))
    }

    fn from_map(config: &HashMap<String, String>) -> SklConfig {
        let data_dir = config
            .get("data_dir")
            .map(|s| s.to_string())
            .unwrap_or_else(current_dir_string);

        let db_file_name = config
            .get("db_file_name")
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.to_string())
            .unwrap_or_else(|| DEFAULT_DB_FILE_NAME.to_string());

        SklConfig {
            data_dir,
            db_file_name,
        }
    }

    /// Get the path to the SQLite database file
    pub fn sqlite_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.db_file_name)
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        [
            format!("Data Directory:     {}", self.data_dir),
            format!("Database File:      {}", self.db_file_name),
            format!("SQLite Path:        {}", self.sqlite_path().display()),
        ]
        .join("\n")
    }

    fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Ok(home.join(".skl"))
    }

    /// Get the config file path
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("skl.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SklConfig::from_map(&HashMap::new());
        assert_eq!(config.db_file_name, "database.sqlite");
        assert_eq!(
            config.sqlite_path(),
            Path::new(&config.data_dir).join("database.sqlite")
        );
    }

    #[test]
    fn test_from_map() {
        let mut map = HashMap::new();
        map.insert("data_dir".to_string(), "/tmp/skl-data".to_string());
        map.insert("db_file_name".to_string(), "app.sqlite3".to_string());

        let config = SklConfig::from_map(&map);
        assert_eq!(config.sqlite_path(), PathBuf::from("/tmp/skl-data/app.sqlite3"));
        assert!(config.summary().contains("/tmp/skl-data/app.sqlite3"));
    }

    #[test]
    fn test_blank_file_name_falls_back() {
        let mut map = HashMap::new();
        map.insert("db_file_name".to_string(), "  ".to_string());
        assert_eq!(SklConfig::from_map(&map).db_file_name, "database.sqlite");
    }

    #[test]
    fn test_new_writes_template_then_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skl.toml");
        let path_str = path.to_str().unwrap().to_string();

        SklConfig::new(&Some(path_str.clone())).unwrap();
        assert!(path.exists());

        std::fs::write(
            &path,
            "data_dir = \"/srv/skl\"\ndb_file_name = \"custom.sqlite\"\n",
        )
        .unwrap();
        let config = SklConfig::new(&Some(path_str)).unwrap();
        assert_eq!(config.sqlite_path(), PathBuf::from("/srv/skl/custom.sqlite"));
    }
}
