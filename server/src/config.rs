//! Application configuration
//!
//! Central location for configuration constants and the runtime
//! configuration loaded from the environment.

use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

// ===== Server Defaults =====

/// Port used when `PORT` is not set
pub const DEFAULT_PORT: u16 = 3000;

/// Directory holding JSON documents and the SQLite file when `DATA_DIR` is not set
pub const DEFAULT_DATA_DIR: &str = "./data";

/// SQLite database file name inside the data directory
pub const DATABASE_FILE_NAME: &str = "site.db";

/// Settings document name for the file-backed store
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Maximum accepted request body in bytes.
/// Every payload is a flat form submission, so 1 MiB is generous.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

// ===== Database =====

/// Connections in the request pool
pub const DATABASE_MAX_CONNECTIONS: u32 = 5;

/// How long a statement waits on a locked database before failing
pub const DATABASE_BUSY_TIMEOUT_SECS: u64 = 5;

// ===== Record Defaults =====

/// Placeholder stored for social links that were never configured
pub const UNSET_SOCIAL_LINK: &str = "#";

/// Date format used for contact message dates (YYYY-MM-DD)
pub const MESSAGE_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid store backend: {0} (expected \"database\" or \"file\")")]
    InvalidBackend(String),
}

/// Persistence adapter selected at deployment time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// One pretty-printed JSON document per collection
    File,
    /// One SQLite table per collection
    Database,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" | "json" => Ok(StoreBackend::File),
            "database" | "db" | "sqlite" => Ok(StoreBackend::Database),
            _ => Err(ConfigError::InvalidBackend(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub backend: StoreBackend,
    pub database_path: PathBuf,
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(value) => parse_port(&value)?,
            Err(_) => DEFAULT_PORT,
        };

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let backend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "database".to_string())
            .parse::<StoreBackend>()?;

        let database_path = env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join(DATABASE_FILE_NAME));

        let cors_origin = env::var("CORS_ORIGIN")
            .ok()
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty());

        Ok(Config {
            port,
            data_dir,
            backend,
            database_path,
            cors_origin,
        })
    }

    /// Configuration rooted at `data_dir`, used by tests and the importer.
    pub fn for_data_dir(data_dir: PathBuf, backend: StoreBackend) -> Self {
        Config {
            port: DEFAULT_PORT,
            database_path: data_dir.join(DATABASE_FILE_NAME),
            data_dir,
            backend,
            cors_origin: None,
        }
    }

    /// Point the configuration at another data directory.
    ///
    /// The database path follows the data directory unless it was set explicitly.
    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        if self.database_path == self.data_dir.join(DATABASE_FILE_NAME) {
            self.database_path = data_dir.join(DATABASE_FILE_NAME);
        }
        self.data_dir = data_dir;
        self
    }
}

pub fn parse_port(value: &str) -> Result<u16, ConfigError> {
    let port = value.trim().parse::<u16>()?;
    if port == 0 {
        return Err(ConfigError::PortOutOfRange(port));
    }
    Ok(port)
}
