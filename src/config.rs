use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub upload_dir: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub level: Option<String>,
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub database: DatabaseConfig,
    pub log_level: String,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_DATABASE_URL: &str = "sqlite://videos.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LOG_LEVEL: &str = "info";

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let base_dir = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."));

        // Try to load config file
        let config_path = base_dir.join("config.toml");
        let config_file = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Some(toml::from_str::<ConfigFile>(&content)?)
        } else {
            None
        };

        Ok(Self::resolve(
            config_file.unwrap_or_default(),
            |key| std::env::var(key).ok(),
            &base_dir,
        ))
    }

    /// Merge file values with overrides from `lookup` (env vars override the
    /// file), falling back to defaults.
    pub fn resolve<F>(file: ConfigFile, lookup: F, base_dir: &Path) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST")
            .or(file.server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .or(file.server.port)
            .unwrap_or(DEFAULT_PORT);

        let upload_dir_str = lookup("UPLOAD_DIR")
            .or(file.server.upload_dir)
            .unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string());

        let upload_dir = if Path::new(&upload_dir_str).is_absolute() {
            PathBuf::from(upload_dir_str)
        } else {
            base_dir.join(upload_dir_str)
        };

        let url = lookup("DATABASE_URL")
            .or(file.database.url)
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|v| v.parse().ok())
            .or(file.database.max_connections)
            .filter(|&v| v > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let log_level = lookup("LOG_LEVEL")
            .or(file.logging.level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Self {
            host,
            port,
            upload_dir,
            database: DatabaseConfig {
                url,
                max_connections,
            },
            log_level,
        }
    }

    pub fn from_env() -> Self {
        Self::load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        let base_dir = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."));
        Self::resolve(ConfigFile::default(), |_| None, &base_dir)
    }
}
