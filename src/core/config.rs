//! Application configuration.
//!
//! Configuration is read from a TOML file and then overridden from the
//! environment:
//!
//! - `DATABASE_URL`: SQLite database path (a `sqlite://` prefix is stripped)
//! - `CORS_ORIGINS`: comma separated list of allowed origins, `*` for any
//!
//! ```
//! use beer_baseball::core::AppConfig;
//!
//! let config = AppConfig::from_toml_str(r#"
//! database_path = "league.db"
//! cors_origins = ["https://scores.example"]
//! "#).unwrap();
//!
//! assert_eq!(config.database_path.to_str(), Some("league.db"));
//! assert!(config.allows_origin("https://scores.example"));
//! assert!(!config.allows_origin("https://elsewhere.example"));
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding the database path.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Environment variable overriding allowed CORS origins.
pub const CORS_ORIGINS_ENV: &str = "CORS_ORIGINS";

const WILDCARD: &str = "*";

/// Application configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite database file.
    pub database_path: PathBuf,

    /// Origins the transport layer accepts (`*` for any).
    pub cors_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("beerbaseball.db"),
            cors_origins: vec![WILDCARD.to_string()],
        }
    }
}

impl AppConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Apply `DATABASE_URL` and `CORS_ORIGINS` if set.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(DATABASE_URL_ENV).ok().as_deref(),
            std::env::var(CORS_ORIGINS_ENV).ok().as_deref(),
        )
    }

    fn with_overrides(mut self, database_url: Option<&str>, cors_origins: Option<&str>) -> Self {
        if let Some(url) = database_url.filter(|url| !url.trim().is_empty()) {
            let path = url.trim();
            let path = path
                .strip_prefix("sqlite:///")
                .or_else(|| path.strip_prefix("sqlite://"))
                .unwrap_or(path);
            self.database_path = PathBuf::from(path);
        }
        if let Some(origins) = cors_origins {
            let origins: Vec<String> = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect();
            if !origins.is_empty() {
                self.cors_origins = origins;
            }
        }
        self
    }

    /// Set the database path.
    #[must_use]
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Set the allowed origins.
    #[must_use]
    pub fn with_cors_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cors_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// Does the CORS policy accept this origin?
    #[must_use]
    pub fn allows_origin(&self, origin: &str) -> bool {
        self.cors_origins.iter().any(|allowed| allowed == WILDCARD || allowed == origin)
    }
}
