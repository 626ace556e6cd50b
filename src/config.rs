//! Configuration module
//!
//! Reads `AppConfig` from a TOML file. Every section is optional and falls
//! back to defaults.
//!
//! ```toml
//! [database]
//! url = "sqlite://./users.db?mode=rwc"
//! max_connections = 5
//!
//! [logging]
//! level = "info"
//! format = "pretty"   # or "json"
//!
//! [security]
//! scrypt_log_n = 14
//! scrypt_r = 8
//! scrypt_p = 1
//! scrypt_key_len = 32
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::infrastructure::crypto::password::ScryptSettings;
use crate::infrastructure::database::DatabaseConfig;
use crate::support::errors::InfraError;

/// Default location: `~/.config/users-auth/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("users-auth")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSection,
    pub logging: LoggingSection,
    pub security: SecuritySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_connections: db.max_connections,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// trace, debug, info, warn, error (RUST_LOG takes precedence)
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    pub scrypt_log_n: u8,
    pub scrypt_r: u32,
    pub scrypt_p: u32,
    pub scrypt_key_len: usize,
}

impl Default for SecuritySection {
    fn default() -> Self {
        let s = ScryptSettings::default();
        Self {
            scrypt_log_n: s.log_n,
            scrypt_r: s.r,
            scrypt_p: s.p,
            scrypt_key_len: s.key_len,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, InfraError> {
        toml::from_str(content).map_err(|e| InfraError::Config(e.to_string()))
    }

    /// Render the effective configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String, InfraError> {
        toml::to_string_pretty(self).map_err(|e| InfraError::Config(e.to_string()))
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
        }
    }

    pub fn scrypt_settings(&self) -> ScryptSettings {
        ScryptSettings {
            log_n: self.security.scrypt_log_n,
            r: self.security.scrypt_r,
            p: self.security.scrypt_p,
            key_len: self.security.scrypt_key_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = AppConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.database.url, DatabaseConfig::default().url);
        assert_eq!(cfg.scrypt_settings(), ScryptSettings::default());
    }

    #[test]
    fn test_partial_sections() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [logging]
            format = "json"

            [security]
            scrypt_log_n = 10
            "#,
        )
        .unwrap();

        assert_eq!(cfg.logging.format, "json");
        assert_eq!(cfg.logging.level, "info");
        let s = cfg.scrypt_settings();
        assert_eq!(s.log_n, 10);
        assert_eq!(s.r, 8);
        assert_eq!(s.key_len, 32);
    }

    #[test]
    fn test_toml_output_reloads() {
        let mut cfg = AppConfig::default();
        cfg.database.url = "sqlite::memory:".to_string();
        cfg.security.scrypt_log_n = 12;

        let rendered = cfg.to_toml_string().unwrap();
        assert!(rendered.contains("[security]"));

        let reloaded = AppConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(reloaded.database.url, "sqlite::memory:");
        assert_eq!(reloaded.scrypt_settings().log_n, 12);
    }

    #[test]
    fn test_invalid_toml() {
        let err = AppConfig::from_toml_str("[database\nurl = 1").unwrap_err();
        assert!(matches!(err, InfraError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database]\nurl = \"sqlite::memory:\"\nmax_connections = 1").unwrap();

        let cfg = AppConfig::load(file.path()).unwrap();
        let db = cfg.database_config();
        assert_eq!(db.url, "sqlite::memory:");
        assert_eq!(db.max_connections, 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, InfraError::Io(_)));
    }

    #[test]
    fn test_default_config_path() {
        assert!(default_config_path().ends_with("users-auth/config.toml"));
    }
}
