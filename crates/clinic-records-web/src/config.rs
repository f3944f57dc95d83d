//! Process configuration read from the environment once at startup.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Database file name, placed next to the executable unless `DB_PATH` is set.
pub const DB_FILE_NAME: &str = "patients.db";
pub const DEFAULT_SECRET_KEY: &str = "dev-secret-key";
pub const DEFAULT_PORT: u16 = 5000;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid PORT value: {0}")]
    InvalidPort(String),

    #[error("Cannot locate executable: {0}")]
    Executable(#[from] std::io::Error),

    #[error("Executable has no parent directory")]
    NoExecutableDir,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file
    pub db_path: PathBuf,
    /// Key for signing the status-message cookie
    pub secret_key: String,
    pub port: u16,
    pub debug: bool,
}

/// `patients.db` in the directory holding the running executable.
pub fn default_db_path() -> Result<PathBuf, ConfigError> {
    let exe = std::env::current_exe()?;
    let dir = exe.parent().ok_or(ConfigError::NoExecutableDir)?;
    Ok(dir.join(DB_FILE_NAME))
}

impl Config {
    /// Configuration for `db_path` with every other setting at its default.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            port: DEFAULT_PORT,
            debug: false,
        }
    }

    /// Read `DB_PATH`, `SECRET_KEY`, `PORT` and `DEBUG`.
    ///
    /// `FLASK_SECRET_KEY` and `FLASK_DEBUG` are honoured when the
    /// unprefixed names are unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or empty values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let db_path = match get("DB_PATH") {
            Some(raw) => PathBuf::from(raw),
            None => default_db_path()?,
        };
        let mut config = Self::new(db_path);

        if let Some(raw) = get("PORT") {
            config.port = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?;
        }
        if let Some(secret) = get("SECRET_KEY").or_else(|| get("FLASK_SECRET_KEY")) {
            config.secret_key = secret;
        }
        config.debug = get("DEBUG")
            .or_else(|| get("FLASK_DEBUG"))
            .map(|raw| is_truthy(&raw))
            .unwrap_or(false);

        Ok(config)
    }

    /// Address to listen on: all interfaces.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    /// Whether the placeholder signing key is in use.
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.port, 5000);
        assert!(!config.debug);
        assert!(config.uses_default_secret());
        assert_eq!(config.default_log_filter(), "info");
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:5000");
    }

    #[test]
    fn test_default_db_path_next_to_executable() {
        let config = from_pairs(&[]).unwrap();
        let exe = std::env::current_exe().unwrap();

        assert!(config.db_path.is_absolute());
        assert_eq!(config.db_path.parent(), exe.parent());
        assert_eq!(config.db_path.file_name().unwrap(), DB_FILE_NAME);
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("DB_PATH", "/var/lib/clinic/records.db"),
            ("SECRET_KEY", "s3cret"),
            ("PORT", "8080"),
            ("DEBUG", "Yes"),
        ])
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/var/lib/clinic/records.db"));
        assert_eq!(config.secret_key, "s3cret");
        assert_eq!(config.port, 8080);
        assert!(config.debug);
        assert!(!config.uses_default_secret());
        assert_eq!(config.default_log_filter(), "debug");
    }

    #[test]
    fn test_flask_names_as_fallback() {
        let config = from_pairs(&[("FLASK_SECRET_KEY", "legacy"), ("FLASK_DEBUG", "true")]).unwrap();
        assert_eq!(config.secret_key, "legacy");
        assert!(config.debug);

        // Unprefixed names win
        let config = from_pairs(&[
            ("SECRET_KEY", "current"),
            ("FLASK_SECRET_KEY", "legacy"),
            ("DEBUG", "0"),
            ("FLASK_DEBUG", "1"),
        ])
        .unwrap();
        assert_eq!(config.secret_key, "current");
        assert!(!config.debug);
    }

    #[test]
    fn test_debug_values() {
        for on in ["1", "true", "TRUE", "yes"] {
            assert!(from_pairs(&[("DEBUG", on)]).unwrap().debug, "{on}");
        }
        for off in ["0", "false", "no", "on"] {
            assert!(!from_pairs(&[("DEBUG", off)]).unwrap().debug, "{off}");
        }
    }

    #[test]
    fn test_invalid_port() {
        let err = from_pairs(&[("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }
}
