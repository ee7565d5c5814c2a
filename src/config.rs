use std::env;
use std::path::PathBuf;

use crate::{errors::ErdError, models::connections::ConnectionConfig};

pub const DEFAULT_OUTPUT_PATH: &str = "output/erd.md";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub connection: ConnectionConfig,
    pub output_path: PathBuf,
    /// Bind address for the viewer server.
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ErdError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ErdError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ConnectionConfig::default();
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let connection = ConnectionConfig {
            url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            host: get("DB_HOST", defaults.host.as_str()),
            port: parse_port("DB_PORT", lookup("DB_PORT"), defaults.port)?,
            database: get("DB_NAME", defaults.database.as_str()),
            username: get("DB_USER", defaults.username.as_str()),
            password: get("DB_PASSWORD", defaults.password.as_str()),
        };

        Ok(Self {
            connection,
            output_path: PathBuf::from(get("ERD_OUTPUT_PATH", DEFAULT_OUTPUT_PATH)),
            host: get("HOST", "0.0.0.0"),
            port: parse_port("PORT", lookup("PORT"), 8000)?,
        })
    }
}

fn parse_port(key: &str, value: Option<String>, default: u16) -> Result<u16, ErdError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ErdError::Config(format!("{} is not a valid port: {:?}", key, raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.connection, ConnectionConfig::default());
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DB_HOST", "catalog.local"),
            ("DB_PORT", "6543"),
            ("DB_NAME", "shop"),
            ("DB_USER", "reader"),
            ("DB_PASSWORD", "secret"),
            ("ERD_OUTPUT_PATH", "/tmp/shop.md"),
        ]))
        .unwrap();

        assert_eq!(config.connection.host, "catalog.local");
        assert_eq!(config.connection.port, 6543);
        assert_eq!(config.connection.database, "shop");
        assert_eq!(config.connection.username, "reader");
        assert_eq!(config.connection.password, "secret");
        assert_eq!(config.output_path, PathBuf::from("/tmp/shop.md"));
    }

    #[test]
    fn test_empty_database_url_is_ignored() {
        let config = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "")])).unwrap();
        assert_eq!(config.connection.url, None);
    }

    #[test]
    fn test_invalid_port() {
        let result = AppConfig::from_lookup(lookup(&[("DB_PORT", "abc")]));
        assert!(matches!(result, Err(ErdError::Config(_))));
    }
}
