use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;

use crate::errors::ErdError;

/// Where the catalog lives. `url`, when present, wins over the individual parts.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConnectionConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            database: "dev_db".to_string(),
            username: "postgres".to_string(),
            password: String::new(),
        }
    }
}

impl ConnectionConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ErdError> {
        if let Some(url) = &self.url {
            return url
                .parse::<PgConnectOptions>()
                .map_err(|e| ErdError::Config(format!("invalid DATABASE_URL: {}", e)));
        }

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username);
        if !self.password.is_empty() {
            options = options.password(&self.password);
        }
        Ok(options)
    }
}

/// Optional restrictions applied to one introspection call.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Filter {
    /// Exact, case-sensitive namespace match.
    pub namespace: Option<String>,
    /// Case-insensitive table names; `None` or an empty list admits every table.
    pub tables: Option<Vec<String>>,
}

impl Filter {
    pub fn new(namespace: Option<String>, tables: Option<Vec<String>>) -> Self {
        Self { namespace, tables }
    }

    /// Parses a comma-separated table list, trimming entries and dropping blanks.
    pub fn parse_table_list(raw: &str) -> Option<Vec<String>> {
        let tables: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        if tables.is_empty() {
            None
        } else {
            Some(tables)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table_list() {
        assert_eq!(
            Filter::parse_table_list(" items, ,tags ,"),
            Some(vec!["items".to_string(), "tags".to_string()])
        );
        assert_eq!(Filter::parse_table_list(" , "), None);
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        let config = ConnectionConfig {
            url: Some("not a url".to_string()),
            ..ConnectionConfig::default()
        };

        assert!(matches!(config.connect_options(), Err(ErdError::Config(_))));
    }

    #[test]
    fn test_connect_options_from_parts() {
        let config = ConnectionConfig {
            host: "db.internal".to_string(),
            port: 6543,
            ..ConnectionConfig::default()
        };

        let options = config.connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("dev_db"));
    }
}
