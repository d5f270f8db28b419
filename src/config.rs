//! Process configuration loaded from environment variables.
//!
//! `main` calls [`dotenvy::dotenv`] first so a local `.env` file is honoured,
//! then [`AppConfig::from_env`]. Every value has a default suitable for local
//! development.
//!
//! | Env Var                        | Default                          |
//! |--------------------------------|----------------------------------|
//! | `DATABASE_URL`                 | `sqlite://customers.db?mode=rwc` |
//! | `DATABASE_MAX_CONNECTIONS`     | `5`                              |
//! | `SERVER_PORT`                  | `8080`                           |
//! | `SERVER_ALLOW_ORIGINS`         | `*`                              |
//! | `SERVER_BODY_LIMIT`            | `2M`                             |
//! | `SERVER_TIMEOUT_SECS`          | `30`                             |
//! | `SERVER_SHUTDOWN_TIMEOUT_SECS` | `10`                             |
//! | `LOG_LEVEL`                    | `INFO`                           |
//! | `LOG_FORMAT`                   | `text`                           |

use std::borrow::Cow;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use validator::{Validate, ValidationError};

use crate::domain::ConfigError;

/// Top-level configuration handed to every component that needs it.
#[derive(Debug, Clone, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub database: DatabaseConfig,
    #[validate(nested)]
    pub server: ServerConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Validate)]
pub struct DatabaseConfig {
    /// SQLite connection string or file path.
    #[validate(length(min = 1, message = "DATABASE_URL must not be empty"))]
    pub url: String,
    #[validate(range(min = 1, message = "DATABASE_MAX_CONNECTIONS must be at least 1"))]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Validate)]
pub struct ServerConfig {
    #[validate(range(min = 1, message = "SERVER_PORT must be non-zero"))]
    pub port: u16,
    /// Allowed CORS origins; a single `*` allows any origin.
    #[validate(length(min = 1, message = "SERVER_ALLOW_ORIGINS must list at least one origin"))]
    pub allow_origins: Vec<String>,
    /// Maximum request body size in bytes.
    #[validate(range(min = 1, message = "SERVER_BODY_LIMIT must be positive"))]
    pub body_limit: usize,
    #[validate(custom(function = "non_zero_duration"))]
    pub request_timeout: Duration,
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            allow_origins: vec!["*".to_string()],
            body_limit: 2 * 1024 * 1024,
            request_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::InvalidValue {
                key: "LOG_FORMAT".to_string(),
                message: format!("expected 'text' or 'json', got '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Raw level name; resolved by the observability module.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let database = DatabaseConfig {
            url: get("DATABASE_URL", "sqlite://customers.db?mode=rwc"),
            max_connections: parse_number(
                "DATABASE_MAX_CONNECTIONS",
                &get("DATABASE_MAX_CONNECTIONS", "5"),
            )?,
        };

        let allow_origins = parse_origins(&get("SERVER_ALLOW_ORIGINS", "*"))?;

        let server = ServerConfig {
            port: parse_number("SERVER_PORT", &get("SERVER_PORT", "8080"))?,
            allow_origins,
            body_limit: parse_body_limit(&get("SERVER_BODY_LIMIT", "2M"))?,
            request_timeout: Duration::from_secs(parse_number(
                "SERVER_TIMEOUT_SECS",
                &get("SERVER_TIMEOUT_SECS", "30"),
            )?),
            shutdown_timeout: Duration::from_secs(parse_number(
                "SERVER_SHUTDOWN_TIMEOUT_SECS",
                &get("SERVER_SHUTDOWN_TIMEOUT_SECS", "10"),
            )?),
        };

        let log = LogConfig {
            level: get("LOG_LEVEL", "INFO"),
            format: get("LOG_FORMAT", "text").parse()?,
        };

        let config = Self {
            database,
            server,
            log,
        };
        config.validate()?;
        Ok(config)
    }
}

fn non_zero_duration(value: &Duration) -> Result<(), ValidationError> {
    if value.is_zero() {
        return Err(ValidationError::new("non_zero")
            .with_message(Cow::from("SERVER_TIMEOUT_SECS must be at least 1")));
    }
    Ok(())
}

fn parse_number<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{value}': {e}"),
    })
}

fn parse_origins(value: &str) -> Result<Vec<String>, ConfigError> {
    let origins: Vec<String> = value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    for origin in origins.iter().filter(|o| o.as_str() != "*") {
        HeaderValue::from_str(origin).map_err(|e| ConfigError::InvalidValue {
            key: "SERVER_ALLOW_ORIGINS".to_string(),
            message: format!("'{origin}': {e}"),
        })?;
    }

    Ok(origins)
}

/// Parse a human readable size such as `512`, `4K`, `2M`, `2MB` or `1G`.
///
/// Units are binary: `1K` is 1024 bytes.
pub fn parse_body_limit(value: &str) -> Result<usize, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: "SERVER_BODY_LIMIT".to_string(),
        message,
    };

    let normalized = value.trim().to_ascii_uppercase();
    let without_b = normalized.strip_suffix('B').unwrap_or(&normalized);
    let split = without_b
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(without_b.len());
    let (digits, unit) = without_b.split_at(split);

    if digits.is_empty() {
        return Err(invalid(format!("'{value}' does not start with a number")));
    }

    let amount: usize = digits
        .parse()
        .map_err(|e| invalid(format!("'{value}': {e}")))?;

    let multiplier: usize = match unit.trim() {
        "" => 1,
        "K" => 1024,
        "M" => 1024 * 1024,
        "G" => 1024 * 1024 * 1024,
        other => return Err(invalid(format!("unknown unit '{other}' in '{value}'"))),
    };

    amount
        .checked_mul(multiplier)
        .ok_or_else(|| invalid(format!("'{value}' is too large")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.database.url, "sqlite://customers.db?mode=rwc");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.allow_origins, vec!["*".to_string()]);
        assert_eq!(config.server.body_limit, 2 * 1024 * 1024);
        assert_eq!(config.server.request_timeout, Duration::from_secs(30));
        assert_eq!(config.server.shutdown_timeout, Duration::from_secs(10));
        assert_eq!(config.log.level, "INFO");
        assert_eq!(config.log.format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("SERVER_PORT", "9000"),
            (
                "SERVER_ALLOW_ORIGINS",
                "http://localhost:3000, https://example.com",
            ),
            ("SERVER_BODY_LIMIT", "4K"),
            ("SERVER_TIMEOUT_SECS", "5"),
            ("LOG_LEVEL", "debug"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.server.allow_origins,
            vec![
                "http://localhost:3000".to_string(),
                "https://example.com".to_string()
            ]
        );
        assert_eq!(config.server.body_limit, 4096);
        assert_eq!(config.server.request_timeout, Duration::from_secs(5));
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("SERVER_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "SERVER_PORT"));
    }

    #[test]
    fn test_zero_port_fails_validation() {
        let err = load(&[("SERVER_PORT", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(msg) if msg.contains("SERVER_PORT")));
    }

    #[test]
    fn test_zero_request_timeout_fails_validation() {
        let err = load(&[("SERVER_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(
            matches!(err, ConfigError::ParseError(msg) if msg.contains("SERVER_TIMEOUT_SECS"))
        );
    }

    #[test]
    fn test_only_separators_in_origins_fails_validation() {
        let err = load(&[("SERVER_ALLOW_ORIGINS", " , ,")]).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_invalid_origin() {
        let err = load(&[("SERVER_ALLOW_ORIGINS", "http://ok.example,bad\norigin")]).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { key, .. } if key == "SERVER_ALLOW_ORIGINS")
        );
    }

    #[test]
    fn test_invalid_log_format() {
        let err = load(&[("LOG_FORMAT", "xml")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "LOG_FORMAT"));
    }

    #[test]
    fn test_parse_body_limit_units() {
        assert_eq!(parse_body_limit("512").unwrap(), 512);
        assert_eq!(parse_body_limit("4K").unwrap(), 4 * 1024);
        assert_eq!(parse_body_limit("2M").unwrap(), 2 * 1024 * 1024);
        assert_eq!(parse_body_limit("2mb").unwrap(), 2 * 1024 * 1024);
        assert_eq!(parse_body_limit("1G").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_body_limit(" 8 KB ").unwrap(), 8 * 1024);
    }

    #[test]
    fn test_parse_body_limit_rejects_garbage() {
        assert!(parse_body_limit("").is_err());
        assert!(parse_body_limit("M").is_err());
        assert!(parse_body_limit("10X").is_err());
        assert!(parse_body_limit("1.5M").is_err());
    }
}
