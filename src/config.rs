use std::env;
use std::fmt;

use crate::auth::password::{MAX_HASH_COST, MIN_HASH_COST};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

/// Errors detected while loading configuration. These abort startup.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    Missing(&'static str),
    /// A variable is set but cannot be used.
    Invalid { var: &'static str, reason: String },
    /// The signing secret is shorter than the accepted minimum.
    WeakSecret { min_len: usize, actual_len: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "{} must be set", var),
            ConfigError::Invalid { var, reason } => write!(f, "{} is invalid: {}", var, reason),
            ConfigError::WeakSecret {
                min_len,
                actual_len,
            } => write!(
                f,
                "JWT_SECRET must be at least {} bytes long (got {})",
                min_len, actual_len
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    /// Postgres connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub bcrypt_cost: u32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("server_port", &self.server_port)
            .field("server_host", &self.server_host)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = non_empty("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let server_port = match non_empty("SERVER_PORT") {
            Some(raw) => raw.parse().map_err(|e| ConfigError::Invalid {
                var: "SERVER_PORT",
                reason: format!("{}", e),
            })?,
            None => DEFAULT_PORT,
        };

        let token_ttl_minutes = match non_empty("TOKEN_TTL_MINUTES") {
            Some(raw) => {
                let minutes: i64 = raw.parse().map_err(|e| ConfigError::Invalid {
                    var: "TOKEN_TTL_MINUTES",
                    reason: format!("{}", e),
                })?;
                if minutes <= 0 {
                    return Err(ConfigError::Invalid {
                        var: "TOKEN_TTL_MINUTES",
                        reason: "must be greater than zero".into(),
                    });
                }
                minutes
            }
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };

        let bcrypt_cost = match non_empty("BCRYPT_COST") {
            Some(raw) => {
                let cost: u32 = raw.parse().map_err(|e| ConfigError::Invalid {
                    var: "BCRYPT_COST",
                    reason: format!("{}", e),
                })?;
                if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&cost) {
                    return Err(ConfigError::Invalid {
                        var: "BCRYPT_COST",
                        reason: format!("must be between {} and {}", MIN_HASH_COST, MAX_HASH_COST),
                    });
                }
                cost
            }
            None => bcrypt::DEFAULT_COST,
        };

        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            server_port,
            server_host: non_empty("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            jwt_secret,
            token_ttl_minutes,
            bcrypt_cost,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.token_ttl_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_vars(lookup(&[("JWT_SECRET", "0123456789abcdef")])).unwrap();

        assert_eq!(config.database_url, None);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.token_ttl_minutes, 60);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.server_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_config_custom_values() {
        let config = Config::from_vars(lookup(&[
            ("JWT_SECRET", "0123456789abcdef"),
            ("DATABASE_URL", "postgres://test"),
            ("SERVER_PORT", "3000"),
            ("SERVER_HOST", "0.0.0.0"),
            ("TOKEN_TTL_MINUTES", "15"),
            ("BCRYPT_COST", "4"),
        ]))
        .unwrap();

        assert_eq!(config.database_url.as_deref(), Some("postgres://test"));
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.token_ttl(), chrono::Duration::minutes(15));
        assert_eq!(config.bcrypt_cost, 4);
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        assert_eq!(
            Config::from_vars(lookup(&[])).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
        assert_eq!(
            Config::from_vars(lookup(&[("JWT_SECRET", "   ")])).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let secret = ("JWT_SECRET", "0123456789abcdef");

        let err = Config::from_vars(lookup(&[secret, ("SERVER_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "SERVER_PORT", .. }));

        let err = Config::from_vars(lookup(&[secret, ("TOKEN_TTL_MINUTES", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "TOKEN_TTL_MINUTES", .. }));

        let err = Config::from_vars(lookup(&[secret, ("BCRYPT_COST", "2")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "BCRYPT_COST", .. }));
    }

    #[test]
    fn test_debug_output_hides_secret() {
        let config = Config::from_vars(lookup(&[("JWT_SECRET", "do-not-print-this-value")])).unwrap();
        assert!(!format!("{:?}", config).contains("do-not-print-this-value"));
    }
}
