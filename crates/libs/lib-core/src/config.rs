//! # Application Configuration
//!
//! This module manages application configuration loaded from environment variables.
//! All configuration is validated on startup to fail fast if misconfigured.
//!
//! The loaded [`Config`] is handed to the server state once at startup and
//! reaches handlers through axum's `State` extractor.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `PORT` | `15000` | HTTP listen port |
//! | `ACCESS_TOKEN_SECRET` | required | Token signing secret |
//! | `Mongo_URI` | required | MongoDB connection string |
//! | `MONGO_DB_NAME` | `go-home` | Database holding the collections |
//! | `TOKEN_EXPIRATION_DAYS` | `30` | Issued token lifetime |
//! | `LOG_LEVEL` | `info` | Tracing filter level |

use lib_utils::{get_env, get_env_or, get_env_parse_or};

pub const DEFAULT_PORT: u16 = 15000;
pub const DEFAULT_DB_NAME: &str = "go-home";
pub const DEFAULT_TOKEN_EXPIRATION_DAYS: i64 = 30;

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// Port the HTTP server listens on
    pub port: u16,

    /// Secret key for token signing and verification
    pub token_secret: String,

    /// MongoDB connection string
    pub mongo_uri: String,

    /// Database name holding the `users`, `houses` and `booked` collections
    pub db_name: String,

    /// Token validity period in days
    ///
    /// Valid range: 1-365 days
    pub token_expiration_days: i64,

    /// Tracing filter level (`trace`, `debug`, `info`, `warn`, `error`)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let port = get_env_parse_or("PORT", DEFAULT_PORT).map_err(|e| e.to_string())?;
        let token_secret = get_env("ACCESS_TOKEN_SECRET").map_err(|e| e.to_string())?;
        let mongo_uri = get_env("Mongo_URI").map_err(|e| e.to_string())?;
        let db_name = get_env_or("MONGO_DB_NAME", DEFAULT_DB_NAME);
        let token_expiration_days =
            get_env_parse_or("TOKEN_EXPIRATION_DAYS", DEFAULT_TOKEN_EXPIRATION_DAYS)
                .map_err(|e| e.to_string())?;
        let log_level = get_env_or("LOG_LEVEL", "info").to_lowercase();

        Ok(Self {
            port,
            token_secret,
            mongo_uri,
            db_name,
            token_expiration_days,
            log_level,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.token_secret.trim().is_empty() {
            return Err("ACCESS_TOKEN_SECRET must not be empty".to_string());
        }

        if !(1..=365).contains(&self.token_expiration_days) {
            return Err("TOKEN_EXPIRATION_DAYS must be between 1 and 365".to_string());
        }

        if self.db_name.trim().is_empty() {
            return Err("MONGO_DB_NAME must not be empty".to_string());
        }

        Ok(())
    }

    /// Address the server binds to.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            port: DEFAULT_PORT,
            token_secret: "secret".to_string(),
            mongo_uri: "mongodb://localhost:27017".to_string(),
            db_name: DEFAULT_DB_NAME.to_string(),
            token_expiration_days: DEFAULT_TOKEN_EXPIRATION_DAYS,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
        assert_eq!(valid_config().bind_address(), "0.0.0.0:15000");
    }

    #[test]
    fn test_blank_secret_is_rejected() {
        let config = Config {
            token_secret: "   ".to_string(),
            ..valid_config()
        };

        assert_eq!(
            config.validate().expect_err("Blank secret should fail"),
            "ACCESS_TOKEN_SECRET must not be empty"
        );
    }

    #[test]
    fn test_expiration_out_of_range_is_rejected() {
        for days in [0, 366] {
            let config = Config {
                token_expiration_days: days,
                ..valid_config()
            };
            assert!(config.validate().is_err(), "{days} days should be rejected");
        }
    }
}
