//! Runtime configuration read from the environment.
//!
//! ```rust
//! use eventdesk::config::AppConfig;
//!
//! let config = AppConfig::from_lookup(|key| match key {
//!     "JWT_SECRET" => Some("a-development-secret-of-32-bytes!".to_owned()),
//!     "DATABASE_URL" => Some("sqlite::memory:".to_owned()),
//!     _ => None,
//! })
//! .unwrap();
//!
//! assert_eq!(config.port, 3000);
//! assert_eq!(config.bind_address(), "0.0.0.0:3000");
//! ```

use std::env;

use chrono::Duration;

use crate::jwt::{JwtConfig, MIN_SECRET_LENGTH};
use crate::{DeskError, SecretString};

const DEFAULT_FRONTEND_URL: &str = "http://localhost:3001";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_JWT_EXPIRY_MINUTES: i64 = 24 * 60;
/// One year.
const MAX_JWT_EXPIRY_MINUTES: i64 = 365 * 24 * 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `sqlite:` or `postgres://` URL.
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: SecretString,
    pub jwt_expiry: Duration,
    /// Allowed CORS origin.
    pub frontend_url: String,
    pub host: String,
    pub port: u16,
    /// Administrator seeded at startup when both variables are set.
    pub admin: Option<AdminSeed>,
}

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: SecretString,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::ConfigurationError` if `JWT_SECRET` is missing or
    /// shorter than 32 bytes, or if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, DeskError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DeskError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = var("JWT_SECRET").ok_or_else(|| {
            DeskError::ConfigurationError("JWT_SECRET environment variable is required".to_owned())
        })?;
        if jwt_secret.len() < MIN_SECRET_LENGTH {
            return Err(DeskError::ConfigurationError(format!(
                "JWT_SECRET must be at least {MIN_SECRET_LENGTH} bytes"
            )));
        }

        let database_url = var("DATABASE_URL").unwrap_or_else(|| {
            format!(
                "postgres://{}:{}@{}:{}/{}",
                var("DB_USERNAME").unwrap_or_else(|| "postgres".to_owned()),
                var("DB_PASSWORD").unwrap_or_default(),
                var("DB_HOST").unwrap_or_else(|| "localhost".to_owned()),
                var("DB_PORT").unwrap_or_else(|| "5432".to_owned()),
                var("DB_NAME").unwrap_or_else(|| "eventapp".to_owned()),
            )
        });

        let admin = match (var("ADMIN_EMAIL"), var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed {
                email,
                password: SecretString::new(password),
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            db_max_connections: parse_or(var("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 5)?,
            jwt_secret: SecretString::new(jwt_secret),
            jwt_expiry: jwt_expiry(parse_or(
                var("JWT_EXPIRY_MINUTES"),
                "JWT_EXPIRY_MINUTES",
                DEFAULT_JWT_EXPIRY_MINUTES,
            )?)?,
            frontend_url: var("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_owned()),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: parse_or(var("PORT"), "PORT", DEFAULT_PORT)?,
            admin,
        })
    }

    pub fn jwt_config(&self) -> Result<JwtConfig, DeskError> {
        Ok(JwtConfig::new(self.jwt_secret.expose_secret())?.with_expiry(self.jwt_expiry))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_sqlite(&self) -> bool {
        self.database_url.starts_with("sqlite:")
    }
}

fn jwt_expiry(minutes: i64) -> Result<Duration, DeskError> {
    if !(1..=MAX_JWT_EXPIRY_MINUTES).contains(&minutes) {
        return Err(DeskError::ConfigurationError(format!(
            "JWT_EXPIRY_MINUTES must be between 1 and {MAX_JWT_EXPIRY_MINUTES}, got {minutes}"
        )));
    }

    Duration::try_minutes(minutes).ok_or_else(|| {
        DeskError::ConfigurationError(format!("JWT_EXPIRY_MINUTES is out of range: {minutes}"))
    })
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    key: &str,
    default: T,
) -> Result<T, DeskError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| DeskError::ConfigurationError(format!("{key} has an invalid value: {raw}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "a-test-secret-that-is-at-least-32-bytes";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("JWT_SECRET", SECRET)])).unwrap();

        assert_eq!(config.database_url, "postgres://postgres:@localhost:5432/eventapp");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.frontend_url, "http://localhost:3001");
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.jwt_expiry, Duration::hours(24));
        assert!(config.admin.is_none());
        assert!(!config.is_sqlite());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("DATABASE_URL", "sqlite://events.db"),
            ("PORT", "8080"),
            ("JWT_EXPIRY_MINUTES", "15"),
            ("ADMIN_EMAIL", "admin@test.com"),
            ("ADMIN_PASSWORD", "admin1234"),
        ]))
        .unwrap();

        assert!(config.is_sqlite());
        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_expiry, Duration::minutes(15));
        let admin = config.admin.unwrap();
        assert_eq!(admin.email, "admin@test.com");
        assert_eq!(admin.password.expose_secret(), "admin1234");
    }

    #[test]
    fn test_secret_is_required() {
        let missing = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(missing, DeskError::ConfigurationError(_)));

        let short = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "too-short")])).unwrap_err();
        assert!(matches!(short, DeskError::ConfigurationError(_)));
    }

    #[test]
    fn test_invalid_number() {
        let result = AppConfig::from_lookup(lookup(&[("JWT_SECRET", SECRET), ("PORT", "eighty")]));
        assert!(matches!(result, Err(DeskError::ConfigurationError(_))));
    }

    #[test]
    fn test_expiry_out_of_range() {
        for minutes in ["0", "-5", "9223372036854775807", "600000"] {
            let result = AppConfig::from_lookup(lookup(&[
                ("JWT_SECRET", SECRET),
                ("JWT_EXPIRY_MINUTES", minutes),
            ]));
            assert!(
                matches!(result, Err(DeskError::ConfigurationError(_))),
                "accepted JWT_EXPIRY_MINUTES={minutes}"
            );
        }

        let year = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("JWT_EXPIRY_MINUTES", "525600"),
        ]))
        .unwrap();
        assert_eq!(year.jwt_expiry, Duration::days(365));
    }
}
