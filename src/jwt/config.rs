use chrono::Duration;
use std::fmt;

use crate::DeskError;

/// Minimum accepted secret length in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

#[derive(Clone)]
pub struct JwtConfig {
    pub(crate) secret: String,
    /// Default: 24 hours.
    pub(crate) expiry: Duration,
    pub(crate) issuer: Option<String>,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl JwtConfig {
    /// # Errors
    ///
    /// Returns `DeskError::ConfigurationError` if the secret is shorter than
    /// [`MIN_SECRET_LENGTH`] bytes.
    pub fn new(secret: impl Into<String>) -> Result<Self, DeskError> {
        let secret = secret.into();

        if secret.len() < MIN_SECRET_LENGTH {
            return Err(DeskError::ConfigurationError(format!(
                "JWT secret must be at least {MIN_SECRET_LENGTH} bytes, got {}",
                secret.len()
            )));
        }

        Ok(Self {
            secret,
            expiry: Duration::hours(24),
            issuer: None,
        })
    }

    #[must_use]
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_too_short() {
        let err = JwtConfig::new("short").unwrap_err();
        assert!(
            matches!(err, DeskError::ConfigurationError(ref msg) if msg.contains("32 bytes")),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = JwtConfig::new("a-very-long-secret-that-is-32-bytes!").unwrap();
        let printed = format!("{config:?}");
        assert!(printed.contains("[REDACTED]"));
        assert!(!printed.contains("a-very-long-secret"));
    }
}
