use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{JwtClaims, JwtConfig};
use crate::DeskError;
use crate::crypto::generate_token;

const JTI_LENGTH: usize = 16;

/// Encodes and verifies session tokens.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn encode(&self, user_id: i64, email: &str) -> Result<String, DeskError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            email: email.to_owned(),
            iat: now.timestamp(),
            exp: self.expires_at(now)?,
            jti: generate_token(JTI_LENGTH),
            iss: self.config.issuer.clone(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            log::error!(target: "eventdesk", "msg=\"failed to sign token\", error=\"{e}\"");
            DeskError::Internal("failed to sign token".to_owned())
        })
    }

    /// Verifies signature, expiry and (when configured) issuer.
    pub fn decode(&self, token: &str) -> Result<JwtClaims, DeskError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        if let Some(ref iss) = self.config.issuer {
            validation.set_issuer(&[iss]);
        }

        let token_data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => DeskError::TokenExpired,
                _ => DeskError::TokenInvalid,
            })?;

        Ok(token_data.claims)
    }

    /// Decodes the token and returns the subject id.
    pub fn validate(&self, token: &str) -> Result<i64, DeskError> {
        self.decode(token)?.user_id()
    }

    pub fn expiry(&self) -> Duration {
        self.config.expiry()
    }

    /// `exp` claim for a token issued at `issued_at`.
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> Result<i64, DeskError> {
        issued_at
            .checked_add_signed(self.config.expiry)
            .map(|t| t.timestamp())
            .ok_or_else(|| {
                DeskError::ConfigurationError("token expiry is out of range".to_owned())
            })
    }
}
