use serde::{Deserialize, Serialize};

use crate::DeskError;

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject - the user ID.
    pub sub: String,
    /// Email at issuance. Informational only; never used for authorization.
    pub email: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    pub jti: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl JwtClaims {
    pub fn user_id(&self) -> Result<i64, DeskError> {
        match self.sub.parse::<i64>() {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(DeskError::TokenInvalid),
        }
    }
}
