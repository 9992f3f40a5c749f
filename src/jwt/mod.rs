//! Signed session tokens (HS256 JWT).
//!
//! Tokens carry the account id as `sub`; roles are deliberately absent so that
//! authorization always reads the live role assignments (see
//! [`AuthenticateAction`](crate::actions::AuthenticateAction)).
//!
//! ```ignore
//! use eventdesk::jwt::{JwtConfig, JwtService};
//!
//! let config = JwtConfig::new(std::env::var("JWT_SECRET")?)?
//!     .with_expiry(chrono::Duration::hours(24));
//! let service = JwtService::new(config);
//! let token = service.encode(user_id, "user@example.com")?;
//! let claims = service.decode(&token)?;
//! ```

mod claims;
mod config;
mod service;

pub use claims::JwtClaims;
pub use config::{JwtConfig, MIN_SECRET_LENGTH};
pub use service::JwtService;
