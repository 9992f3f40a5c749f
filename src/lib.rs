//! Event management backend.
//!
//! Accounts with roles, an event catalog owned by creators, and a
//! registration ledger that enforces one seat per user and per-event
//! capacity. Storage sits behind async repository traits with in-memory,
//! `SQLite` and `PostgreSQL` implementations; [`api::axum`] exposes the HTTP
//! surface.

pub mod actions;
pub mod api;
pub mod config;
pub mod crypto;
pub mod jwt;
mod repository;
mod secret;
pub mod validators;

#[cfg(feature = "sqlx_postgres")]
pub mod postgres;
#[cfg(feature = "sqlx_sqlite")]
pub mod sqlite;

pub use repository::{
    CountedEvent, DEFAULT_MAX_PARTICIPANTS, Event, EventChanges, EventRepository, NewEvent,
    NewUser, RegisteredEvent, Registration, RegistrationRepository, Role, RoleRepository, User,
    UserRepository, UserSummary,
};
#[cfg(any(test, feature = "mocks"))]
pub use repository::{
    MockEventRepository, MockRegistrationRepository, MockRoleRepository, MockUserRepository,
};
pub use secret::SecretString;

use std::fmt;

use validators::ValidationError;

/// Name of the administrator role.
pub const ADMIN_ROLE: &str = "ADMIN";
/// Name of the role every new account receives.
pub const USER_ROLE: &str = "USER";

/// Broad classification of a [`DeskError`], used at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    Unauthorized,
    Conflict,
    Validation,
    Internal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeskError {
    UserNotFound,
    UserAlreadyExists,
    InvalidCredentials,
    TokenExpired,
    TokenInvalid,
    /// The token verified but its subject no longer resolves to an account.
    UnknownSubject,
    Forbidden(String),
    EventNotFound,
    RegistrationNotFound,
    RoleNotFound(String),
    AlreadyRegistered,
    EventFull,
    CapacityBelowRegistrations { registered: i64 },
    Validation(ValidationError),
    PasswordHashError,
    DatabaseError(String),
    ConfigurationError(String),
    Internal(String),
}

impl DeskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound
            | Self::EventNotFound
            | Self::RegistrationNotFound
            | Self::RoleNotFound(_) => ErrorKind::NotFound,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::UnknownSubject => ErrorKind::Unauthorized,
            Self::UserAlreadyExists
            | Self::AlreadyRegistered
            | Self::EventFull
            | Self::CapacityBelowRegistrations { .. } => ErrorKind::Conflict,
            Self::Validation(_) => ErrorKind::Validation,
            Self::PasswordHashError
            | Self::DatabaseError(_)
            | Self::ConfigurationError(_)
            | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenInvalid => "TOKEN_INVALID",
            Self::UnknownSubject => "UNKNOWN_SUBJECT",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::EventNotFound => "EVENT_NOT_FOUND",
            Self::RegistrationNotFound => "REGISTRATION_NOT_FOUND",
            Self::RoleNotFound(_) => "ROLE_NOT_FOUND",
            Self::AlreadyRegistered => "ALREADY_REGISTERED",
            Self::EventFull => "EVENT_FULL",
            Self::CapacityBelowRegistrations { .. } => "CAPACITY_BELOW_REGISTRATIONS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::PasswordHashError => "PASSWORD_HASH_ERROR",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::ConfigurationError(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl std::error::Error for DeskError {}

impl fmt::Display for DeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserNotFound => write!(f, "User not found"),
            Self::UserAlreadyExists => write!(f, "Email already exists"),
            Self::InvalidCredentials => write!(f, "Invalid credentials"),
            Self::TokenExpired => write!(f, "Token has expired"),
            Self::TokenInvalid => write!(f, "Invalid token"),
            Self::UnknownSubject => write!(f, "User not found"),
            Self::Forbidden(msg) => write!(f, "{msg}"),
            Self::EventNotFound => write!(f, "Event not found"),
            Self::RegistrationNotFound => write!(f, "Registration not found"),
            Self::RoleNotFound(name) => write!(f, "Role {name} not found"),
            Self::AlreadyRegistered => write!(f, "User is already registered for this event"),
            Self::EventFull => write!(f, "Event is full"),
            Self::CapacityBelowRegistrations { registered } => write!(
                f,
                "maxParticipants cannot be lower than the {registered} current registrations"
            ),
            Self::Validation(err) => write!(f, "{err}"),
            Self::PasswordHashError => write!(f, "Failed to hash password"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl From<ValidationError> for DeskError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicts_share_a_kind() {
        assert_eq!(DeskError::UserAlreadyExists.kind(), ErrorKind::Conflict);
        assert_eq!(DeskError::AlreadyRegistered.kind(), ErrorKind::Conflict);
        assert_eq!(DeskError::EventFull.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_unknown_subject_is_unauthorized() {
        assert_eq!(DeskError::UnknownSubject.kind(), ErrorKind::Unauthorized);
        assert_eq!(DeskError::UserNotFound.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = DeskError::from(ValidationError::EmailInvalidFormat);
        assert_eq!(err.to_string(), "Invalid email format");
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}
