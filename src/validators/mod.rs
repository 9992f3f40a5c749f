//! Input validation applied before any request reaches storage.

pub mod email;
pub mod event;
pub mod name;
pub mod password;

pub use email::{normalize_email, validate_email};
pub use event::{validate_capacity, validate_event_text};
pub use name::validate_name;
pub use password::{PasswordPolicy, validate_password};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmailEmpty,
    EmailTooLong,
    EmailInvalidFormat,
    PasswordEmpty,
    PasswordTooShort(usize),
    PasswordTooLong(usize),
    NameEmpty(&'static str),
    NameTooLong(&'static str),
    FieldEmpty(&'static str),
    FieldTooLong(&'static str, usize),
    CapacityTooSmall,
    /// The request body could not be parsed.
    MalformedBody(String),
    /// A path segment did not parse, e.g. a non-numeric id.
    MalformedPath(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailEmpty => write!(f, "Email cannot be empty"),
            Self::EmailTooLong => write!(f, "Email is too long (max 254 characters)"),
            Self::EmailInvalidFormat => write!(f, "Invalid email format"),
            Self::PasswordEmpty => write!(f, "Password cannot be empty"),
            Self::PasswordTooShort(min) => write!(f, "Password must be at least {min} characters"),
            Self::PasswordTooLong(max) => {
                write!(f, "Password is too long (max {max} characters)")
            }
            Self::NameEmpty(field) => write!(f, "{field} cannot be empty"),
            Self::NameTooLong(field) => write!(f, "{field} is too long (max 100 characters)"),
            Self::FieldEmpty(field) => write!(f, "{field} cannot be empty"),
            Self::FieldTooLong(field, max) => {
                write!(f, "{field} is too long (max {max} characters)")
            }
            Self::CapacityTooSmall => write!(f, "maxParticipants must be at least 1"),
            Self::MalformedBody(detail) => write!(f, "Invalid request body: {detail}"),
            Self::MalformedPath(detail) => write!(f, "Invalid path parameter: {detail}"),
        }
    }
}

impl std::error::Error for ValidationError {}
