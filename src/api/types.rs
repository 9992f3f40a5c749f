use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::actions::EventDraft;
use crate::{DeskError, EventChanges, SecretString, User};

// Request DTOs

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: SecretString,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub max_participants: Option<i64>,
}

impl From<CreateEventRequest> for EventDraft {
    fn from(body: CreateEventRequest) -> Self {
        EventDraft {
            title: body.title,
            description: body.description,
            location: body.location,
            date: body.date,
            max_participants: body.max_participants,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub max_participants: Option<i64>,
}

impl From<UpdateEventRequest> for EventChanges {
    fn from(body: UpdateEventRequest) -> Self {
        EventChanges {
            title: body.title,
            description: body.description,
            location: body.location,
            date: body.date,
            max_participants: body.max_participants,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    pub role_name: String,
}

// Response DTOs

/// The caller's own account as returned by auth and profile endpoints.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            roles: user.role_names(),
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Body of a successful register or login. `access_token` keeps its
/// snake_case name for existing clients.
#[derive(Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserProfile,
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("access_token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Error body. `message` and `error` carry the same text; dashboards read
/// `message`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, code: &str) -> Self {
        let message = message.into();
        ErrorResponse {
            error: message.clone(),
            message,
            code: code.to_owned(),
        }
    }
}

impl From<&DeskError> for ErrorResponse {
    fn from(err: &DeskError) -> Self {
        ErrorResponse::new(err.to_string(), err.code())
    }
}
