use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;
use crate::DeskError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Always stored normalized (trimmed, lowercase).
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.name == name)
    }

    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.name.clone()).collect()
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

#[cfg(any(test, feature = "mocks"))]
impl User {
    pub fn mock_from_credentials(email: &str, hashed_password: &str) -> Self {
        User {
            id: 1,
            email: email.to_owned(),
            hashed_password: hashed_password.to_owned(),
            first_name: "Test".to_owned(),
            last_name: "User".to_owned(),
            roles: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Public identity of another account: no roles, no credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub first_name: String,
    pub last_name: String,
}

#[async_trait]
pub trait UserRepository {
    /// Loads the account together with its current roles.
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, DeskError>;

    /// `email` must already be normalized.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DeskError>;

    /// Fails with `UserAlreadyExists` when the email is taken, including when
    /// a concurrent insert wins the unique index.
    async fn create_user(&self, user: &NewUser) -> Result<User, DeskError> {
        self.create_user_with_roles(user, &[]).await
    }

    /// Stores the account and its role links in one unit of work. On error
    /// nothing is stored.
    ///
    /// # Errors
    ///
    /// `UserAlreadyExists` as for [`create_user`](Self::create_user).
    async fn create_user_with_roles(
        &self,
        user: &NewUser,
        roles: &[Role],
    ) -> Result<User, DeskError>;

    /// Idempotent: granting a role the user already holds is a no-op.
    async fn add_role(&self, user_id: i64, role: &Role) -> Result<(), DeskError>;

    /// Summaries for the given ids; unknown ids are skipped.
    async fn find_user_summaries(&self, ids: &[i64]) -> Result<Vec<UserSummary>, DeskError>;
}
