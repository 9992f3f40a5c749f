use chrono::Utc;

use super::Session;
use crate::crypto::{Argon2Hasher, PasswordHasher};
use crate::jwt::JwtService;
use crate::validators::normalize_email;
use crate::{DeskError, UserRepository};

pub struct LoginAction<U> {
    user_repository: U,
    jwt: JwtService,
    hasher: Argon2Hasher,
}

impl<U: UserRepository> LoginAction<U> {
    pub fn new(user_repository: U, jwt: JwtService) -> Self {
        Self {
            user_repository,
            jwt,
            hasher: Argon2Hasher::default(),
        }
    }

    /// Unknown accounts and wrong passwords both fail with
    /// `InvalidCredentials`.
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "login", skip_all, err))]
    pub async fn execute(&self, email: &str, password: &str) -> Result<Session, DeskError> {
        let email = normalize_email(email);

        let Some(user) = self.user_repository.find_user_by_email(&email).await? else {
            log::info!(target: "eventdesk", "msg=\"login failed\", reason=\"unknown account\"");
            return Err(DeskError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.hashed_password)? {
            log::info!(target: "eventdesk", "msg=\"login failed\", reason=\"wrong password\", user_id={}", user.id);
            return Err(DeskError::InvalidCredentials);
        }

        let token = self.jwt.encode(user.id, &user.email)?;
        let expires_at = self.jwt.expires_at(Utc::now())?;

        Ok(Session {
            token,
            expires_at,
            user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtConfig;
    use crate::{MockUserRepository, User};

    #[tokio::test]
    async fn test_login_action() {
        let user_repo = MockUserRepository::new();
        let hashed = Argon2Hasher::default().hash("securepassword").unwrap();
        let user = User::mock_from_credentials("user@email.com", &hashed);
        user_repo.users.lock().unwrap().push(user);

        let jwt =
            JwtService::new(JwtConfig::new("a-test-secret-that-is-at-least-32-bytes").unwrap());
        let login = LoginAction::new(user_repo, jwt.clone());

        let session = login.execute("User@Email.com", "securepassword").await.unwrap();
        assert_eq!(session.user.email, "user@email.com");
        assert_eq!(jwt.validate(&session.token).unwrap(), session.user.id);
        assert!(session.expires_at > Utc::now().timestamp());

        let failed_attempt = login.execute("user@email.com", "wrongpassword").await;
        assert_eq!(failed_attempt.unwrap_err(), DeskError::InvalidCredentials);

        let failed_attempt = login.execute("wrong@email.com", "securepassword").await;
        assert_eq!(failed_attempt.unwrap_err(), DeskError::InvalidCredentials);
    }
}
