use chrono::Utc;

use super::Session;
use crate::crypto::{Argon2Hasher, PasswordHasher};
use crate::jwt::JwtService;
use crate::validators::{normalize_email, validate_email, validate_name, validate_password};
use crate::{DeskError, NewUser, RoleRepository, USER_ROLE, UserRepository};

/// Input for [`RegisterAction`].
#[derive(Debug, Clone)]
pub struct SignupForm<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

pub struct RegisterAction<U, R> {
    user_repository: U,
    role_repository: R,
    jwt: JwtService,
    hasher: Argon2Hasher,
}

impl<U: UserRepository, R: RoleRepository> RegisterAction<U, R> {
    pub fn new(user_repository: U, role_repository: R, jwt: JwtService) -> Self {
        Self {
            user_repository,
            role_repository,
            jwt,
            hasher: Argon2Hasher::default(),
        }
    }

    #[must_use]
    pub fn with_hasher(mut self, hasher: Argon2Hasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Creates the account, grants `USER` and signs a session token.
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "register", skip_all, err))]
    pub async fn execute(&self, form: SignupForm<'_>) -> Result<Session, DeskError> {
        let email = normalize_email(form.email);
        validate_email(&email)?;
        validate_password(form.password)?;
        validate_name("firstName", form.first_name)?;
        validate_name("lastName", form.last_name)?;

        if self.user_repository.find_user_by_email(&email).await?.is_some() {
            return Err(DeskError::UserAlreadyExists);
        }

        let roles = match self.role_repository.find_role_by_name(USER_ROLE).await? {
            Some(role) => vec![role],
            None => {
                log::warn!(target: "eventdesk", "msg=\"default role missing, account created without roles\", role=\"{USER_ROLE}\"");
                Vec::new()
            }
        };

        let hashed_password = self.hasher.hash(form.password)?;
        let user = self
            .user_repository
            .create_user_with_roles(
                &NewUser {
                    email,
                    hashed_password,
                    first_name: form.first_name.trim().to_owned(),
                    last_name: form.last_name.trim().to_owned(),
                },
                &roles,
            )
            .await?;

        let token = self.jwt.encode(user.id, &user.email)?;
        let expires_at = self.jwt.expires_at(Utc::now())?;

        log::info!(target: "eventdesk", "msg=\"user registered\", user_id={}", user.id);

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
    use crate::validators::ValidationError;
    use crate::{MockRoleRepository, MockUserRepository, Role, User, UserSummary};
    use async_trait::async_trait;

    /// Stores accounts normally but cannot grant roles afterwards.
    #[derive(Clone, Default)]
    struct NoRoleGrants(MockUserRepository);

    #[async_trait]
    impl UserRepository for NoRoleGrants {
        async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, DeskError> {
            self.0.find_user_by_id(id).await
        }

        async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DeskError> {
            self.0.find_user_by_email(email).await
        }

        async fn create_user_with_roles(
            &self,
            user: &NewUser,
            roles: &[Role],
        ) -> Result<User, DeskError> {
            self.0.create_user_with_roles(user, roles).await
        }

        async fn add_role(&self, _user_id: i64, _role: &Role) -> Result<(), DeskError> {
            Err(DeskError::DatabaseError("connection reset".to_owned()))
        }

        async fn find_user_summaries(&self, ids: &[i64]) -> Result<Vec<UserSummary>, DeskError> {
            self.0.find_user_summaries(ids).await
        }
    }

    fn jwt() -> JwtService {
        JwtService::new(JwtConfig::new("a-test-secret-that-is-at-least-32-bytes").unwrap())
    }

    fn form<'a>(email: &'a str, password: &'a str) -> SignupForm<'a> {
        SignupForm {
            email,
            password,
            first_name: "Ada",
            last_name: "Lovelace",
        }
    }

    #[tokio::test]
    async fn test_register_normalizes_email_and_grants_user_role() {
        let users = MockUserRepository::new();
        let roles = MockRoleRepository::new();
        roles.create_role(USER_ROLE).await.unwrap();

        let action = RegisterAction::new(users.clone(), roles, jwt());
        let session = action
            .execute(form("  Ada@Example.COM ", "password123"))
            .await
            .unwrap();

        assert_eq!(session.user.email, "ada@example.com");
        assert!(session.user.has_role(USER_ROLE));
        assert_eq!(jwt().validate(&session.token).unwrap(), session.user.id);

        let stored = users.users.lock().unwrap();
        assert_ne!(stored[0].hashed_password, "password123");
        assert!(stored[0].has_role(USER_ROLE));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_differs_only_in_case() {
        let action =
            RegisterAction::new(MockUserRepository::new(), MockRoleRepository::new(), jwt());
        action.execute(form("a@b.com", "password123")).await.unwrap();

        let result = action.execute(form("A@B.com", "password456")).await;
        assert_eq!(result.unwrap_err(), DeskError::UserAlreadyExists);
    }

    #[tokio::test]
    async fn test_register_without_seeded_role_still_succeeds() {
        let action =
            RegisterAction::new(MockUserRepository::new(), MockRoleRepository::new(), jwt());
        let session = action.execute(form("a@b.com", "password123")).await.unwrap();
        assert!(session.user.roles.is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_input() {
        let action =
            RegisterAction::new(MockUserRepository::new(), MockRoleRepository::new(), jwt());

        let result = action.execute(form("not-an-email", "password123")).await;
        assert_eq!(
            result.unwrap_err(),
            DeskError::Validation(ValidationError::EmailInvalidFormat)
        );

        let result = action.execute(form("a@b.com", "short")).await;
        assert!(matches!(
            result.unwrap_err(),
            DeskError::Validation(ValidationError::PasswordTooShort(_))
        ));

        let result = action
            .execute(SignupForm {
                first_name: "  ",
                ..form("a@b.com", "password123")
            })
            .await;
        assert_eq!(
            result.unwrap_err(),
            DeskError::Validation(ValidationError::NameEmpty("firstName"))
        );
    }

    #[tokio::test]
    async fn test_register_stores_account_and_role_together() {
        let users = NoRoleGrants::default();
        let roles = MockRoleRepository::new();
        roles.create_role(USER_ROLE).await.unwrap();

        let action = RegisterAction::new(users.clone(), roles, jwt());
        let session = action.execute(form("a@b.com", "password123")).await.unwrap();
        assert!(session.user.has_role(USER_ROLE));

        let stored = users.0.users.lock().unwrap().clone();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].has_role(USER_ROLE));

        let login = crate::actions::LoginAction::new(users, jwt())
            .execute("a@b.com", "password123")
            .await
            .unwrap();
        assert_eq!(login.user.id, session.user.id);
    }
}
