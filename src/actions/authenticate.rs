use crate::jwt::JwtService;
use crate::{DeskError, User, UserRepository};

/// Resolves a bearer token to the current account.
///
/// The user and roles are re-read on every call, so role grants take effect
/// immediately and tokens for vanished accounts stop working.
pub struct AuthenticateAction<U> {
    user_repository: U,
    jwt: JwtService,
}

impl<U: UserRepository> AuthenticateAction<U> {
    pub fn new(user_repository: U, jwt: JwtService) -> Self {
        Self {
            user_repository,
            jwt,
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(name = "authenticate", skip_all, err))]
    pub async fn execute(&self, token: &str) -> Result<User, DeskError> {
        let user_id = self.jwt.validate(token)?;

        self.user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or(DeskError::UnknownSubject)
    }
}
