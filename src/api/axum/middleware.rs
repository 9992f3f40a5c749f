use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::error::ApiError;
use super::routes::AppState;
use crate::actions::AuthenticateAction;
use crate::{
    ADMIN_ROLE, DeskError, EventRepository, RegistrationRepository, RoleRepository, User,
    UserRepository,
};

/// validates the bearer token and loads the current user with fresh roles
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn into_inner(self) -> User {
        self.0
    }

    pub fn user(&self) -> &User {
        &self.0
    }
}

/// an [`AuthenticatedUser`] holding the `ADMIN` role
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned)
}

impl<U, R, E, G> FromRequestParts<AppState<U, R, E, G>> for AuthenticatedUser
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: RegistrationRepository + Clone + Send + Sync + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<U, R, E, G>,
    ) -> Result<Self, Self::Rejection> {
        let token =
            extract_bearer_token(&parts.headers).ok_or(ApiError(DeskError::TokenInvalid))?;

        let user = AuthenticateAction::new(state.user_repo.clone(), state.jwt.clone())
            .execute(&token)
            .await?;

        Ok(AuthenticatedUser(user))
    }
}

impl<U, R, E, G> FromRequestParts<AppState<U, R, E, G>> for AdminUser
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: RegistrationRepository + Clone + Send + Sync + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<U, R, E, G>,
    ) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !user.has_role(ADMIN_ROLE) {
            return Err(ApiError(DeskError::Forbidden(
                "Admin role required".to_owned(),
            )));
        }

        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers).as_deref(), Some("abc.def.ghi"));
    }
}
