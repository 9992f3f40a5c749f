use crate::validators::ValidationError;
use crate::{DeskError, RoleRepository, User, UserRepository};

/// Grants a named role to an account. Callers are responsible for checking
/// that the requester is an administrator.
pub struct AssignRoleAction<U, R> {
    user_repository: U,
    role_repository: R,
}

impl<U: UserRepository, R: RoleRepository> AssignRoleAction<U, R> {
    pub fn new(user_repository: U, role_repository: R) -> Self {
        Self {
            user_repository,
            role_repository,
        }
    }

    /// Returns the account with its updated roles. Granting a role the
    /// account already holds changes nothing.
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "assign_role", skip(self), err))]
    pub async fn execute(&self, user_id: i64, role_name: &str) -> Result<User, DeskError> {
        let role_name = role_name.trim();
        if role_name.is_empty() {
            return Err(ValidationError::FieldEmpty("roleName").into());
        }

        let mut user = self
            .user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or(DeskError::UserNotFound)?;

        let role = self
            .role_repository
            .find_role_by_name(role_name)
            .await?
            .ok_or_else(|| DeskError::RoleNotFound(role_name.to_owned()))?;

        if !user.has_role(&role.name) {
            self.user_repository.add_role(user.id, &role).await?;
            log::info!(target: "eventdesk", "msg=\"role assigned\", user_id={}, role=\"{}\"", user.id, role.name);
            user.roles.push(role);
        }

        Ok(user)
    }
}
