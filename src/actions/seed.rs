//! Startup seeding: the built-in roles and an optional administrator.

use crate::crypto::{Argon2Hasher, PasswordHasher};
use crate::validators::{normalize_email, validate_email, validate_password};
use crate::{ADMIN_ROLE, DeskError, NewUser, Role, RoleRepository, USER_ROLE, User, UserRepository};

/// Ensures `ADMIN` and `USER` exist. Safe to run on every start.
pub struct SeedRolesAction<R> {
    role_repository: R,
}

impl<R: RoleRepository> SeedRolesAction<R> {
    pub fn new(role_repository: R) -> Self {
        Self { role_repository }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(name = "seed_roles", skip_all, err))]
    pub async fn execute(&self) -> Result<Vec<Role>, DeskError> {
        let mut seeded = Vec::with_capacity(2);
        for name in [ADMIN_ROLE, USER_ROLE] {
            seeded.push(self.role_repository.create_role(name).await?);
        }

        log::info!(target: "eventdesk", "msg=\"roles seeded\", count={}", seeded.len());
        Ok(seeded)
    }
}

/// Creates the configured administrator, or grants `ADMIN` to an existing
/// account with that email.
pub struct SeedAdminAction<U, R> {
    user_repository: U,
    role_repository: R,
    hasher: Argon2Hasher,
}

impl<U: UserRepository, R: RoleRepository> SeedAdminAction<U, R> {
    pub fn new(user_repository: U, role_repository: R) -> Self {
        Self {
            user_repository,
            role_repository,
            hasher: Argon2Hasher::default(),
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(name = "seed_admin", skip_all, err))]
    pub async fn execute(&self, email: &str, password: &str) -> Result<User, DeskError> {
        let email = normalize_email(email);
        validate_email(&email)?;

        let admin = self
            .role_repository
            .find_role_by_name(ADMIN_ROLE)
            .await?
            .ok_or_else(|| DeskError::RoleNotFound(ADMIN_ROLE.to_owned()))?;

        let mut user = match self.user_repository.find_user_by_email(&email).await? {
            Some(user) => user,
            None => {
                validate_password(password)?;
                let hashed_password = self.hasher.hash(password)?;
                let user = self
                    .user_repository
                    .create_user_with_roles(
                        &NewUser {
                            email,
                            hashed_password,
                            first_name: "Admin".to_owned(),
                            last_name: "User".to_owned(),
                        },
                        std::slice::from_ref(&admin),
                    )
                    .await?;
                log::info!(target: "eventdesk", "msg=\"admin account created\", user_id={}", user.id);
                user
            }
        };

        if !user.has_role(ADMIN_ROLE) {
            self.user_repository.add_role(user.id, &admin).await?;
            user.roles.push(admin);
        }

        Ok(user)
    }
}
