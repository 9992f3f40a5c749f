#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use super::role::Role;
use super::user::{NewUser, User, UserRepository, UserSummary};
use crate::DeskError;

#[derive(Clone)]
pub struct MockUserRepository {
    pub users: Arc<Mutex<Vec<User>>>,
    next_id: Arc<AtomicI64>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(vec![])),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, DeskError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DeskError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user_with_roles(
        &self,
        user: &NewUser,
        roles: &[Role],
    ) -> Result<User, DeskError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(DeskError::UserAlreadyExists);
        }

        let mut granted: Vec<Role> = Vec::new();
        for role in roles {
            if !granted.iter().any(|r| r.id == role.id) {
                granted.push(role.clone());
            }
        }

        let created = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            email: user.email.clone(),
            hashed_password: user.hashed_password.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            roles: granted,
            created_at: Utc::now(),
        };
        users.push(created.clone());

        Ok(created)
    }

    async fn add_role(&self, user_id: i64, role: &Role) -> Result<(), DeskError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(DeskError::UserNotFound)?;

        if !user.roles.iter().any(|r| r.id == role.id) {
            user.roles.push(role.clone());
        }
        Ok(())
    }

    async fn find_user_summaries(&self, ids: &[i64]) -> Result<Vec<UserSummary>, DeskError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .map(User::summary)
            .collect())
    }
}
