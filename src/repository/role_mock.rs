#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::role::{Role, RoleRepository};
use crate::DeskError;

#[derive(Clone, Default)]
pub struct MockRoleRepository {
    pub roles: Arc<Mutex<Vec<Role>>>,
}

impl MockRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleRepository for MockRoleRepository {
    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, DeskError> {
        let roles = self.roles.lock().unwrap();
        Ok(roles.iter().find(|r| r.name == name).cloned())
    }

    async fn create_role(&self, name: &str) -> Result<Role, DeskError> {
        let mut roles = self.roles.lock().unwrap();
        if let Some(existing) = roles.iter().find(|r| r.name == name) {
            return Ok(existing.clone());
        }

        let role = Role {
            id: roles.len() as i64 + 1,
            name: name.to_owned(),
        };
        roles.push(role.clone());
        Ok(role)
    }

    async fn list_roles(&self) -> Result<Vec<Role>, DeskError> {
        Ok(self.roles.lock().unwrap().clone())
    }
}
