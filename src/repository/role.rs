use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::DeskError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

#[async_trait]
pub trait RoleRepository {
    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, DeskError>;

    /// Returns the existing role if `name` is already registered.
    async fn create_role(&self, name: &str) -> Result<Role, DeskError>;

    async fn list_roles(&self) -> Result<Vec<Role>, DeskError>;
}
