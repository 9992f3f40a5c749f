use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

use crate::{DeskError, Role, RoleRepository};

#[derive(Clone)]
pub struct SqliteRoleRepository {
    pool: SqlitePool,
}

impl SqliteRoleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct RoleRecord {
    id: i64,
    name: String,
}

impl From<RoleRecord> for Role {
    fn from(row: RoleRecord) -> Self {
        Role {
            id: row.id,
            name: row.name,
        }
    }
}

#[async_trait]
impl RoleRepository for SqliteRoleRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, DeskError> {
        let row: Option<RoleRecord> = sqlx::query_as("SELECT id, name FROM roles WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                log::error!(target: "eventdesk", "msg=\"database error\", operation=\"find_role_by_name\", error=\"{e}\"");
                DeskError::DatabaseError(e.to_string())
            })?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn create_role(&self, name: &str) -> Result<Role, DeskError> {
        sqlx::query("INSERT INTO roles (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                log::error!(target: "eventdesk", "msg=\"database error\", operation=\"create_role\", error=\"{e}\"");
                DeskError::DatabaseError(e.to_string())
            })?;

        self.find_role_by_name(name)
            .await?
            .ok_or_else(|| DeskError::Internal(format!("role {name} missing after insert")))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn list_roles(&self) -> Result<Vec<Role>, DeskError> {
        let rows: Vec<RoleRecord> = sqlx::query_as("SELECT id, name FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                log::error!(target: "eventdesk", "msg=\"database error\", operation=\"list_roles\", error=\"{e}\"");
                DeskError::DatabaseError(e.to_string())
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
