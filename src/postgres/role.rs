use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::{DeskError, Role, RoleRepository};

#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    pub fn new(pool: PgPool) -> Self {
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
impl RoleRepository for PostgresRoleRepository {
    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, DeskError> {
        let row: Option<RoleRecord> = sqlx::query_as("SELECT id, name FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn create_role(&self, name: &str) -> Result<Role, DeskError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row: RoleRecord = sqlx::query_as(
            "INSERT INTO roles (name) VALUES ($1) ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        Ok(row.into())
    }

    async fn list_roles(&self) -> Result<Vec<Role>, DeskError> {
        let rows: Vec<RoleRecord> = sqlx::query_as("SELECT id, name FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
