use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::{DeskError, NewUser, Role, User, UserRepository, UserSummary};

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_roles(&self, user_id: i64) -> Result<Vec<Role>, DeskError> {
        let rows: Vec<(i64, String)> = sqlx::query_as(
            "SELECT r.id, r.name FROM roles r INNER JOIN user_roles ur ON ur.role_id = r.id WHERE ur.user_id = $1 ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Role { id, name })
            .collect())
    }
}

#[derive(FromRow)]
struct UserRecord {
    id: i64,
    email: String,
    hashed_password: String,
    first_name: String,
    last_name: String,
    created_at: DateTime<Utc>,
}

impl UserRecord {
    fn into_user(self, roles: Vec<Role>) -> User {
        User {
            id: self.id,
            email: self.email,
            hashed_password: self.hashed_password,
            first_name: self.first_name,
            last_name: self.last_name,
            roles,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct SummaryRecord {
    id: i64,
    email: String,
    first_name: String,
    last_name: String,
}

impl From<SummaryRecord> for UserSummary {
    fn from(row: SummaryRecord) -> Self {
        UserSummary {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, DeskError> {
        let row: Option<UserRecord> = sqlx::query_as(
            "SELECT id, email, hashed_password, first_name, last_name, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => {
                let roles = self.load_roles(row.id).await?;
                Ok(Some(row.into_user(roles)))
            }
            None => Ok(None),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DeskError> {
        let row: Option<UserRecord> = sqlx::query_as(
            "SELECT id, email, hashed_password, first_name, last_name, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => {
                let roles = self.load_roles(row.id).await?;
                Ok(Some(row.into_user(roles)))
            }
            None => Ok(None),
        }
    }

    async fn create_user_with_roles(
        &self,
        user: &NewUser,
        roles: &[Role],
    ) -> Result<User, DeskError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        let row: UserRecord = sqlx::query_as(
            "INSERT INTO users (email, hashed_password, first_name, last_name) VALUES ($1, $2, $3, $4) RETURNING id, email, hashed_password, first_name, last_name, created_at",
        )
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                DeskError::UserAlreadyExists
            }
            _ => DeskError::DatabaseError(e.to_string()),
        })?;

        let role_ids: Vec<i64> = roles.iter().map(|r| r.id).collect();
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) SELECT $1, UNNEST($2::BIGINT[]) ON CONFLICT (user_id, role_id) DO NOTHING",
        )
        .bind(row.id)
        .bind(&role_ids)
        .execute(&mut *tx)
        .await
        .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        let roles = self.load_roles(row.id).await?;
        Ok(row.into_user(roles))
    }

    async fn add_role(&self, user_id: i64, role: &Role) -> Result<(), DeskError> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) ON CONFLICT (user_id, role_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(role.id)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                DeskError::UserNotFound
            }
            _ => DeskError::DatabaseError(e.to_string()),
        })?;

        Ok(())
    }

    async fn find_user_summaries(&self, ids: &[i64]) -> Result<Vec<UserSummary>, DeskError> {
        let rows: Vec<SummaryRecord> = sqlx::query_as(
            "SELECT id, email, first_name, last_name FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
