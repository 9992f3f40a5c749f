use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::{DeskError, NewUser, Role, User, UserRepository, UserSummary};

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load_roles(&self, user_id: i64) -> Result<Vec<Role>, DeskError> {
        sqlx::query_as::<_, RoleRecord>(
            "SELECT r.id, r.name FROM roles r INNER JOIN user_roles ur ON ur.role_id = r.id WHERE ur.user_id = ? ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map(|rows| rows.into_iter().map(Into::into).collect())
        .map_err(|e| {
            log::error!(target: "eventdesk", "msg=\"database error\", operation=\"load_roles\", error=\"{e}\"");
            DeskError::DatabaseError(e.to_string())
        })
    }

    async fn with_roles(&self, row: Option<UserRecord>) -> Result<Option<User>, DeskError> {
        match row {
            Some(row) => {
                let roles = self.load_roles(row.id).await?;
                Ok(Some(row.into_user(roles)))
            }
            None => Ok(None),
        }
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
impl UserRepository for SqliteUserRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, DeskError> {
        let row: Option<UserRecord> = sqlx::query_as(
            "SELECT id, email, hashed_password, first_name, last_name, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!(target: "eventdesk", "msg=\"database error\", operation=\"find_user_by_id\", error=\"{e}\"");
            DeskError::DatabaseError(e.to_string())
        })?;

        self.with_roles(row).await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, email), err))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DeskError> {
        let row: Option<UserRecord> = sqlx::query_as(
            "SELECT id, email, hashed_password, first_name, last_name, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!(target: "eventdesk", "msg=\"database error\", operation=\"find_user_by_email\", error=\"{e}\"");
            DeskError::DatabaseError(e.to_string())
        })?;

        self.with_roles(row).await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, user, roles), err))]
    async fn create_user_with_roles(
        &self,
        user: &NewUser,
        roles: &[Role],
    ) -> Result<User, DeskError> {
        let db_error = |e: sqlx::Error| {
            log::error!(target: "eventdesk", "msg=\"database error\", operation=\"create_user\", error=\"{e}\"");
            DeskError::DatabaseError(e.to_string())
        };

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let row: UserRecord = sqlx::query_as(
            "INSERT INTO users (email, hashed_password, first_name, last_name, created_at) VALUES (?, ?, ?, ?, ?) RETURNING id, email, hashed_password, first_name, last_name, created_at",
        )
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                DeskError::UserAlreadyExists
            }
            _ => db_error(e),
        })?;

        for role in roles {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?, ?) ON CONFLICT DO NOTHING")
                .bind(row.id)
                .bind(role.id)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;

        let roles = self.load_roles(row.id).await?;
        Ok(row.into_user(roles))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, role), err))]
    async fn add_role(&self, user_id: i64, role: &Role) -> Result<(), DeskError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                log::error!(target: "eventdesk", "msg=\"database error\", operation=\"add_role\", error=\"{e}\"");
                DeskError::DatabaseError(e.to_string())
            })?;

        if !exists {
            return Err(DeskError::UserNotFound);
        }

        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?, ?) ON CONFLICT DO NOTHING")
            .bind(user_id)
            .bind(role.id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                log::error!(target: "eventdesk", "msg=\"database error\", operation=\"add_role\", error=\"{e}\"");
                DeskError::DatabaseError(e.to_string())
            })?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_user_summaries(&self, ids: &[i64]) -> Result<Vec<UserSummary>, DeskError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT id, email, first_name, last_name FROM users WHERE id IN (",
        );
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows: Vec<SummaryRecord> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                log::error!(target: "eventdesk", "msg=\"database error\", operation=\"find_user_summaries\", error=\"{e}\"");
                DeskError::DatabaseError(e.to_string())
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
