use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{DeskError, Event, RegisteredEvent, Registration, RegistrationRepository};

#[derive(Clone)]
pub struct SqliteRegistrationRepository {
    pool: SqlitePool,
}

impl SqliteRegistrationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct RegistrationRecord {
    id: i64,
    user_id: i64,
    event_id: i64,
    registered_at: DateTime<Utc>,
}

impl From<RegistrationRecord> for Registration {
    fn from(row: RegistrationRecord) -> Self {
        Registration {
            id: row.id,
            user_id: row.user_id,
            event_id: row.event_id,
            registered_at: row.registered_at,
        }
    }
}

#[derive(FromRow)]
struct RegisteredEventRecord {
    id: i64,
    user_id: i64,
    event_id: i64,
    registered_at: DateTime<Utc>,
    title: String,
    description: String,
    location: String,
    date: DateTime<Utc>,
    max_participants: i64,
    created_by_id: i64,
    created_at: DateTime<Utc>,
}

impl From<RegisteredEventRecord> for RegisteredEvent {
    fn from(row: RegisteredEventRecord) -> Self {
        RegisteredEvent {
            registration: Registration {
                id: row.id,
                user_id: row.user_id,
                event_id: row.event_id,
                registered_at: row.registered_at,
            },
            event: Event {
                id: row.event_id,
                title: row.title,
                description: row.description,
                location: row.location,
                date: row.date,
                max_participants: row.max_participants,
                created_by_id: row.created_by_id,
                created_at: row.created_at,
            },
        }
    }
}

#[async_trait]
impl RegistrationRepository for SqliteRegistrationRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_registration(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<Registration>, DeskError> {
        let row: Option<RegistrationRecord> = sqlx::query_as(
            "SELECT id, user_id, event_id, registered_at FROM event_registrations WHERE user_id = ? AND event_id = ?",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!(target: "eventdesk", "msg=\"database error\", operation=\"find_registration\", error=\"{e}\"");
            DeskError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn create_registration(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Registration, DeskError> {
        // SQLite serializes writers, so the capacity subquery and the insert
        // observe the same state.
        let row: Option<RegistrationRecord> = sqlx::query_as(
            r"
            INSERT INTO event_registrations (user_id, event_id, registered_at)
            SELECT ?, e.id, ?
            FROM events e
            WHERE e.id = ?
              AND (SELECT COUNT(*) FROM event_registrations r WHERE r.event_id = e.id) < e.max_participants
            ON CONFLICT(user_id, event_id) DO NOTHING
            RETURNING id, user_id, event_id, registered_at
            ",
        )
        .bind(user_id)
        .bind(Utc::now())
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!(target: "eventdesk", "msg=\"database error\", operation=\"create_registration\", error=\"{e}\"");
            DeskError::DatabaseError(e.to_string())
        })?;

        if let Some(row) = row {
            return Ok(row.into());
        }

        // Nothing inserted; work out which condition failed.
        let (event_exists, already_registered): (bool, bool) = sqlx::query_as(
            r"
            SELECT EXISTS(SELECT 1 FROM events WHERE id = ?1),
                   EXISTS(SELECT 1 FROM event_registrations WHERE user_id = ?2 AND event_id = ?1)
            ",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            log::error!(target: "eventdesk", "msg=\"database error\", operation=\"create_registration\", error=\"{e}\"");
            DeskError::DatabaseError(e.to_string())
        })?;

        if !event_exists {
            Err(DeskError::EventNotFound)
        } else if already_registered {
            Err(DeskError::AlreadyRegistered)
        } else {
            Err(DeskError::EventFull)
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn delete_registration(&self, user_id: i64, event_id: i64) -> Result<(), DeskError> {
        let result =
            sqlx::query("DELETE FROM event_registrations WHERE user_id = ? AND event_id = ?")
                .bind(user_id)
                .bind(event_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    log::error!(target: "eventdesk", "msg=\"database error\", operation=\"delete_registration\", error=\"{e}\"");
                    DeskError::DatabaseError(e.to_string())
                })?;

        if result.rows_affected() == 0 {
            return Err(DeskError::RegistrationNotFound);
        }

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn count_registrations(&self, event_id: i64) -> Result<i64, DeskError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM event_registrations WHERE event_id = ?")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                log::error!(target: "eventdesk", "msg=\"database error\", operation=\"count_registrations\", error=\"{e}\"");
                DeskError::DatabaseError(e.to_string())
            })
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn list_event_registrations(
        &self,
        event_id: i64,
    ) -> Result<Vec<Registration>, DeskError> {
        let rows: Vec<RegistrationRecord> = sqlx::query_as(
            "SELECT id, user_id, event_id, registered_at FROM event_registrations WHERE event_id = ? ORDER BY registered_at ASC, id ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            log::error!(target: "eventdesk", "msg=\"database error\", operation=\"list_event_registrations\", error=\"{e}\"");
            DeskError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn list_user_registrations(
        &self,
        user_id: i64,
    ) -> Result<Vec<RegisteredEvent>, DeskError> {
        let rows: Vec<RegisteredEventRecord> = sqlx::query_as(
            r"
            SELECT r.id, r.user_id, r.event_id, r.registered_at,
                   e.title, e.description, e.location, e.date, e.max_participants,
                   e.created_by_id, e.created_at
            FROM event_registrations r
            INNER JOIN events e ON e.id = r.event_id
            WHERE r.user_id = ?
            ORDER BY e.date ASC, e.id ASC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            log::error!(target: "eventdesk", "msg=\"database error\", operation=\"list_user_registrations\", error=\"{e}\"");
            DeskError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
