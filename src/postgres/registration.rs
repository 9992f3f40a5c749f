use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::{DeskError, Event, RegisteredEvent, Registration, RegistrationRepository};

#[derive(Clone)]
pub struct PostgresRegistrationRepository {
    pool: PgPool,
}

impl PostgresRegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
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
impl RegistrationRepository for PostgresRegistrationRepository {
    async fn find_registration(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<Registration>, DeskError> {
        let row: Option<RegistrationRecord> = sqlx::query_as(
            "SELECT id, user_id, event_id, registered_at FROM event_registrations WHERE user_id = $1 AND event_id = $2",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn create_registration(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Registration, DeskError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        // Row lock on the event serializes concurrent registrations for it
        // until this transaction ends.
        let max_participants: Option<i64> =
            sqlx::query_scalar("SELECT max_participants FROM events WHERE id = $1 FOR UPDATE")
                .bind(event_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        let Some(max_participants) = max_participants else {
            return Err(DeskError::EventNotFound);
        };

        let (taken, already_registered): (i64, bool) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(BOOL_OR(user_id = $2), FALSE) FROM event_registrations WHERE event_id = $1",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        if already_registered {
            return Err(DeskError::AlreadyRegistered);
        }
        if taken >= max_participants {
            return Err(DeskError::EventFull);
        }

        let row: Option<RegistrationRecord> = sqlx::query_as(
            "INSERT INTO event_registrations (user_id, event_id) VALUES ($1, $2) ON CONFLICT (user_id, event_id) DO NOTHING RETURNING id, user_id, event_id, registered_at",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        let Some(row) = row else {
            return Err(DeskError::AlreadyRegistered);
        };

        tx.commit()
            .await
            .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        Ok(row.into())
    }

    async fn delete_registration(&self, user_id: i64, event_id: i64) -> Result<(), DeskError> {
        let result =
            sqlx::query("DELETE FROM event_registrations WHERE user_id = $1 AND event_id = $2")
                .bind(user_id)
                .bind(event_id)
                .execute(&self.pool)
                .await
                .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DeskError::RegistrationNotFound);
        }

        Ok(())
    }

    async fn count_registrations(&self, event_id: i64) -> Result<i64, DeskError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM event_registrations WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DeskError::DatabaseError(e.to_string()))
    }

    async fn list_event_registrations(
        &self,
        event_id: i64,
    ) -> Result<Vec<Registration>, DeskError> {
        let rows: Vec<RegistrationRecord> = sqlx::query_as(
            "SELECT id, user_id, event_id, registered_at FROM event_registrations WHERE event_id = $1 ORDER BY registered_at ASC, id ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

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
            WHERE r.user_id = $1
            ORDER BY e.date ASC, e.id ASC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
