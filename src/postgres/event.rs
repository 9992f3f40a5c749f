use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::{CountedEvent, DeskError, Event, EventRepository, NewEvent};

#[derive(Clone)]
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct EventRecord {
    id: i64,
    title: String,
    description: String,
    location: String,
    date: DateTime<Utc>,
    max_participants: i64,
    created_by_id: i64,
    created_at: DateTime<Utc>,
}

impl From<EventRecord> for Event {
    fn from(row: EventRecord) -> Self {
        Event {
            id: row.id,
            title: row.title,
            description: row.description,
            location: row.location,
            date: row.date,
            max_participants: row.max_participants,
            created_by_id: row.created_by_id,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct CountedEventRecord {
    #[sqlx(flatten)]
    event: EventRecord,
    registration_count: i64,
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn create_event(&self, event: &NewEvent, creator_id: i64) -> Result<Event, DeskError> {
        let row: EventRecord = sqlx::query_as(
            "INSERT INTO events (title, description, location, date, max_participants, created_by_id) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id, title, description, location, date, max_participants, created_by_id, created_at",
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.date)
        .bind(event.max_participants)
        .bind(creator_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        Ok(row.into())
    }

    async fn find_event(&self, id: i64) -> Result<Option<Event>, DeskError> {
        let row: Option<EventRecord> = sqlx::query_as(
            "SELECT id, title, description, location, date, max_participants, created_by_id, created_at FROM events WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn list_events(&self) -> Result<Vec<CountedEvent>, DeskError> {
        let rows: Vec<CountedEventRecord> = sqlx::query_as(
            r"
            SELECT e.id, e.title, e.description, e.location, e.date, e.max_participants,
                   e.created_by_id, e.created_at,
                   COUNT(r.id) AS registration_count
            FROM events e
            LEFT JOIN event_registrations r ON r.event_id = e.id
            GROUP BY e.id
            ORDER BY e.date ASC, e.id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| CountedEvent {
                event: row.event.into(),
                registration_count: row.registration_count,
            })
            .collect())
    }

    async fn update_event(&self, event: &Event) -> Result<Event, DeskError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        // Same lock as registration, so no seat can be taken between the
        // count and the write.
        let locked: Option<i64> =
            sqlx::query_scalar("SELECT id FROM events WHERE id = $1 FOR UPDATE")
                .bind(event.id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        if locked.is_none() {
            return Err(DeskError::EventNotFound);
        }

        let registered: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM event_registrations WHERE event_id = $1")
                .bind(event.id)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        if event.max_participants < registered {
            return Err(DeskError::CapacityBelowRegistrations { registered });
        }

        let row: EventRecord = sqlx::query_as(
            "UPDATE events SET title = $1, description = $2, location = $3, date = $4, max_participants = $5 WHERE id = $6 RETURNING id, title, description, location, date, max_participants, created_by_id, created_at",
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.date)
        .bind(event.max_participants)
        .bind(event.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        Ok(row.into())
    }

    async fn delete_event(&self, id: i64) -> Result<(), DeskError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM event_registrations WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DeskError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DeskError::EventNotFound);
        }

        tx.commit()
            .await
            .map_err(|e| DeskError::DatabaseError(e.to_string()))
    }
}
