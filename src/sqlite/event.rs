use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{CountedEvent, DeskError, Event, EventRepository, NewEvent};

#[derive(Clone)]
pub struct SqliteEventRepository {
    pool: SqlitePool,
}

impl SqliteEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
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
impl EventRepository for SqliteEventRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, event), err))]
    async fn create_event(&self, event: &NewEvent, creator_id: i64) -> Result<Event, DeskError> {
        let row: EventRecord = sqlx::query_as(
            "INSERT INTO events (title, description, location, date, max_participants, created_by_id, created_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id, title, description, location, date, max_participants, created_by_id, created_at",
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.date)
        .bind(event.max_participants)
        .bind(creator_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            log::error!(target: "eventdesk", "msg=\"database error\", operation=\"create_event\", error=\"{e}\"");
            DeskError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_event(&self, id: i64) -> Result<Option<Event>, DeskError> {
        let row: Option<EventRecord> = sqlx::query_as(
            "SELECT id, title, description, location, date, max_participants, created_by_id, created_at FROM events WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!(target: "eventdesk", "msg=\"database error\", operation=\"find_event\", error=\"{e}\"");
            DeskError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn list_events(&self) -> Result<Vec<CountedEvent>, DeskError> {
        let rows: Vec<CountedEventRecord> = sqlx::query_as(
            r"
            SELECT e.id, e.title, e.description, e.location, e.date, e.max_participants,
                   e.created_by_id, e.created_at,
                   (SELECT COUNT(*) FROM event_registrations r WHERE r.event_id = e.id) AS registration_count
            FROM events e
            ORDER BY e.date ASC, e.id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            log::error!(target: "eventdesk", "msg=\"database error\", operation=\"list_events\", error=\"{e}\"");
            DeskError::DatabaseError(e.to_string())
        })?;

        Ok(rows
            .into_iter()
            .map(|row| CountedEvent {
                event: row.event.into(),
                registration_count: row.registration_count,
            })
            .collect())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, event), fields(event_id = event.id), err))]
    async fn update_event(&self, event: &Event) -> Result<Event, DeskError> {
        let db_error = |e: sqlx::Error| {
            log::error!(target: "eventdesk", "msg=\"database error\", operation=\"update_event\", error=\"{e}\"");
            DeskError::DatabaseError(e.to_string())
        };

        // The capacity guard and the write are one statement.
        let row: Option<EventRecord> = sqlx::query_as(
            r"
            UPDATE events
            SET title = ?1, description = ?2, location = ?3, date = ?4, max_participants = ?5
            WHERE id = ?6
              AND ?5 >= (SELECT COUNT(*) FROM event_registrations WHERE event_id = ?6)
            RETURNING id, title, description, location, date, max_participants, created_by_id, created_at
            ",
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.date)
        .bind(event.max_participants)
        .bind(event.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        if let Some(row) = row {
            return Ok(row.into());
        }

        let (exists, registered): (bool, i64) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM events WHERE id = ?1), (SELECT COUNT(*) FROM event_registrations WHERE event_id = ?1)",
        )
        .bind(event.id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        if exists {
            Err(DeskError::CapacityBelowRegistrations { registered })
        } else {
            Err(DeskError::EventNotFound)
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn delete_event(&self, id: i64) -> Result<(), DeskError> {
        let db_error = |e: sqlx::Error| {
            log::error!(target: "eventdesk", "msg=\"database error\", operation=\"delete_event\", error=\"{e}\"");
            DeskError::DatabaseError(e.to_string())
        };

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM event_registrations WHERE event_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DeskError::EventNotFound);
        }

        tx.commit().await.map_err(db_error)
    }
}
