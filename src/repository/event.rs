use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DeskError;

/// Default capacity when a creator does not supply one.
pub const DEFAULT_MAX_PARTICIPANTS: i64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub max_participants: i64,
    /// Fixed at creation.
    pub created_by_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.created_by_id == user_id
    }

    /// Overwrites only the fields present in `changes`.
    pub fn apply(&mut self, changes: EventChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(location) = changes.location {
            self.location = location;
        }
        if let Some(date) = changes.date {
            self.date = date;
        }
        if let Some(max_participants) = changes.max_participants {
            self.max_participants = max_participants;
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub max_participants: i64,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub max_participants: Option<i64>,
}

/// An event with its live registration count.
#[derive(Debug, Clone)]
pub struct CountedEvent {
    pub event: Event,
    pub registration_count: i64,
}

#[async_trait]
pub trait EventRepository {
    async fn create_event(&self, event: &NewEvent, creator_id: i64) -> Result<Event, DeskError>;

    async fn find_event(&self, id: i64) -> Result<Option<Event>, DeskError>;

    /// All events ordered by date ascending (ties broken by id).
    async fn list_events(&self) -> Result<Vec<CountedEvent>, DeskError>;

    /// Persists the mutable fields of `event`. `created_by_id` is never written.
    ///
    /// # Errors
    ///
    /// `EventNotFound`, or `CapacityBelowRegistrations` if
    /// `event.max_participants` is below the live registration count at
    /// write time.
    async fn update_event(&self, event: &Event) -> Result<Event, DeskError>;

    /// Removes the event and all of its registrations in one unit of work.
    async fn delete_event(&self, id: i64) -> Result<(), DeskError>;
}
