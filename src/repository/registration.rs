use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Event;
use crate::DeskError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub registered_at: DateTime<Utc>,
}

/// A user's registration joined with the event it refers to.
#[derive(Debug, Clone)]
pub struct RegisteredEvent {
    pub registration: Registration,
    pub event: Event,
}

#[async_trait]
pub trait RegistrationRepository {
    async fn find_registration(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<Registration>, DeskError>;

    /// Inserts a registration if, at write time, the event exists, the pair
    /// is not yet registered and the live count is below the event's
    /// capacity. The check and the insert are atomic with respect to other
    /// callers.
    ///
    /// # Errors
    ///
    /// `EventNotFound`, `AlreadyRegistered` or `EventFull` when the respective
    /// condition holds at write time.
    async fn create_registration(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Registration, DeskError>;

    /// # Errors
    ///
    /// `RegistrationNotFound` if the pair is not registered.
    async fn delete_registration(&self, user_id: i64, event_id: i64) -> Result<(), DeskError>;

    async fn count_registrations(&self, event_id: i64) -> Result<i64, DeskError>;

    /// Ordered by registration time.
    async fn list_event_registrations(
        &self,
        event_id: i64,
    ) -> Result<Vec<Registration>, DeskError>;

    /// Ordered by event date.
    async fn list_user_registrations(
        &self,
        user_id: i64,
    ) -> Result<Vec<RegisteredEvent>, DeskError>;
}
