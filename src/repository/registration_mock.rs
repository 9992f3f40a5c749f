#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use super::event::Event;
use super::event_mock::MockEventRepository;
use super::registration::{RegisteredEvent, Registration, RegistrationRepository};
use crate::DeskError;

#[derive(Clone)]
pub struct MockRegistrationRepository {
    events: Arc<Mutex<Vec<Event>>>,
    pub registrations: Arc<Mutex<Vec<Registration>>>,
    next_id: Arc<AtomicI64>,
}

impl MockRegistrationRepository {
    /// Shares storage with `events` so capacity reads and cascade deletes see
    /// the same data.
    pub fn for_events(events: &MockEventRepository) -> Self {
        Self {
            events: Arc::clone(&events.events),
            registrations: Arc::clone(&events.registrations),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

#[async_trait]
impl RegistrationRepository for MockRegistrationRepository {
    async fn find_registration(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<Registration>, DeskError> {
        let registrations = self.registrations.lock().unwrap();
        Ok(registrations
            .iter()
            .find(|r| r.user_id == user_id && r.event_id == event_id)
            .cloned())
    }

    async fn create_registration(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Registration, DeskError> {
        let events = self.events.lock().unwrap();
        let mut registrations = self.registrations.lock().unwrap();

        let event = events
            .iter()
            .find(|e| e.id == event_id)
            .ok_or(DeskError::EventNotFound)?;

        if registrations
            .iter()
            .any(|r| r.user_id == user_id && r.event_id == event_id)
        {
            return Err(DeskError::AlreadyRegistered);
        }

        let taken = registrations.iter().filter(|r| r.event_id == event_id).count() as i64;
        if taken >= event.max_participants {
            return Err(DeskError::EventFull);
        }

        let registration = Registration {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id,
            event_id,
            registered_at: Utc::now(),
        };
        registrations.push(registration.clone());

        Ok(registration)
    }

    async fn delete_registration(&self, user_id: i64, event_id: i64) -> Result<(), DeskError> {
        let mut registrations = self.registrations.lock().unwrap();
        let len_before = registrations.len();
        registrations.retain(|r| !(r.user_id == user_id && r.event_id == event_id));
        if registrations.len() == len_before {
            return Err(DeskError::RegistrationNotFound);
        }
        Ok(())
    }

    async fn count_registrations(&self, event_id: i64) -> Result<i64, DeskError> {
        let registrations = self.registrations.lock().unwrap();
        Ok(registrations.iter().filter(|r| r.event_id == event_id).count() as i64)
    }

    async fn list_event_registrations(
        &self,
        event_id: i64,
    ) -> Result<Vec<Registration>, DeskError> {
        let registrations = self.registrations.lock().unwrap();
        let mut found: Vec<Registration> = registrations
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        found.sort_by_key(|r| (r.registered_at, r.id));
        Ok(found)
    }

    async fn list_user_registrations(
        &self,
        user_id: i64,
    ) -> Result<Vec<RegisteredEvent>, DeskError> {
        let events = self.events.lock().unwrap();
        let registrations = self.registrations.lock().unwrap();

        let mut found: Vec<RegisteredEvent> = registrations
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| {
                events
                    .iter()
                    .find(|e| e.id == r.event_id)
                    .map(|event| RegisteredEvent {
                        registration: r.clone(),
                        event: event.clone(),
                    })
            })
            .collect();
        found.sort_by_key(|re| (re.event.date, re.event.id));
        Ok(found)
    }
}
