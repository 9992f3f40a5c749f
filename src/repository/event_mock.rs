#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use super::event::{CountedEvent, Event, EventRepository, NewEvent};
use super::registration::Registration;
use crate::DeskError;

/// In-memory event catalog.
///
/// Owns the registration list as well so that deleting an event can cascade;
/// [`MockRegistrationRepository::for_events`](super::MockRegistrationRepository::for_events)
/// shares it. Locks are always taken events first, then registrations.
#[derive(Clone)]
pub struct MockEventRepository {
    pub events: Arc<Mutex<Vec<Event>>>,
    pub registrations: Arc<Mutex<Vec<Registration>>>,
    next_id: Arc<AtomicI64>,
}

impl MockEventRepository {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(vec![])),
            registrations: Arc::new(Mutex::new(vec![])),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for MockEventRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventRepository for MockEventRepository {
    async fn create_event(&self, event: &NewEvent, creator_id: i64) -> Result<Event, DeskError> {
        let created = Event {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            date: event.date,
            max_participants: event.max_participants,
            created_by_id: creator_id,
            created_at: Utc::now(),
        };
        self.events.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn find_event(&self, id: i64) -> Result<Option<Event>, DeskError> {
        let events = self.events.lock().unwrap();
        Ok(events.iter().find(|e| e.id == id).cloned())
    }

    async fn list_events(&self) -> Result<Vec<CountedEvent>, DeskError> {
        let events = self.events.lock().unwrap();
        let registrations = self.registrations.lock().unwrap();

        let mut listed: Vec<CountedEvent> = events
            .iter()
            .map(|event| CountedEvent {
                event: event.clone(),
                registration_count: registrations
                    .iter()
                    .filter(|r| r.event_id == event.id)
                    .count() as i64,
            })
            .collect();
        listed.sort_by(|a, b| (a.event.date, a.event.id).cmp(&(b.event.date, b.event.id)));

        Ok(listed)
    }

    async fn update_event(&self, event: &Event) -> Result<Event, DeskError> {
        let mut events = self.events.lock().unwrap();
        let registrations = self.registrations.lock().unwrap();
        let stored = events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or(DeskError::EventNotFound)?;

        let registered = registrations.iter().filter(|r| r.event_id == event.id).count() as i64;
        if event.max_participants < registered {
            return Err(DeskError::CapacityBelowRegistrations { registered });
        }

        stored.title.clone_from(&event.title);
        stored.description.clone_from(&event.description);
        stored.location.clone_from(&event.location);
        stored.date = event.date;
        stored.max_participants = event.max_participants;

        Ok(stored.clone())
    }

    async fn delete_event(&self, id: i64) -> Result<(), DeskError> {
        let mut events = self.events.lock().unwrap();
        let mut registrations = self.registrations.lock().unwrap();

        let len_before = events.len();
        events.retain(|e| e.id != id);
        if events.len() == len_before {
            return Err(DeskError::EventNotFound);
        }
        registrations.retain(|r| r.event_id != id);

        Ok(())
    }
}
