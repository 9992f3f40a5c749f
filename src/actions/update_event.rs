use crate::validators::{validate_capacity, validate_event_text};
use crate::{DeskError, Event, EventChanges, EventRepository};

pub struct UpdateEventAction<E> {
    event_repository: E,
}

impl<E: EventRepository> UpdateEventAction<E> {
    pub fn new(event_repository: E) -> Self {
        Self { event_repository }
    }

    /// Applies `changes` to an event owned by `requester_id`. Omitted fields
    /// keep their stored values.
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "update_event", skip(self, changes), err))]
    pub async fn execute(
        &self,
        event_id: i64,
        changes: EventChanges,
        requester_id: i64,
    ) -> Result<Event, DeskError> {
        let mut event = self
            .event_repository
            .find_event(event_id)
            .await?
            .ok_or(DeskError::EventNotFound)?;

        if !event.is_owned_by(requester_id) {
            return Err(DeskError::Forbidden(
                "You can only update your own events".to_owned(),
            ));
        }

        let changes = normalize(changes)?;
        event.apply(changes);

        self.event_repository.update_event(&event).await
    }
}

fn normalize(changes: EventChanges) -> Result<EventChanges, DeskError> {
    let text = |field: &'static str, value: Option<String>| -> Result<Option<String>, DeskError> {
        match value {
            Some(value) => {
                validate_event_text(field, &value)?;
                Ok(Some(value.trim().to_owned()))
            }
            None => Ok(None),
        }
    };

    if let Some(max_participants) = changes.max_participants {
        validate_capacity(max_participants)?;
    }

    Ok(EventChanges {
        title: text("title", changes.title)?,
        description: text("description", changes.description)?,
        location: text("location", changes.location)?,
        date: changes.date,
        max_participants: changes.max_participants,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::create_event::{CreateEventAction, draft};
    use crate::validators::ValidationError;
    use crate::{MockEventRepository, MockRegistrationRepository, RegistrationRepository};

    #[tokio::test]
    async fn test_update_event_partial_by_owner() {
        let events = MockEventRepository::new();
        let event = CreateEventAction::new(events.clone())
            .execute(draft("Rust meetup"), 1)
            .await
            .unwrap();

        let updated = UpdateEventAction::new(events)
            .execute(
                event.id,
                EventChanges {
                    location: Some("Room 2".to_owned()),
                    ..Default::default()
                },
                1,
            )
            .await
            .unwrap();

        assert_eq!(updated.location, "Room 2");
        assert_eq!(updated.title, "Rust meetup");
        assert_eq!(updated.max_participants, event.max_participants);
    }

    #[tokio::test]
    async fn test_update_event_rejects_non_owner_and_bad_fields() {
        let events = MockEventRepository::new();
        let event = CreateEventAction::new(events.clone())
            .execute(draft("Rust meetup"), 1)
            .await
            .unwrap();
        let action = UpdateEventAction::new(events);

        let result = action.execute(event.id, EventChanges::default(), 2).await;
        assert!(matches!(result.unwrap_err(), DeskError::Forbidden(_)));

        let result = action
            .execute(
                event.id,
                EventChanges {
                    title: Some("   ".to_owned()),
                    ..Default::default()
                },
                1,
            )
            .await;
        assert_eq!(
            result.unwrap_err(),
            DeskError::Validation(ValidationError::FieldEmpty("title"))
        );

        let result = action.execute(999, EventChanges::default(), 1).await;
        assert_eq!(result.unwrap_err(), DeskError::EventNotFound);
    }

    #[tokio::test]
    async fn test_update_event_capacity_below_live_count() {
        let events = MockEventRepository::new();
        let registrations = MockRegistrationRepository::for_events(&events);
        let event = CreateEventAction::new(events.clone())
            .execute(draft("Rust meetup"), 1)
            .await
            .unwrap();
        registrations.create_registration(2, event.id).await.unwrap();
        registrations.create_registration(3, event.id).await.unwrap();

        let action = UpdateEventAction::new(events);
        let shrink = |max| EventChanges {
            max_participants: Some(max),
            ..Default::default()
        };

        assert_eq!(
            action.execute(event.id, shrink(1), 1).await.unwrap_err(),
            DeskError::CapacityBelowRegistrations { registered: 2 }
        );
        assert_eq!(
            action.execute(event.id, shrink(2), 1).await.unwrap().max_participants,
            2
        );
    }
}
