use chrono::{DateTime, Utc};

use crate::validators::{validate_capacity, validate_event_text};
use crate::{DEFAULT_MAX_PARTICIPANTS, DeskError, Event, EventRepository, NewEvent};

/// Event fields as submitted by a creator.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    /// Defaults to [`DEFAULT_MAX_PARTICIPANTS`].
    pub max_participants: Option<i64>,
}

pub struct CreateEventAction<E> {
    event_repository: E,
}

impl<E: EventRepository> CreateEventAction<E> {
    pub fn new(event_repository: E) -> Self {
        Self { event_repository }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(name = "create_event", skip(self, draft), err))]
    pub async fn execute(&self, draft: EventDraft, creator_id: i64) -> Result<Event, DeskError> {
        validate_event_text("title", &draft.title)?;
        validate_event_text("description", &draft.description)?;
        validate_event_text("location", &draft.location)?;

        let max_participants = draft.max_participants.unwrap_or(DEFAULT_MAX_PARTICIPANTS);
        validate_capacity(max_participants)?;

        let event = self
            .event_repository
            .create_event(
                &NewEvent {
                    title: draft.title.trim().to_owned(),
                    description: draft.description.trim().to_owned(),
                    location: draft.location.trim().to_owned(),
                    date: draft.date,
                    max_participants,
                },
                creator_id,
            )
            .await?;

        log::info!(target: "eventdesk", "msg=\"event created\", event_id={}, creator_id={creator_id}", event.id);
        Ok(event)
    }
}

#[cfg(test)]
pub(crate) fn draft(title: &str) -> EventDraft {
    EventDraft {
        title: title.to_owned(),
        description: "An evening of talks".to_owned(),
        location: "Main hall".to_owned(),
        date: Utc::now() + chrono::Duration::days(7),
        max_participants: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockEventRepository;
    use crate::validators::ValidationError;

    #[tokio::test]
    async fn test_create_event_defaults_capacity() {
        let action = CreateEventAction::new(MockEventRepository::new());
        let event = action.execute(draft("  Rust meetup "), 7).await.unwrap();

        assert_eq!(event.title, "Rust meetup");
        assert_eq!(event.max_participants, DEFAULT_MAX_PARTICIPANTS);
        assert_eq!(event.created_by_id, 7);
    }

    #[tokio::test]
    async fn test_create_event_validation() {
        let action = CreateEventAction::new(MockEventRepository::new());

        let result = action.execute(draft(""), 7).await;
        assert_eq!(
            result.unwrap_err(),
            DeskError::Validation(ValidationError::FieldEmpty("title"))
        );

        let result = action
            .execute(
                EventDraft {
                    max_participants: Some(0),
                    ..draft("Rust meetup")
                },
                7,
            )
            .await;
        assert_eq!(
            result.unwrap_err(),
            DeskError::Validation(ValidationError::CapacityTooSmall)
        );
    }
}
