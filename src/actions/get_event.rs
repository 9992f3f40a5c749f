use super::list_events::{EventListing, attach_creators};
use crate::{
    CountedEvent, DeskError, EventRepository, RegistrationRepository, UserRepository,
};

pub struct GetEventAction<E, U, G> {
    event_repository: E,
    user_repository: U,
    registration_repository: G,
}

impl<E: EventRepository, U: UserRepository, G: RegistrationRepository> GetEventAction<E, U, G> {
    pub fn new(event_repository: E, user_repository: U, registration_repository: G) -> Self {
        Self {
            event_repository,
            user_repository,
            registration_repository,
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(name = "get_event", skip(self), err))]
    pub async fn execute(&self, event_id: i64) -> Result<EventListing, DeskError> {
        let event = self
            .event_repository
            .find_event(event_id)
            .await?
            .ok_or(DeskError::EventNotFound)?;
        let registration_count = self
            .registration_repository
            .count_registrations(event_id)
            .await?;

        attach_creators(
            &self.user_repository,
            vec![CountedEvent {
                event,
                registration_count,
            }],
        )
        .await?
        .pop()
        .ok_or(DeskError::EventNotFound)
    }
}
