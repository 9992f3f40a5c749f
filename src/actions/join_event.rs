use crate::{DeskError, EventRepository, Registration, RegistrationRepository};

/// Registers a user for an event, subject to uniqueness and capacity.
pub struct JoinEventAction<E, G> {
    event_repository: E,
    registration_repository: G,
}

impl<E: EventRepository, G: RegistrationRepository> JoinEventAction<E, G> {
    pub fn new(event_repository: E, registration_repository: G) -> Self {
        Self {
            event_repository,
            registration_repository,
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(name = "join_event", skip(self), err))]
    pub async fn execute(&self, user_id: i64, event_id: i64) -> Result<Registration, DeskError> {
        if self.event_repository.find_event(event_id).await?.is_none() {
            return Err(DeskError::EventNotFound);
        }

        if self
            .registration_repository
            .find_registration(user_id, event_id)
            .await?
            .is_some()
        {
            return Err(DeskError::AlreadyRegistered);
        }

        // The repository re-checks all three conditions atomically.
        let registration = self
            .registration_repository
            .create_registration(user_id, event_id)
            .await?;

        log::info!(target: "eventdesk", "msg=\"registered for event\", user_id={user_id}, event_id={event_id}");
        Ok(registration)
    }
}
