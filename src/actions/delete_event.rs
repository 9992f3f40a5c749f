use crate::{DeskError, EventRepository};

pub struct DeleteEventAction<E> {
    event_repository: E,
}

impl<E: EventRepository> DeleteEventAction<E> {
    pub fn new(event_repository: E) -> Self {
        Self { event_repository }
    }

    /// Deletes the event and its registrations.
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "delete_event", skip(self), err))]
    pub async fn execute(&self, event_id: i64, requester_id: i64) -> Result<(), DeskError> {
        let event = self
            .event_repository
            .find_event(event_id)
            .await?
            .ok_or(DeskError::EventNotFound)?;

        if !event.is_owned_by(requester_id) {
            return Err(DeskError::Forbidden(
                "You can only delete your own events".to_owned(),
            ));
        }

        self.event_repository.delete_event(event_id).await?;
        log::info!(target: "eventdesk", "msg=\"event deleted\", event_id={event_id}");
        Ok(())
    }
}
