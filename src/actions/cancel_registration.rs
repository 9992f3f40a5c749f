use crate::{DeskError, RegistrationRepository};

pub struct CancelRegistrationAction<G> {
    registration_repository: G,
}

impl<G: RegistrationRepository> CancelRegistrationAction<G> {
    pub fn new(registration_repository: G) -> Self {
        Self {
            registration_repository,
        }
    }

    /// Fails with `RegistrationNotFound` if the user holds no registration
    /// for the event, including when it was already cancelled.
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "cancel_registration", skip(self), err))]
    pub async fn execute(&self, user_id: i64, event_id: i64) -> Result<(), DeskError> {
        self.registration_repository
            .delete_registration(user_id, event_id)
            .await?;

        log::info!(target: "eventdesk", "msg=\"registration cancelled\", user_id={user_id}, event_id={event_id}");
        Ok(())
    }
}
