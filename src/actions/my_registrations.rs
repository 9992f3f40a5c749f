use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{DeskError, Event, RegistrationRepository, UserRepository, UserSummary};

/// One of the caller's registrations together with the event it is for.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistration {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub registered_at: DateTime<Utc>,
    pub event: RegisteredEventView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredEventView {
    #[serde(flatten)]
    pub event: Event,
    pub created_by: Option<UserSummary>,
}

pub struct MyRegistrationsAction<G, U> {
    registration_repository: G,
    user_repository: U,
}

impl<G: RegistrationRepository, U: UserRepository> MyRegistrationsAction<G, U> {
    pub fn new(registration_repository: G, user_repository: U) -> Self {
        Self {
            registration_repository,
            user_repository,
        }
    }

    /// Never fails: storage errors and invalid ids produce an empty list.
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "my_registrations", skip(self)))]
    pub async fn execute(&self, user_id: i64) -> Vec<UserRegistration> {
        if user_id <= 0 {
            log::error!(target: "eventdesk", "msg=\"invalid user id for registrations lookup\", user_id={user_id}");
            return Vec::new();
        }

        match self.load(user_id).await {
            Ok(registrations) => registrations,
            Err(e) => {
                log::error!(target: "eventdesk", "msg=\"failed to load user registrations\", user_id={user_id}, error=\"{e}\"");
                Vec::new()
            }
        }
    }

    async fn load(&self, user_id: i64) -> Result<Vec<UserRegistration>, DeskError> {
        let registered = self
            .registration_repository
            .list_user_registrations(user_id)
            .await?;

        let mut creator_ids: Vec<i64> = registered.iter().map(|r| r.event.created_by_id).collect();
        creator_ids.sort_unstable();
        creator_ids.dedup();
        let creators = self.user_repository.find_user_summaries(&creator_ids).await?;

        Ok(registered
            .into_iter()
            .map(|r| UserRegistration {
                id: r.registration.id,
                user_id: r.registration.user_id,
                event_id: r.registration.event_id,
                registered_at: r.registration.registered_at,
                event: RegisteredEventView {
                    created_by: creators
                        .iter()
                        .find(|c| c.id == r.event.created_by_id)
                        .cloned(),
                    event: r.event,
                },
            })
            .collect())
    }
}
