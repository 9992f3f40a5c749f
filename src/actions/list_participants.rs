use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{DeskError, EventRepository, RegistrationRepository, UserRepository, UserSummary};

/// One row of an event's roster.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub registration_id: i64,
    pub user: UserSummary,
    pub registered_at: DateTime<Utc>,
}

pub struct ListParticipantsAction<E, G, U> {
    event_repository: E,
    registration_repository: G,
    user_repository: U,
}

impl<E, G, U> ListParticipantsAction<E, G, U>
where
    E: EventRepository,
    G: RegistrationRepository,
    U: UserRepository,
{
    pub fn new(event_repository: E, registration_repository: G, user_repository: U) -> Self {
        Self {
            event_repository,
            registration_repository,
            user_repository,
        }
    }

    /// Roster of an event owned by `requester_id`, in registration order.
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "list_participants", skip(self), err))]
    pub async fn execute(
        &self,
        event_id: i64,
        requester_id: i64,
    ) -> Result<Vec<Participant>, DeskError> {
        let event = self
            .event_repository
            .find_event(event_id)
            .await?
            .ok_or(DeskError::EventNotFound)?;

        if !event.is_owned_by(requester_id) {
            return Err(DeskError::Forbidden(
                "You can only view participants of your own events".to_owned(),
            ));
        }

        let registrations = self
            .registration_repository
            .list_event_registrations(event_id)
            .await?;
        let user_ids: Vec<i64> = registrations.iter().map(|r| r.user_id).collect();
        let users = self.user_repository.find_user_summaries(&user_ids).await?;

        Ok(registrations
            .into_iter()
            .filter_map(|registration| {
                users
                    .iter()
                    .find(|u| u.id == registration.user_id)
                    .map(|user| Participant {
                        registration_id: registration.id,
                        user: user.clone(),
                        registered_at: registration.registered_at,
                    })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::create_event::{CreateEventAction, draft};
    use crate::{
        MockEventRepository, MockRegistrationRepository, MockUserRepository, NewUser,
    };

    #[tokio::test]
    async fn test_list_participants_for_creator_only() {
        let users = MockUserRepository::new();
        let mut ids = Vec::new();
        for email in ["creator@example.com", "first@example.com", "second@example.com"] {
            let user = users
                .create_user(&NewUser {
                    email: email.to_owned(),
                    hashed_password: "hash".to_owned(),
                    first_name: "Test".to_owned(),
                    last_name: "User".to_owned(),
                })
                .await
                .unwrap();
            ids.push(user.id);
        }

        let events = MockEventRepository::new();
        let registrations = MockRegistrationRepository::for_events(&events);
        let event = CreateEventAction::new(events.clone())
            .execute(draft("Rust meetup"), ids[0])
            .await
            .unwrap();
        registrations.create_registration(ids[1], event.id).await.unwrap();
        registrations.create_registration(ids[2], event.id).await.unwrap();

        let action = ListParticipantsAction::new(events, registrations, users);

        let roster = action.execute(event.id, ids[0]).await.unwrap();
        let emails: Vec<&str> = roster.iter().map(|p| p.user.email.as_str()).collect();
        assert_eq!(emails, vec!["first@example.com", "second@example.com"]);

        assert!(matches!(
            action.execute(event.id, ids[1]).await.unwrap_err(),
            DeskError::Forbidden(_)
        ));
        assert_eq!(
            action.execute(999, ids[0]).await.unwrap_err(),
            DeskError::EventNotFound
        );
    }
}
