use serde::Serialize;

use crate::{CountedEvent, DeskError, Event, EventRepository, UserRepository, UserSummary};

/// An event as shown in the catalog: with its creator and live count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListing {
    #[serde(flatten)]
    pub event: Event,
    /// `None` only if the creator record is missing.
    pub created_by: Option<UserSummary>,
    pub registration_count: i64,
}

pub struct ListEventsAction<E, U> {
    event_repository: E,
    user_repository: U,
}

impl<E: EventRepository, U: UserRepository> ListEventsAction<E, U> {
    pub fn new(event_repository: E, user_repository: U) -> Self {
        Self {
            event_repository,
            user_repository,
        }
    }

    /// All events ordered by date ascending.
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "list_events", skip_all, err))]
    pub async fn execute(&self) -> Result<Vec<EventListing>, DeskError> {
        let events = self.event_repository.list_events().await?;
        attach_creators(&self.user_repository, events).await
    }
}

/// Joins each counted event with its creator's summary.
pub(crate) async fn attach_creators<U: UserRepository>(
    user_repository: &U,
    events: Vec<CountedEvent>,
) -> Result<Vec<EventListing>, DeskError> {
    let mut creator_ids: Vec<i64> = events.iter().map(|e| e.event.created_by_id).collect();
    creator_ids.sort_unstable();
    creator_ids.dedup();

    let creators = user_repository.find_user_summaries(&creator_ids).await?;

    Ok(events
        .into_iter()
        .map(|counted| EventListing {
            created_by: creators
                .iter()
                .find(|c| c.id == counted.event.created_by_id)
                .cloned(),
            event: counted.event,
            registration_count: counted.registration_count,
        })
        .collect())
}
