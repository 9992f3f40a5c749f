//! Use cases, one struct per operation.
//!
//! Each action owns the repositories it needs and exposes a single
//! `execute` method. Actions are generic over the repository traits so the
//! same code runs against the in-memory, `SQLite` and `PostgreSQL` stores.

pub mod assign_role;
pub mod authenticate;
pub mod cancel_registration;
pub mod create_event;
pub mod delete_event;
pub mod get_event;
pub mod get_profile;
pub mod join_event;
pub mod list_events;
pub mod list_participants;
pub mod login;
pub mod my_registrations;
pub mod register;
pub mod seed;
pub mod update_event;

pub use assign_role::AssignRoleAction;
pub use authenticate::AuthenticateAction;
pub use cancel_registration::CancelRegistrationAction;
pub use create_event::{CreateEventAction, EventDraft};
pub use delete_event::DeleteEventAction;
pub use get_event::GetEventAction;
pub use get_profile::GetProfileAction;
pub use join_event::JoinEventAction;
pub use list_events::{EventListing, ListEventsAction};
pub use list_participants::{ListParticipantsAction, Participant};
pub use login::LoginAction;
pub use my_registrations::{MyRegistrationsAction, RegisteredEventView, UserRegistration};
pub use register::{RegisterAction, SignupForm};
pub use seed::{SeedAdminAction, SeedRolesAction};
pub use update_event::UpdateEventAction;

use crate::User;

/// A freshly issued session token with the account it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    /// Unix seconds.
    pub expires_at: i64,
    pub user: User,
}
