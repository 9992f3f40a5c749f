//! Repository traits and data types.
//!
//! Storage is reached only through these traits, so actions and handlers are
//! generic over the backend.
//!
//! | Trait | Description |
//! |-------|-------------|
//! | [`UserRepository`] | Accounts and their role assignments |
//! | [`RoleRepository`] | The role registry |
//! | [`EventRepository`] | Event catalog, cascade delete |
//! | [`RegistrationRepository`] | Registration ledger with atomic capacity check |
//!
//! Enable the `mocks` feature for in-memory implementations.

mod event;
mod registration;
mod role;
mod user;

#[cfg(any(test, feature = "mocks"))]
mod event_mock;
#[cfg(any(test, feature = "mocks"))]
mod registration_mock;
#[cfg(any(test, feature = "mocks"))]
mod role_mock;
#[cfg(any(test, feature = "mocks"))]
mod user_mock;

pub use event::{
    CountedEvent, DEFAULT_MAX_PARTICIPANTS, Event, EventChanges, EventRepository, NewEvent,
};
pub use registration::{RegisteredEvent, Registration, RegistrationRepository};
pub use role::{Role, RoleRepository};
pub use user::{NewUser, User, UserRepository, UserSummary};

#[cfg(any(test, feature = "mocks"))]
pub use event_mock::MockEventRepository;
#[cfg(any(test, feature = "mocks"))]
pub use registration_mock::MockRegistrationRepository;
#[cfg(any(test, feature = "mocks"))]
pub use role_mock::MockRoleRepository;
#[cfg(any(test, feature = "mocks"))]
pub use user_mock::MockUserRepository;
