//! `SQLite` implementations of the repository traits.
//!
//! Enable the `sqlx_sqlite` feature to use these implementations. Run
//! [`migrations::run`] before constructing the repositories.

mod event;
pub mod migrations;
mod registration;
mod role;
mod user;

pub use event::SqliteEventRepository;
pub use registration::SqliteRegistrationRepository;
pub use role::SqliteRoleRepository;
use sqlx::SqlitePool;
pub use user::SqliteUserRepository;

/// Creates every `SQLite` repository from one connection pool.
pub fn create_repositories(
    pool: SqlitePool,
) -> (
    SqliteUserRepository,
    SqliteRoleRepository,
    SqliteEventRepository,
    SqliteRegistrationRepository,
) {
    (
        SqliteUserRepository::new(pool.clone()),
        SqliteRoleRepository::new(pool.clone()),
        SqliteEventRepository::new(pool.clone()),
        SqliteRegistrationRepository::new(pool),
    )
}
