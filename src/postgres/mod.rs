//! `PostgreSQL` implementations of the repository traits.
//!
//! Enable the `sqlx_postgres` feature to use these implementations.

mod event;
pub mod migrations;
mod registration;
mod role;
mod user;

pub use event::PostgresEventRepository;
pub use registration::PostgresRegistrationRepository;
pub use role::PostgresRoleRepository;
use sqlx::PgPool;
pub use user::PostgresUserRepository;

/// Creates every `PostgreSQL` repository from one connection pool.
pub fn create_repositories(
    pool: PgPool,
) -> (
    PostgresUserRepository,
    PostgresRoleRepository,
    PostgresEventRepository,
    PostgresRegistrationRepository,
) {
    (
        PostgresUserRepository::new(pool.clone()),
        PostgresRoleRepository::new(pool.clone()),
        PostgresEventRepository::new(pool.clone()),
        PostgresRegistrationRepository::new(pool),
    )
}
