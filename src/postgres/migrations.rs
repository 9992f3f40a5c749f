//! Embedded `PostgreSQL` migrations.
//!
//! ```rust,ignore
//! use eventdesk::postgres::migrations;
//! use sqlx::PgPool;
//!
//! async fn setup_database(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//!     migrations::run(pool).await
//! }
//! ```

use sqlx::PgPool;

/// Creates `users`, `roles`, `user_roles`, `events` and
/// `event_registrations`, tracked in sqlx's `_sqlx_migrations` table.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations/postgres").run(pool).await
}
