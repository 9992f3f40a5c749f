//! Embedded migrations for `SQLite`.
//!
//! ```rust,ignore
//! use eventdesk::sqlite::migrations;
//! use sqlx::SqlitePool;
//!
//! async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
//!     migrations::run(pool).await
//! }
//! ```

use sqlx::{Executor, SqlitePool};

const MIGRATIONS: &[(&str, &str)] = &[
    (
        "20250101000001_create_users_and_roles",
        include_str!("../../migrations_sqlite/20250101000001_create_users_and_roles.sql"),
    ),
    (
        "20250101000002_create_events",
        include_str!("../../migrations_sqlite/20250101000002_create_events.sql"),
    ),
    (
        "20250101000003_create_event_registrations",
        include_str!("../../migrations_sqlite/20250101000003_create_event_registrations.sql"),
    ),
];

/// Applies pending migrations in order, tracking them in
/// `_eventdesk_migrations`.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    pool.execute(
        r"
        CREATE TABLE IF NOT EXISTS _eventdesk_migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        ",
    )
    .await?;

    for (name, sql) in MIGRATIONS {
        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _eventdesk_migrations WHERE name = ?)")
                .bind(*name)
                .fetch_one(pool)
                .await?;

        if applied {
            continue;
        }

        // One statement per execute. Migration files must not contain
        // semicolons inside string literals.
        for statement in sql.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                pool.execute(trimmed).await?;
            }
        }

        sqlx::query("INSERT INTO _eventdesk_migrations (name) VALUES (?)")
            .bind(*name)
            .execute(pool)
            .await?;
        log::info!(target: "eventdesk", "msg=\"applied migration\", name=\"{name}\"");
    }

    Ok(())
}
