//! eventdesk server.
//!
//! ```bash
//! JWT_SECRET=... DATABASE_URL=sqlite://eventdesk.db cargo run
//! ```

use std::str::FromStr;

use axum::Router;
use eventdesk::actions::{SeedAdminAction, SeedRolesAction};
use eventdesk::api::axum::{AppState, default_cors, router};
use eventdesk::config::AppConfig;
use eventdesk::jwt::JwtService;
use eventdesk::{
    DeskError, EventRepository, RegistrationRepository, RoleRepository, UserRepository,
    postgres, sqlite,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,eventdesk=debug,sqlx=warn,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!(target: "eventdesk", "msg=\"invalid configuration\", error=\"{e}\"");
            std::process::exit(1);
        }
    };
    let jwt = JwtService::new(config.jwt_config()?);

    let app = if config.is_sqlite() {
        let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect_with(options)
            .await?;
        sqlite::migrations::run(&pool).await?;

        let (users, roles, events, registrations) = sqlite::create_repositories(pool);
        bootstrap(&config, users, roles, events, registrations, jwt).await?
    } else {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await?;
        postgres::migrations::run(&pool).await?;

        let (users, roles, events, registrations) = postgres::create_repositories(pool);
        bootstrap(&config, users, roles, events, registrations, jwt).await?
    };

    let app = app
        .layer(default_cors(&[config.frontend_url.as_str()]))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    log::info!(target: "eventdesk", "msg=\"listening\", address=\"{}\"", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Seeds roles and the optional administrator, then builds the router.
async fn bootstrap<U, R, E, G>(
    config: &AppConfig,
    users: U,
    roles: R,
    events: E,
    registrations: G,
    jwt: JwtService,
) -> Result<Router, DeskError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: RegistrationRepository + Clone + Send + Sync + 'static,
{
    SeedRolesAction::new(roles.clone()).execute().await?;

    if let Some(admin) = &config.admin {
        let user = SeedAdminAction::new(users.clone(), roles.clone())
            .execute(&admin.email, admin.password.expose_secret())
            .await?;
        log::info!(target: "eventdesk", "msg=\"admin ready\", user_id={}", user.id);
    }

    Ok(router(AppState {
        user_repo: users,
        role_repo: roles,
        event_repo: events,
        registration_repo: registrations,
        jwt,
    }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!(target: "eventdesk", "msg=\"failed to listen for shutdown signal\", error=\"{e}\"");
    }
    log::info!(target: "eventdesk", "msg=\"shutting down\"");
}
