use axum::Router;
use axum::routing::{get, patch, post};

use super::handlers;
use crate::jwt::JwtService;
use crate::{EventRepository, RegistrationRepository, RoleRepository, UserRepository};

#[derive(Clone)]
pub struct AppState<U, R, E, G> {
    pub user_repo: U,
    pub role_repo: R,
    pub event_repo: E,
    pub registration_repo: G,
    pub jwt: JwtService,
}

/// The full API with state applied. Add CORS and tracing layers on top.
pub fn router<U, R, E, G>(state: AppState<U, R, E, G>) -> Router
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: RegistrationRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/events", event_routes())
        .nest("/registrations", registration_routes())
        .nest("/users", user_routes())
        .with_state(state)
}

pub fn auth_routes<U, R, E, G>() -> Router<AppState<U, R, E, G>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: RegistrationRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/register", post(handlers::register::<U, R, E, G>))
        .route("/login", post(handlers::login::<U, R, E, G>))
}

pub fn event_routes<U, R, E, G>() -> Router<AppState<U, R, E, G>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: RegistrationRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(handlers::list_events::<U, R, E, G>).post(handlers::create_event::<U, R, E, G>),
        )
        .route(
            "/{id}",
            get(handlers::get_event::<U, R, E, G>)
                .patch(handlers::update_event::<U, R, E, G>)
                .delete(handlers::delete_event::<U, R, E, G>),
        )
}

pub fn registration_routes<U, R, E, G>() -> Router<AppState<U, R, E, G>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: RegistrationRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/events/{event_id}",
            post(handlers::join_event::<U, R, E, G>)
                .delete(handlers::cancel_registration::<U, R, E, G>),
        )
        .route(
            "/events/{event_id}/participants",
            get(handlers::list_participants::<U, R, E, G>),
        )
        .route(
            "/my-registrations",
            get(handlers::my_registrations::<U, R, E, G>),
        )
}

pub fn user_routes<U, R, E, G>() -> Router<AppState<U, R, E, G>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: RegistrationRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/profile", get(handlers::get_profile::<U, R, E, G>))
        .route(
            "/{id}/assign-role",
            patch(handlers::assign_role::<U, R, E, G>),
        )
}
