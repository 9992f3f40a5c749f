//! HTTP handlers. Each one builds the matching action from state and maps
//! its result onto a status code.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::error::ApiError;
use super::middleware::{AdminUser, AuthenticatedUser};
use super::routes::AppState;
use crate::actions::{
    AssignRoleAction, CancelRegistrationAction, CreateEventAction, DeleteEventAction,
    GetEventAction, GetProfileAction, JoinEventAction, ListEventsAction, ListParticipantsAction,
    LoginAction, MyRegistrationsAction, RegisterAction, SignupForm, UpdateEventAction,
};
use crate::api::{
    AssignRoleRequest, AuthResponse, CreateEventRequest, LoginRequest, RegisterRequest,
    UpdateEventRequest, UserProfile,
};
use crate::{EventRepository, RegistrationRepository, RoleRepository, UserRepository};

/// POST /auth/register
pub async fn register<U, R, E, G>(
    State(state): State<AppState<U, R, E, G>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    G: Clone + Send + Sync + 'static,
{
    let Json(body) = payload?;
    let action = RegisterAction::new(state.user_repo, state.role_repo, state.jwt);

    let session = action
        .execute(SignupForm {
            email: &body.email,
            password: body.password.expose_secret(),
            first_name: &body.first_name,
            last_name: &body.last_name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            access_token: session.token,
            user: UserProfile::from(session.user),
        }),
    ))
}

/// POST /auth/login
pub async fn login<U, R, E, G>(
    State(state): State<AppState<U, R, E, G>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    G: Clone + Send + Sync + 'static,
{
    let Json(body) = payload?;
    let action = LoginAction::new(state.user_repo, state.jwt);
    let session = action
        .execute(&body.email, body.password.expose_secret())
        .await?;

    Ok(Json(AuthResponse {
        access_token: session.token,
        user: UserProfile::from(session.user),
    }))
}

/// GET /events
pub async fn list_events<U, R, E, G>(
    State(state): State<AppState<U, R, E, G>>,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: Clone + Send + Sync + 'static,
{
    let action = ListEventsAction::new(state.event_repo, state.user_repo);
    Ok(Json(action.execute().await?))
}

/// GET /events/{id}
pub async fn get_event<U, R, E, G>(
    State(state): State<AppState<U, R, E, G>>,
    _user: AuthenticatedUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: RegistrationRepository + Clone + Send + Sync + 'static,
{
    let Path(id) = path?;
    let action = GetEventAction::new(state.event_repo, state.user_repo, state.registration_repo);
    Ok(Json(action.execute(id).await?))
}

/// POST /events
pub async fn create_event<U, R, E, G>(
    State(state): State<AppState<U, R, E, G>>,
    AuthenticatedUser(user): AuthenticatedUser,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: RegistrationRepository + Clone + Send + Sync + 'static,
{
    let Json(body) = payload?;
    let event = CreateEventAction::new(state.event_repo)
        .execute(body.into(), user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// PATCH /events/{id}
pub async fn update_event<U, R, E, G>(
    State(state): State<AppState<U, R, E, G>>,
    AuthenticatedUser(user): AuthenticatedUser,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: RegistrationRepository + Clone + Send + Sync + 'static,
{
    let Path(id) = path?;
    let Json(body) = payload?;
    let event = UpdateEventAction::new(state.event_repo)
        .execute(id, body.into(), user.id)
        .await?;

    Ok(Json(event))
}

/// DELETE /events/{id}
pub async fn delete_event<U, R, E, G>(
    State(state): State<AppState<U, R, E, G>>,
    AuthenticatedUser(user): AuthenticatedUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: RegistrationRepository + Clone + Send + Sync + 'static,
{
    let Path(id) = path?;
    DeleteEventAction::new(state.event_repo)
        .execute(id, user.id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /registrations/events/{event_id}
pub async fn join_event<U, R, E, G>(
    State(state): State<AppState<U, R, E, G>>,
    AuthenticatedUser(user): AuthenticatedUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: RegistrationRepository + Clone + Send + Sync + 'static,
{
    let Path(event_id) = path?;
    let registration = JoinEventAction::new(state.event_repo, state.registration_repo)
        .execute(user.id, event_id)
        .await?;

    Ok((StatusCode::CREATED, Json(registration)))
}

/// DELETE /registrations/events/{event_id}
pub async fn cancel_registration<U, R, E, G>(
    State(state): State<AppState<U, R, E, G>>,
    AuthenticatedUser(user): AuthenticatedUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: RegistrationRepository + Clone + Send + Sync + 'static,
{
    let Path(event_id) = path?;
    CancelRegistrationAction::new(state.registration_repo)
        .execute(user.id, event_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /registrations/events/{event_id}/participants
///
/// Requires `ADMIN`; the action additionally requires the caller to be the
/// event's creator.
pub async fn list_participants<U, R, E, G>(
    State(state): State<AppState<U, R, E, G>>,
    AdminUser(user): AdminUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: RegistrationRepository + Clone + Send + Sync + 'static,
{
    let Path(event_id) = path?;
    let action =
        ListParticipantsAction::new(state.event_repo, state.registration_repo, state.user_repo);
    Ok(Json(action.execute(event_id, user.id).await?))
}

/// GET /registrations/my-registrations
pub async fn my_registrations<U, R, E, G>(
    State(state): State<AppState<U, R, E, G>>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> impl IntoResponse
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: RegistrationRepository + Clone + Send + Sync + 'static,
{
    let action = MyRegistrationsAction::new(state.registration_repo, state.user_repo);
    Json(action.execute(user.id).await)
}

/// GET /users/profile
pub async fn get_profile<U, R, E, G>(
    State(state): State<AppState<U, R, E, G>>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: RegistrationRepository + Clone + Send + Sync + 'static,
{
    let profile = GetProfileAction::new(state.user_repo)
        .execute(user.id)
        .await?;

    Ok(Json(UserProfile::from(profile)))
}

/// PATCH /users/{id}/assign-role
pub async fn assign_role<U, R, E, G>(
    State(state): State<AppState<U, R, E, G>>,
    _admin: AdminUser,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AssignRoleRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: RoleRepository + Clone + Send + Sync + 'static,
    E: EventRepository + Clone + Send + Sync + 'static,
    G: RegistrationRepository + Clone + Send + Sync + 'static,
{
    let Path(id) = path?;
    let Json(body) = payload?;
    let user = AssignRoleAction::new(state.user_repo, state.role_repo)
        .execute(id, &body.role_name)
        .await?;

    Ok(Json(UserProfile::from(user)))
}
