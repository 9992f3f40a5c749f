mod cors;
mod error;
mod handlers;
mod middleware;
mod routes;

pub use cors::{default as default_cors, permissive as permissive_cors};
pub use error::ApiError;
pub use middleware::{AdminUser, AuthenticatedUser, extract_bearer_token};
pub use routes::{
    AppState, auth_routes, event_routes, registration_routes, router, user_routes,
};
