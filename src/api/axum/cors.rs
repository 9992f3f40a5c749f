//! CORS layers built on tower-http.

use axum::http::{Method, header};
use tower_http::cors::CorsLayer;

/// Allows any origin, method and header. Development only.
pub fn permissive() -> CorsLayer {
    CorsLayer::permissive()
}

/// CORS for the dashboard frontend.
///
/// Allows:
/// - Specified origins only
/// - GET, POST, PATCH, DELETE, OPTIONS
/// - Authorization, Content-Type, Accept headers
/// - Credentials
/// - Max age of 1 hour for preflight caching
///
/// Origins that fail to parse as header values are skipped.
pub fn default(allowed_origins: &[&str]) -> CorsLayer {
    let origins: Vec<_> = allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
