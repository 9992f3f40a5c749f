//! HTTP surface: request/response bodies and the axum router.

mod types;

pub use types::*;

pub mod axum;
