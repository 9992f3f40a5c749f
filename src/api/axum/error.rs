use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::api::ErrorResponse;
use crate::validators::ValidationError;
use crate::{DeskError, ErrorKind};

/// converts `DeskError` into an HTTP response
#[derive(Debug)]
pub struct ApiError(pub DeskError);

impl From<DeskError> for ApiError {
    fn from(err: DeskError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ValidationError::MalformedBody(rejection.body_text()).into())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(ValidationError::MalformedPath(rejection.body_text()).into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!(target: "eventdesk", "msg=\"request failed\", error=\"{}\"", self.0);
            ErrorResponse::new("Internal server error", self.0.code())
        } else {
            ErrorResponse::from(&self.0)
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (DeskError::EventNotFound, StatusCode::NOT_FOUND),
            (DeskError::EventFull, StatusCode::CONFLICT),
            (DeskError::AlreadyRegistered, StatusCode::CONFLICT),
            (DeskError::UserAlreadyExists, StatusCode::CONFLICT),
            (DeskError::Forbidden("no".to_owned()), StatusCode::FORBIDDEN),
            (DeskError::TokenExpired, StatusCode::UNAUTHORIZED),
            (DeskError::UnknownSubject, StatusCode::UNAUTHORIZED),
            (
                DeskError::Validation(ValidationError::CapacityTooSmall),
                StatusCode::BAD_REQUEST,
            ),
            (
                DeskError::DatabaseError("disk full".to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError(err).into_response().status(), expected);
        }
    }
}
