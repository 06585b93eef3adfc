use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rentora_core::BookingError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError(String),
    PreconditionFailed(String),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PreconditionFailed(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            },
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let msg = err.to_string();
        match err {
            BookingError::NoItemsProvided
            | BookingError::InvalidDateRange
            | BookingError::InvalidAmount(_)
            | BookingError::HosterUnresolved(_)
            | BookingError::MixedHosters => AppError::ValidationError(msg),
            BookingError::IdentityMissing
            | BookingError::IdentityPending
            | BookingError::IdentityRejected(_) => AppError::PreconditionFailed(msg),
            BookingError::Unauthorized => AppError::AuthorizationError(msg),
            BookingError::NotFound(_) => AppError::NotFoundError(msg),
            BookingError::InvalidStatus { .. } => AppError::ConflictError(msg),
            BookingError::Storage(_) | BookingError::InvalidLockWindow(_) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentora_core::BookingStatus;

    fn status_of(err: BookingError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn test_booking_errors_map_to_client_statuses() {
        assert_eq!(status_of(BookingError::NoItemsProvided), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(BookingError::IdentityMissing), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status_of(BookingError::IdentityRejected("blurry".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(BookingError::Unauthorized), StatusCode::FORBIDDEN);
        assert_eq!(status_of(BookingError::NotFound(uuid::Uuid::nil())), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(BookingError::InvalidStatus {
                from: BookingStatus::Completed,
                to: BookingStatus::Pending,
            }),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_storage_errors_are_opaque() {
        let response = AppError::from(BookingError::Storage("connection refused".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_of(BookingError::InvalidLockWindow(0)), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_auth_failures_map_to_401_and_403() {
        assert_eq!(
            AppError::AuthenticationError("missing token".into()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::AuthorizationError("wrong role".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
