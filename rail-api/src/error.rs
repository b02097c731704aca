use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rail_core::ReservationError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    NotFoundError(String),
    #[error("{0}")]
    ConflictError(String),
    #[error("{0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        let msg = err.to_string();
        match err {
            ReservationError::NotFound(_) => AppError::NotFoundError(msg),
            ReservationError::SeatsExhausted
            | ReservationError::NoAvailableSeats { .. }
            | ReservationError::DuplicateReservation(_) => AppError::ConflictError(msg),
            ReservationError::UnknownSection(_) | ReservationError::InvalidRequest(_) => {
                AppError::ValidationError(msg)
            }
            ReservationError::InvalidLayout(_) | ReservationError::Inconsistent(_) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ReservationError::NotFound("a@b.c".into()), StatusCode::NOT_FOUND),
            (ReservationError::SeatsExhausted, StatusCode::CONFLICT),
            (ReservationError::NoAvailableSeats { section: "B".into() }, StatusCode::CONFLICT),
            (ReservationError::DuplicateReservation("a@b.c".into()), StatusCode::CONFLICT),
            (ReservationError::UnknownSection("Z".into()), StatusCode::BAD_REQUEST),
            (ReservationError::Inconsistent("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }
}
