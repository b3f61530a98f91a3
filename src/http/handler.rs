use crate::models::{
    FindCustomerError, FindCustomersError, FindReservationError, FindReservationsError,
    SaveCustomerError, SaveReservationError, ValidationError,
};
use axum::Json;
use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

#[derive(Debug)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<ApiResponse<T>>);

impl<T: Serialize> ApiSuccess<T> {
    pub const fn new(status: StatusCode, data: T) -> Self {
        Self(status, Json(ApiResponse::new(status, data)))
    }

    pub const fn ok(data: T) -> Self {
        Self::new(StatusCode::OK, data)
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> axum::response::Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    status_code: u16,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    const fn new(status: StatusCode, data: T) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    NotFound(String),
    BadRequest(String),
}

impl ApiError {
    fn internal(cause: &anyhow::Error) -> Self {
        tracing::error!("{cause:?}");
        Self::InternalServerError("Internal server error".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, msg) = match self {
            Self::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        (status, Json(ApiResponse::new(status, msg))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

/// A form missing a field is as malformed as one with a bad value.
impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<FindCustomerError> for ApiError {
    fn from(err: FindCustomerError) -> Self {
        match err {
            FindCustomerError::NotFound { .. } => Self::NotFound(err.to_string()),
            FindCustomerError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<FindCustomersError> for ApiError {
    fn from(err: FindCustomersError) -> Self {
        Self::internal(&err.0)
    }
}

impl From<SaveCustomerError> for ApiError {
    fn from(err: SaveCustomerError) -> Self {
        match err {
            SaveCustomerError::Invalid(err) => err.into(),
            SaveCustomerError::NotFound { .. } => Self::NotFound(err.to_string()),
            SaveCustomerError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<FindReservationError> for ApiError {
    fn from(err: FindReservationError) -> Self {
        match err {
            FindReservationError::NotFound { .. } => Self::NotFound(err.to_string()),
            FindReservationError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<FindReservationsError> for ApiError {
    fn from(err: FindReservationsError) -> Self {
        Self::internal(&err.0)
    }
}

impl From<SaveReservationError> for ApiError {
    fn from(err: SaveReservationError) -> Self {
        match err {
            SaveReservationError::Invalid(err) => err.into(),
            SaveReservationError::NotFound { .. }
            | SaveReservationError::CustomerNotFound { .. } => Self::NotFound(err.to_string()),
            SaveReservationError::Other(cause) => Self::internal(&cause),
        }
    }
}

/// Blank form fields are stored as no notes at all.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
