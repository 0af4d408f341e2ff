//! HTTP mapping of service failures.
//!
//! Every error body is `{"detail": "..."}`. Internal failures are logged in full and returned
//! with a fixed detail.

use api_shared::dto::ErrorRes;
use api_shared::TokenError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use techmed_core::{CoreError, Role};

pub const UNAUTHENTICATED_DETAIL: &str =
    "Authentication credentials were not provided or are invalid.";
pub const INTEGRITY_DETAIL: &str = "Fatal DB error";
pub const INTERNAL_DETAIL: &str = "Internal error";

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// No valid session, or credentials that do not match.
    Unauthorized(String),
    /// A valid session whose role may not use the endpoint. Answered as 401.
    Forbidden { required: Role },
    NotFound(String),
    /// Rows that should exist are missing.
    Integrity(String),
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn unauthenticated() -> Self {
        ApiError::Unauthorized(UNAUTHENTICATED_DETAIL.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) | ApiError::Forbidden { .. } => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Integrity(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> &str {
        match self {
            ApiError::BadRequest(detail)
            | ApiError::Unauthorized(detail)
            | ApiError::NotFound(detail) => detail,
            ApiError::Forbidden { .. } => UNAUTHENTICATED_DETAIL,
            ApiError::Integrity(_) => INTEGRITY_DETAIL,
            ApiError::Internal(_) => INTERNAL_DETAIL,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ApiError::BadRequest(e.to_string()),
            CoreError::UserAlreadyExists | CoreError::SpecialityNotFound => {
                ApiError::BadRequest(err.to_string())
            }
            CoreError::UnknownAppointmentStatus(_) => {
                ApiError::BadRequest("Unknown appointment status".into())
            }
            CoreError::InvalidCredentials | CoreError::IncorrectCurrentPassword => {
                ApiError::Unauthorized(err.to_string())
            }
            CoreError::Unauthenticated => ApiError::unauthenticated(),
            CoreError::NotFound(_) => ApiError::NotFound(err.to_string()),
            CoreError::IntegrityViolation(msg) => ApiError::Integrity(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        tracing::warn!("rejected session token: {err}");
        ApiError::unauthenticated()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Forbidden { required } => {
                tracing::warn!("role denied: endpoint requires {required}");
            }
            ApiError::Integrity(msg) => tracing::error!("integrity violation: {msg}"),
            ApiError::Internal(msg) => tracing::error!("internal error: {msg}"),
            _ => {}
        }

        let body = Json(ErrorRes {
            detail: self.detail().to_owned(),
        });
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use techmed_core::ValidationError;

    #[test]
    fn core_errors_map_to_statuses() {
        let cases = [
            (
                CoreError::Validation(ValidationError::Email),
                StatusCode::BAD_REQUEST,
                "Email address must be valid",
            ),
            (
                CoreError::UserAlreadyExists,
                StatusCode::BAD_REQUEST,
                "User already exists",
            ),
            (
                CoreError::SpecialityNotFound,
                StatusCode::BAD_REQUEST,
                "Speciality not found",
            ),
            (
                CoreError::UnknownAppointmentStatus("Postponed".into()),
                StatusCode::BAD_REQUEST,
                "Unknown appointment status",
            ),
            (
                CoreError::InvalidCredentials,
                StatusCode::UNAUTHORIZED,
                "Invalid username or password",
            ),
            (
                CoreError::IncorrectCurrentPassword,
                StatusCode::UNAUTHORIZED,
                "Current password is incorrect",
            ),
            (
                CoreError::Unauthenticated,
                StatusCode::UNAUTHORIZED,
                UNAUTHENTICATED_DETAIL,
            ),
            (
                CoreError::NotFound("Patient"),
                StatusCode::NOT_FOUND,
                "Patient not found",
            ),
            (
                CoreError::IntegrityViolation("user 3 has no patient".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                INTEGRITY_DETAIL,
            ),
            (
                CoreError::PasswordHash("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_DETAIL,
            ),
        ];

        for (core, status, detail) in cases {
            let api = ApiError::from(core);
            assert_eq!(api.status(), status, "{api:?}");
            assert_eq!(api.detail(), detail, "{api:?}");
        }
    }

    #[test]
    fn role_denial_looks_like_missing_credentials() {
        let err = ApiError::Forbidden {
            required: Role::Admin,
        };
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.detail(), UNAUTHENTICATED_DETAIL);
    }
}
