use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use sentra::Error as SentraError;
use sentra::error::{AuthError, StorageError, TokenError, ValidationError};

/// HTTP-boundary error. Every variant renders as a stable
/// `{success: false, message}` body; nothing here ever panics the process.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account locked due to too many failed login attempts. Try again later.")]
    AccountLocked,

    #[error("Account is not active. Please contact administrator.")]
    AccountInactive,

    #[error("User with this email or username already exists")]
    DuplicateIdentity,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(String),
}

impl From<SentraError> for ApiError {
    fn from(err: SentraError) -> Self {
        match err {
            SentraError::Auth(AuthError::InvalidCredentials) => ApiError::InvalidCredentials,
            SentraError::Auth(AuthError::AccountLocked) => ApiError::AccountLocked,
            SentraError::Auth(AuthError::AccountInactive) => ApiError::AccountInactive,
            SentraError::Auth(AuthError::DuplicateIdentity) => ApiError::DuplicateIdentity,
            SentraError::Validation(e) => ApiError::BadRequest(validation_message(e)),
            SentraError::Token(TokenError::Expired) => ApiError::Unauthorized,
            SentraError::Token(_) => ApiError::Unauthorized,
            SentraError::Storage(StorageError::NotFound) => {
                ApiError::NotFound("Record not found".to_string())
            }
            SentraError::Storage(e) => ApiError::Internal(e.to_string()),
        }
    }
}

fn validation_message(e: ValidationError) -> String {
    match e {
        ValidationError::MissingField(msg)
        | ValidationError::InvalidEmail(msg)
        | ValidationError::InvalidPassword(msg)
        | ValidationError::InvalidUsername(msg)
        | ValidationError::InvalidField(msg) => msg,
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::DuplicateIdentity => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials
            | ApiError::AccountInactive
            | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::AccountLocked => StatusCode::LOCKED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Internal detail is logged server-side; the caller only ever sees
        // the generic message.
        if let ApiError::Internal(ref detail) = self {
            tracing::error!(detail = %detail, "Internal server error");
        }

        let status = self.status();
        let body = Json(json!({
            "success": false,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(SentraError::Auth(AuthError::InvalidCredentials)).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(SentraError::Auth(AuthError::AccountLocked)).status(),
            StatusCode::LOCKED
        );
        assert_eq!(
            ApiError::from(SentraError::Auth(AuthError::AccountInactive)).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(SentraError::Auth(AuthError::DuplicateIdentity)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(SentraError::Validation(ValidationError::MissingField(
                "Password is required".to_string()
            )))
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(SentraError::Token(TokenError::Expired)).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(SentraError::Storage(StorageError::Database(
                "boom".to_string()
            )))
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_locked_message_does_not_leak_remaining_duration() {
        let msg = ApiError::AccountLocked.to_string();
        assert!(!msg.contains("hour"));
        assert!(!msg.contains("minute"));
        assert!(!msg.contains("remaining"));
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let err = ApiError::Internal("connection pool exhausted".to_string());
        assert_eq!(err.to_string(), "Internal server error");
    }
}
