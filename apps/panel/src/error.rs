use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hearthware_application::AuthError;
use hearthware_core::AppError;
use serde::Serialize;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        let message = value.to_string();
        Self(match value {
            AuthError::Identity(message) => AppError::Unauthorized(message),
            AuthError::NotAdmin => AppError::Forbidden(message),
            AuthError::Superseded => AppError::Conflict(message),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Sign-in failures show the identity service's message as is.
        let message = match &self.0 {
            AppError::Unauthorized(message) | AppError::Forbidden(message) => message.clone(),
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use hearthware_application::AuthError;
    use hearthware_core::AppError;

    use super::ApiError;

    #[test]
    fn maps_error_kinds_to_status_codes() {
        let cases = [
            (AppError::Validation("x".to_owned()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".to_owned()), StatusCode::NOT_FOUND),
            (AppError::Forbidden("x".to_owned()), StatusCode::FORBIDDEN),
            (AppError::Internal("x".to_owned()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).into_response().status(), status);
        }
    }

    #[test]
    fn sign_in_failures_map_to_auth_statuses() {
        let identity = ApiError::from(AuthError::Identity("Invalid login credentials".to_owned()));
        assert_eq!(identity.into_response().status(), StatusCode::UNAUTHORIZED);

        let not_admin = ApiError::from(AuthError::NotAdmin);
        assert_eq!(not_admin.into_response().status(), StatusCode::FORBIDDEN);
    }
}
