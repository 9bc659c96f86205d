use axum::Json;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use hearthware_application::RouteDecision;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::ErrorResponse;
use crate::state::AppState;

/// Why an admin request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminRejection {
    /// Authorization is still resolving; the client should retry.
    Resolving,
    /// No admin is signed in.
    SignedOut,
    /// An admin is signed in, but the request does not carry their token.
    ForeignToken,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Resolving => (
                StatusCode::SERVICE_UNAVAILABLE,
                [(header::RETRY_AFTER, "1")],
                Json(ErrorResponse::new("authorization is still being resolved")),
            )
                .into_response(),
            Self::SignedOut => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("admin sign-in required")),
            )
                .into_response(),
            Self::ForeignToken => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("admin session token required")),
            )
                .into_response(),
        }
    }
}

pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let access = admin_access(&state, request.headers()).await;
    match access {
        Ok(()) => next.run(request).await,
        Err(rejection) => {
            debug!(rejection = ?rejection, path = %request.uri().path(), "admin request rejected");
            rejection.into_response()
        }
    }
}

/// Applies the route guard, then checks the caller holds the admin's token.
pub async fn admin_access(state: &AppState, headers: &HeaderMap) -> Result<(), AdminRejection> {
    match state.guard.check().await {
        RouteDecision::ShowLoading => return Err(AdminRejection::Resolving),
        RouteDecision::RedirectToLogin => return Err(AdminRejection::SignedOut),
        RouteDecision::Render => {}
    }

    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token);
    let current = state.gate.sessions().cached();

    match (presented, current) {
        (Some(presented), Some(session)) if tokens_match(presented, session.access_token()) => {
            Ok(())
        }
        _ => Err(AdminRejection::ForeignToken),
    }
}

/// Extracts the credential of a `Bearer` authorization value. The scheme is
/// case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn tokens_match(presented: &str, expected: &str) -> bool {
    let presented = presented.as_bytes();
    let expected = expected.as_bytes();
    presented.len() == expected.len() && bool::from(presented.ct_eq(expected))
}
