use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;

use crate::dto::{AuthLoginRequest, AuthLoginResponse, AuthStatusResponse, GenericMessageResponse};
use crate::error::ApiResult;
use crate::middleware::{AdminRejection, admin_access};
use crate::state::AppState;

pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<AuthLoginRequest>,
) -> ApiResult<Json<AuthLoginResponse>> {
    let session = state
        .gate
        .sign_in(payload.identifier.as_str(), payload.password.as_str())
        .await?;

    Ok(Json(AuthLoginResponse {
        access_token: session.access_token().to_owned(),
        principal_id: session.principal().id().to_owned(),
        email: session.principal().email().map(ToOwned::to_owned),
        expires_at: session.expires_at().map(|at| at.to_rfc3339()),
    }))
}

/// Ends the admin session. Only the holder of the session token may do so.
pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<GenericMessageResponse>, AdminRejection> {
    admin_access(&state, &headers).await?;
    state.gate.sign_out().await;

    Ok(Json(GenericMessageResponse {
        message: "signed out".to_owned(),
    }))
}

pub async fn status_handler(State(state): State<AppState>) -> Json<AuthStatusResponse> {
    Json(AuthStatusResponse::from(state.gate.authorization().await))
}
