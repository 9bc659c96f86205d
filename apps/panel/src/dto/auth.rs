use hearthware_application::AuthState;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for admin login. `identifier` is an email or a username alias.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/auth-login-request.ts"
)]
pub struct AuthLoginRequest {
    pub identifier: String,
    pub password: String,
}

/// Successful admin login.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/auth-login-response.ts"
)]
pub struct AuthLoginResponse {
    pub access_token: String,
    pub principal_id: String,
    pub email: Option<String>,
    pub expires_at: Option<String>,
}

/// Current authorization state of the admin area.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/auth-status-response.ts"
)]
pub struct AuthStatusResponse {
    /// `pending`, `authorized` or `unauthorized`.
    pub state: &'static str,
    pub principal_id: Option<String>,
    pub email: Option<String>,
}

impl From<AuthState> for AuthStatusResponse {
    fn from(value: AuthState) -> Self {
        match value {
            AuthState::Pending => Self {
                state: "pending",
                principal_id: None,
                email: None,
            },
            AuthState::Authorized(principal) => Self {
                state: "authorized",
                principal_id: Some(principal.id().to_owned()),
                email: principal.email().map(ToOwned::to_owned),
            },
            AuthState::Unauthorized => Self {
                state: "unauthorized",
                principal_id: None,
                email: None,
            },
        }
    }
}
