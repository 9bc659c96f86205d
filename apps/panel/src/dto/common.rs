use hearthware_domain::DisplayPreferences;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: &'static str,
}

/// Generic message response.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/generic-message-response.ts"
)]
pub struct GenericMessageResponse {
    pub message: String,
}

/// Visitor display preferences, read and written as a whole.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/preferences-payload.ts"
)]
pub struct PreferencesPayload {
    pub dark_mode: bool,
}

impl From<DisplayPreferences> for PreferencesPayload {
    fn from(value: DisplayPreferences) -> Self {
        Self {
            dark_mode: value.dark_mode,
        }
    }
}

impl From<PreferencesPayload> for DisplayPreferences {
    fn from(value: PreferencesPayload) -> Self {
        Self {
            dark_mode: value.dark_mode,
        }
    }
}
