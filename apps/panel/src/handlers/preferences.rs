use axum::Json;
use axum::extract::State;
use hearthware_domain::DisplayPreferences;

use crate::dto::PreferencesPayload;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn get_preferences_handler(State(state): State<AppState>) -> Json<PreferencesPayload> {
    Json(PreferencesPayload::from(state.preferences.load()))
}

pub async fn save_preferences_handler(
    State(state): State<AppState>,
    Json(payload): Json<PreferencesPayload>,
) -> ApiResult<Json<PreferencesPayload>> {
    let preferences = DisplayPreferences::from(payload);
    state.preferences.save(preferences)?;

    Ok(Json(PreferencesPayload::from(preferences)))
}
