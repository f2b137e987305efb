use axum::extract::{Path, State};
use axum::Json;

use super::error::ApiResult;
use crate::domain::{TrackSettings, UserId};
use crate::srs::editing;
use crate::state::AppState;

/// GET /users/{id}/tracks/{key}/settings
pub async fn get_settings(
  State(state): State<AppState>,
  Path((user_id, key)): Path<(UserId, String)>,
) -> ApiResult<Json<TrackSettings>> {
  let settings = state
    .store
    .read_track(user_id, &key, |track| Ok(track.settings.clone()))?;
  Ok(Json(settings))
}

/// POST /users/{id}/tracks/{key}/settings
///
/// Missing fields take their defaults, so clients send the full settings.
pub async fn update_settings(
  State(state): State<AppState>,
  Path((user_id, key)): Path<(UserId, String)>,
  Json(settings): Json<TrackSettings>,
) -> ApiResult<Json<TrackSettings>> {
  let today = state.today();
  let updated = state.store.write_track(user_id, &key, |track| {
    editing::update_settings(track, settings, today);
    Ok(track.settings.clone())
  })?;
  tracing::info!(user_id, track = %key, "Updated track settings");
  state.persist();
  Ok(Json(updated))
}
