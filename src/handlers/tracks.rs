use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use crate::domain::{PerSkill, Track, TrackSettings, UserId};
use crate::services::TrackSummary;
use crate::srs::{self, SkillTestState};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrackRequest {
  pub from_language: String,
  pub to_language: String,
  #[serde(default)]
  pub settings: Option<TrackSettings>,
}

/// Track state without card contents.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackOverview {
  pub key: String,
  pub from_language: String,
  pub to_language: String,
  pub card_count: usize,
  pub tests: PerSkill<SkillTestState>,
  pub settings: TrackSettings,
  pub can_study: bool,
}

impl TrackOverview {
  fn new(track: &Track, can_study: bool) -> Self {
    Self {
      key: track.key.clone(),
      from_language: track.from_language.clone(),
      to_language: track.to_language.clone(),
      card_count: track.cards.len(),
      tests: track.tests.clone(),
      settings: track.settings.clone(),
      can_study,
    }
  }
}

/// GET /users/{id}/tracks
pub async fn list_tracks(
  State(state): State<AppState>,
  Path(user_id): Path<UserId>,
) -> ApiResult<Json<Vec<TrackSummary>>> {
  Ok(Json(state.store.track_summaries(user_id)?))
}

/// POST /users/{id}/tracks
pub async fn create_track(
  State(state): State<AppState>,
  Path(user_id): Path<UserId>,
  Json(req): Json<CreateTrackRequest>,
) -> ApiResult<(StatusCode, Json<TrackOverview>)> {
  if req.from_language.trim().is_empty() || req.to_language.trim().is_empty() {
    return Err(ApiError::BadRequest("Both languages are required".to_string()));
  }

  let today = state.today();
  let track = state.store.create_track(
    user_id,
    &req.from_language,
    &req.to_language,
    req.settings.unwrap_or_default(),
    today,
  )?;
  state.persist();
  Ok((StatusCode::CREATED, Json(TrackOverview::new(&track, false))))
}

/// GET /users/{id}/tracks/{key}
pub async fn get_track(
  State(state): State<AppState>,
  Path((user_id, key)): Path<(UserId, String)>,
) -> ApiResult<Json<TrackOverview>> {
  let today = state.today();
  let overview = state.store.read_track(user_id, &key, |track| {
    Ok(TrackOverview::new(track, srs::can_study(track, today)))
  })?;
  Ok(Json(overview))
}

/// DELETE /users/{id}/tracks/{key}
pub async fn delete_track(
  State(state): State<AppState>,
  Path((user_id, key)): Path<(UserId, String)>,
) -> ApiResult<StatusCode> {
  state.store.delete_track(user_id, &key)?;
  state.persist();
  Ok(StatusCode::NO_CONTENT)
}
