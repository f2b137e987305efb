use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use super::error::{ApiError, ApiResult};
use crate::domain::UserId;
use crate::srs::{self, DecoyLimit, StudyBatch, StudyCriterion, StudyOptions};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyQuery {
  /// "failureHistory" (default) or "creationDate"
  pub criterion: Option<String>,
  /// Maximum number of decoys; the whole track when absent
  pub decoys: Option<usize>,
}

impl StudyQuery {
  fn options(&self) -> ApiResult<StudyOptions> {
    let criterion = match self.criterion.as_deref() {
      None | Some("failureHistory") => StudyCriterion::FailureHistory,
      Some("creationDate") => StudyCriterion::CreationDate,
      Some(other) => {
        return Err(ApiError::BadRequest(format!("Unknown study criterion: {}", other)));
      }
    };
    let decoy_limit = self.decoys.map_or(DecoyLimit::FullTrack, DecoyLimit::AtMost);
    Ok(StudyOptions {
      criterion,
      decoy_limit,
    })
  }
}

/// GET /users/{id}/tracks/{key}/study
pub async fn get_study(
  State(state): State<AppState>,
  Path((user_id, key)): Path<(UserId, String)>,
  Query(query): Query<StudyQuery>,
) -> ApiResult<Json<StudyBatch>> {
  let options = query.options()?;
  let today = state.today();
  let batch = state
    .store
    .read_track(user_id, &key, |track| srs::select_study_batch_with(track, today, &options))?;
  Ok(Json(batch))
}

/// GET /users/{id}/tracks/{key}/can-study
pub async fn can_study(
  State(state): State<AppState>,
  Path((user_id, key)): Path<(UserId, String)>,
) -> ApiResult<Json<serde_json::Value>> {
  let today = state.today();
  let can = state
    .store
    .read_track(user_id, &key, |track| Ok(srs::can_study(track, today)))?;
  Ok(Json(serde_json::json!({ "canStudy": can })))
}
