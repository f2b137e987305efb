use axum::extract::State;
use axum::Json;

use super::error::ApiResult;
use crate::services::roll_forward_store;
use crate::srs::RolloverReport;
use crate::state::AppState;

/// POST /maintenance/roll-forward
///
/// Manual trigger for the daily roll-forward; safe to repeat.
pub async fn roll_forward(State(state): State<AppState>) -> ApiResult<Json<RolloverReport>> {
  let (_, report) = roll_forward_store(&state.store, state.clock.as_ref(), state.sink.as_ref())?;
  Ok(Json(report))
}
