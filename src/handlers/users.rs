use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use crate::domain::{UserId, UserProfile};
use crate::services::TrackSummary;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
  pub id: UserId,
  #[serde(flatten)]
  pub profile: UserProfile,
  /// Most recently used first
  pub tracks: Vec<TrackSummary>,
}

#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
  pub username: String,
}

#[derive(Debug, Serialize)]
pub struct UsernameAvailability {
  pub available: bool,
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
  let users = state.store.users()?;
  let mut out = Vec::with_capacity(users.len());
  for user in users {
    let tracks = state.store.track_summaries(user.id)?;
    out.push(UserResponse {
      id: user.id,
      profile: user.profile,
      tracks,
    });
  }
  Ok(Json(out))
}

/// GET /users/verify-username?username=...
pub async fn verify_username(
  State(state): State<AppState>,
  Query(query): Query<UsernameQuery>,
) -> ApiResult<Json<UsernameAvailability>> {
  if query.username.trim().is_empty() {
    return Err(ApiError::BadRequest("Username is required".to_string()));
  }
  let available = state.store.username_available(&query.username)?;
  Ok(Json(UsernameAvailability { available }))
}

/// POST /users
pub async fn create_user(
  State(state): State<AppState>,
  Json(profile): Json<UserProfile>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
  if profile.username.trim().is_empty() {
    return Err(ApiError::BadRequest("Username is required".to_string()));
  }

  let user = state.store.create_user(profile)?;
  state.persist();
  Ok((
    StatusCode::CREATED,
    Json(UserResponse {
      id: user.id,
      profile: user.profile,
      tracks: Vec::new(),
    }),
  ))
}

/// GET /users/{id}
pub async fn get_user(
  State(state): State<AppState>,
  Path(user_id): Path<UserId>,
) -> ApiResult<Json<UserResponse>> {
  let user = state.store.user(user_id)?;
  let tracks = state.store.track_summaries(user_id)?;
  Ok(Json(UserResponse {
    id: user.id,
    profile: user.profile,
    tracks,
  }))
}

/// DELETE /users/{id}
pub async fn delete_user(
  State(state): State<AppState>,
  Path(user_id): Path<UserId>,
) -> ApiResult<StatusCode> {
  state.store.delete_user(user_id)?;
  state.persist();
  Ok(StatusCode::NO_CONTENT)
}
