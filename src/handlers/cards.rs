use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::error::{ApiError, ApiResult};
use crate::domain::{Card, CardContent, CardId, UserId};
use crate::srs::{editing, SchedulingError};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCardQuery {
  /// Re-add the card with a fresh schedule instead of editing in place
  #[serde(default)]
  pub reschedule: bool,
}

fn validate(content: &CardContent) -> ApiResult<()> {
  if content.term.trim().is_empty() {
    return Err(ApiError::BadRequest("Card term is required".to_string()));
  }
  Ok(())
}

/// GET /users/{id}/tracks/{key}/cards
pub async fn list_cards(
  State(state): State<AppState>,
  Path((user_id, key)): Path<(UserId, String)>,
) -> ApiResult<Json<Vec<Card>>> {
  let cards = state
    .store
    .read_track(user_id, &key, |track| Ok(editing::list_cards(track)))?;
  Ok(Json(cards))
}

/// POST /users/{id}/tracks/{key}/cards
pub async fn add_card(
  State(state): State<AppState>,
  Path((user_id, key)): Path<(UserId, String)>,
  Json(content): Json<CardContent>,
) -> ApiResult<(StatusCode, Json<Card>)> {
  validate(&content)?;
  let today = state.today();
  let card = state.store.write_track(user_id, &key, |track| {
    editing::verify_new_card(track, &content)?;
    let id = editing::insert_card(track, content, today);
    track.card(id).cloned().ok_or(SchedulingError::CardNotFound(id))
  })?;
  state.persist();
  Ok((StatusCode::CREATED, Json(card)))
}

/// POST /users/{id}/tracks/{key}/cards/verify
pub async fn verify_card(
  State(state): State<AppState>,
  Path((user_id, key)): Path<(UserId, String)>,
  Json(content): Json<CardContent>,
) -> ApiResult<Json<serde_json::Value>> {
  validate(&content)?;
  state
    .store
    .read_track(user_id, &key, |track| editing::verify_new_card(track, &content))?;
  Ok(Json(serde_json::json!({ "ok": true })))
}

/// GET /users/{id}/tracks/{key}/cards/{card_id}
pub async fn get_card(
  State(state): State<AppState>,
  Path((user_id, key, card_id)): Path<(UserId, String, CardId)>,
) -> ApiResult<Json<Card>> {
  let card = state.store.read_track(user_id, &key, |track| {
    track.card(card_id).cloned().ok_or(SchedulingError::CardNotFound(card_id))
  })?;
  Ok(Json(card))
}

/// PUT /users/{id}/tracks/{key}/cards/{card_id}
pub async fn update_card(
  State(state): State<AppState>,
  Path((user_id, key, card_id)): Path<(UserId, String, CardId)>,
  Query(query): Query<UpdateCardQuery>,
  Json(content): Json<CardContent>,
) -> ApiResult<Json<Card>> {
  validate(&content)?;
  let today = state.today();
  let card = state.store.write_track(user_id, &key, |track| {
    let id = if query.reschedule {
      editing::replace_card(track, card_id, content, today)?
    } else {
      editing::update_card_content(track, card_id, content)?;
      card_id
    };
    track.card(id).cloned().ok_or(SchedulingError::CardNotFound(id))
  })?;
  state.persist();
  Ok(Json(card))
}

/// DELETE /users/{id}/tracks/{key}/cards/{card_id}
pub async fn delete_card(
  State(state): State<AppState>,
  Path((user_id, key, card_id)): Path<(UserId, String, CardId)>,
) -> ApiResult<StatusCode> {
  let today = state.today();
  state
    .store
    .write_track(user_id, &key, |track| editing::delete_card(track, card_id, today))?;
  state.persist();
  Ok(StatusCode::NO_CONTENT)
}
