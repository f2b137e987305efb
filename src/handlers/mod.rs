pub mod cards;
pub mod error;
pub mod maintenance;
pub mod settings;
pub mod study;
pub mod tracks;
pub mod users;

use axum::{
  routing::{get, post},
  Router,
};
use std::path::Path;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub use error::{ApiError, ApiResult};

/// JSON API routes plus static pronunciation audio.
pub fn router(state: AppState, audio_dir: &Path) -> Router {
  Router::new()
    .route("/users", get(users::list_users).post(users::create_user))
    .route("/users/verify-username", get(users::verify_username))
    .route("/users/{id}", get(users::get_user).delete(users::delete_user))
    .route("/users/{id}/tracks", get(tracks::list_tracks).post(tracks::create_track))
    .route("/users/{id}/tracks/{key}", get(tracks::get_track).delete(tracks::delete_track))
    .route(
      "/users/{id}/tracks/{key}/settings",
      get(settings::get_settings).post(settings::update_settings),
    )
    .route("/users/{id}/tracks/{key}/cards", get(cards::list_cards).post(cards::add_card))
    .route("/users/{id}/tracks/{key}/cards/verify", post(cards::verify_card))
    .route(
      "/users/{id}/tracks/{key}/cards/{card_id}",
      get(cards::get_card).put(cards::update_card).delete(cards::delete_card),
    )
    .route(
      "/users/{id}/tracks/{key}/tests/{skill}",
      get(daily_tests::get_test).post(daily_tests::submit_test),
    )
    .route("/users/{id}/tracks/{key}/study", get(study::get_study))
    .route("/users/{id}/tracks/{key}/can-study", get(study::can_study))
    .route("/maintenance/roll-forward", post(maintenance::roll_forward))
    .nest_service("/audio", ServeDir::new(audio_dir))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
