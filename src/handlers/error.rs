use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::services::StoreError;
use crate::srs::SchedulingError;

/// Error returned by JSON handlers as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
  BadRequest(String),
  Store(StoreError),
}

impl From<StoreError> for ApiError {
  fn from(e: StoreError) -> Self {
    ApiError::Store(e)
  }
}

impl From<SchedulingError> for ApiError {
  fn from(e: SchedulingError) -> Self {
    ApiError::Store(StoreError::Scheduling(e))
  }
}

impl ApiError {
  pub fn status_code(&self) -> StatusCode {
    match self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(e) => match e {
        StoreError::UserNotFound(_) | StoreError::TrackNotFound(_) => StatusCode::NOT_FOUND,
        StoreError::TrackExists(_) | StoreError::UsernameTaken(_) => StatusCode::CONFLICT,
        StoreError::Lock => StatusCode::INTERNAL_SERVER_ERROR,
        StoreError::Scheduling(e) => match e {
          SchedulingError::CardNotFound(_) => StatusCode::NOT_FOUND,
          SchedulingError::DuplicateCard { .. }
          | SchedulingError::AlreadyCompleted { .. }
          | SchedulingError::TriesExhausted => StatusCode::CONFLICT,
          SchedulingError::NoneDue { .. }
          | SchedulingError::NoCardsToStudy
          | SchedulingError::UnknownSkill(_)
          | SchedulingError::SkillDisabled(_) => StatusCode::BAD_REQUEST,
        },
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status_code();
    let mut body = match &self {
      ApiError::BadRequest(msg) => serde_json::json!({ "error": msg }),
      ApiError::Store(e) => serde_json::json!({ "error": e.user_message() }),
    };

    if let ApiError::Store(StoreError::Scheduling(e)) = &self {
      match e {
        SchedulingError::AlreadyCompleted { status } | SchedulingError::NoneDue { status } => {
          body["status"] = serde_json::json!(status.as_str());
        }
        SchedulingError::DuplicateCard { existing_id } => {
          body["existingId"] = serde_json::json!(existing_id);
        }
        _ => {}
      }
    }

    if status == StatusCode::INTERNAL_SERVER_ERROR {
      tracing::error!("Request failed: {:?}", self);
    } else {
      tracing::debug!(status = status.as_u16(), "Request rejected: {:?}", self);
    }
    (status, Json(body)).into_response()
  }
}

pub type ApiResult<T> = Result<T, ApiError>;
