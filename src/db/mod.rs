pub mod json_file;
pub mod schema;
pub mod sqlite;

use std::path::Path;
use std::sync::Arc;

use crate::config::StorageBackend;
use crate::domain::User;

pub use json_file::JsonFileRepository;
pub use schema::run_migrations;
pub use sqlite::SqliteRepository;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                None
            }
        }
    }
}

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Io(std::io::Error),
    Json(serde_json::Error),
    /// A thread panicked while holding the connection
    Lock,
}

impl std::fmt::Display for DbError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      DbError::Sqlite(e) => write!(f, "Database error: {}", e),
      DbError::Io(e) => write!(f, "Storage I/O error: {}", e),
      DbError::Json(e) => write!(f, "Storage format error: {}", e),
      DbError::Lock => write!(f, "Database unavailable"),
    }
  }
}

impl std::error::Error for DbError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      DbError::Sqlite(e) => Some(e),
      DbError::Io(e) => Some(e),
      DbError::Json(e) => Some(e),
      DbError::Lock => None,
    }
  }
}

impl From<rusqlite::Error> for DbError {
  fn from(e: rusqlite::Error) -> Self {
    DbError::Sqlite(e)
  }
}

impl From<std::io::Error> for DbError {
  fn from(e: std::io::Error) -> Self {
    DbError::Io(e)
  }
}

impl From<serde_json::Error> for DbError {
  fn from(e: serde_json::Error) -> Self {
    DbError::Json(e)
  }
}

/// Snapshot storage for every user and their tracks.
///
/// The in-memory store is authoritative; a repository is read once at
/// startup and written with full snapshots afterwards.
pub trait Repository: Send + Sync {
  fn load_all_tracks(&self) -> Result<Vec<User>, DbError>;
  fn save_tracks(&self, users: &[User]) -> Result<(), DbError>;
}

pub fn open_repository(backend: StorageBackend, path: &Path) -> Result<Arc<dyn Repository>, DbError> {
  let repo: Arc<dyn Repository> = match backend {
    StorageBackend::Sqlite => Arc::new(SqliteRepository::open(path)?),
    StorageBackend::Json => Arc::new(JsonFileRepository::new(path)),
  };
  tracing::info!(backend = backend.as_str(), path = %path.display(), "Opened repository");
  Ok(repo)
}
