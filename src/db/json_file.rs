use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{DbError, Repository};
use crate::domain::User;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StorageDocument {
  #[serde(default)]
  users: Vec<User>,
}

/// Whole-store snapshot in a single JSON document.
pub struct JsonFileRepository {
  path: PathBuf,
  /// Serializes writers so two snapshots never interleave on disk
  write_lock: Mutex<()>,
}

impl JsonFileRepository {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      write_lock: Mutex::new(()),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl Repository for JsonFileRepository {
  fn load_all_tracks(&self) -> Result<Vec<User>, DbError> {
    if !self.path.exists() {
      tracing::info!(path = %self.path.display(), "No storage file yet, starting empty");
      return Ok(Vec::new());
    }
    let contents = std::fs::read_to_string(&self.path)?;
    if contents.trim().is_empty() {
      return Ok(Vec::new());
    }
    let doc: StorageDocument = serde_json::from_str(&contents)?;
    Ok(doc.users)
  }

  fn save_tracks(&self, users: &[User]) -> Result<(), DbError> {
    let _guard = self.write_lock.lock().map_err(|_| DbError::Lock)?;
    if let Some(parent) = self.path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let doc = StorageDocument {
      users: users.to_vec(),
    };
    let tmp = self.path.with_extension("json.tmp");
    std::fs::write(&tmp, serde_json::to_vec_pretty(&doc)?)?;
    std::fs::rename(&tmp, &self.path)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::sample_users;

  #[test]
  fn test_missing_file_is_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("storage.json"));
    assert!(repo.load_all_tracks().unwrap().is_empty());
  }

  #[test]
  fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("data").join("storage.json"));
    let users = sample_users();
    repo.save_tracks(&users).unwrap();
    assert!(repo.path().exists());
    assert_eq!(repo.load_all_tracks().unwrap(), users);
  }

  #[test]
  fn test_document_uses_dotted_dates() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("storage.json"));
    repo.save_tracks(&sample_users()).unwrap();
    let raw = std::fs::read_to_string(repo.path()).unwrap();
    assert!(raw.contains("\"creationDate\": \"2025.03.01\""));
  }

  #[test]
  fn test_corrupt_file_reports_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "{ not json").unwrap();
    let repo = JsonFileRepository::new(path);
    assert!(matches!(repo.load_all_tracks(), Err(DbError::Json(_))));
  }
}
