//! Project path functions - single source of truth for all file paths.
//!
//! ## Environment Variables
//!
//! - `DATA_DIR`: Override the base data directory (default: "data")
//!
//! This allows running multiple isolated server instances:
//! ```bash
//! DATA_DIR=data/test/a PORT=3001 cargo run
//! DATA_DIR=data/test/b PORT=3002 cargo run
//! ```

use std::env;
use std::sync::OnceLock;

/// Lazily initialized data directory from DATA_DIR env var
static DATA_DIR_VALUE: OnceLock<String> = OnceLock::new();

/// Get the base data directory (from DATA_DIR env var or default "data")
pub fn data_dir() -> &'static str {
    DATA_DIR_VALUE.get_or_init(|| env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

/// SQLite snapshot database
pub fn sqlite_db_path() -> String {
    format!("{}/vocab.db", data_dir())
}

/// JSON snapshot document
pub fn json_storage_path() -> String {
    format!("{}/storage.json", data_dir())
}

/// Pronunciation audio served under /audio
pub fn audio_dir() -> String {
    format!("{}/audio", data_dir())
}
