use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  // Complete schema for new databases; upgrades for older files follow
  conn.execute_batch(
    r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS users (
      id INTEGER PRIMARY KEY,
      username TEXT NOT NULL UNIQUE,
      first_name TEXT NOT NULL DEFAULT '',
      last_name TEXT NOT NULL DEFAULT '',
      email TEXT NOT NULL DEFAULT ''
    );

    CREATE TABLE IF NOT EXISTS tracks (
      user_id INTEGER NOT NULL,
      key TEXT NOT NULL,
      from_language TEXT NOT NULL,
      to_language TEXT NOT NULL,
      settings TEXT NOT NULL,
      tests TEXT NOT NULL,
      mru_position INTEGER NOT NULL DEFAULT 0,
      PRIMARY KEY (user_id, key),
      FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS cards (
      user_id INTEGER NOT NULL,
      track_key TEXT NOT NULL,
      id INTEGER NOT NULL,
      position INTEGER NOT NULL,
      term TEXT NOT NULL,
      creation_date TEXT NOT NULL,
      body TEXT NOT NULL,
      PRIMARY KEY (user_id, track_key, id),
      FOREIGN KEY (user_id, track_key) REFERENCES tracks(user_id, key) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_cards_track ON cards(user_id, track_key, position);
    "#,
  )?;

  // Migration: MRU ordering was added after the first release
  add_column_if_missing(conn, "tracks", "mru_position", "INTEGER NOT NULL DEFAULT 0")?;

  Ok(())
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
  conn
    .prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
    .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
  if !column_exists(conn, table, column) {
    conn.execute(
      &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
      [],
    )?;
  }
  Ok(())
}
