use rusqlite::{params, Connection, Transaction};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::{run_migrations, DbError, Repository};
use crate::domain::{Card, PerSkill, Track, TrackSettings, User, UserId, UserProfile};
use crate::srs::SkillTestState;

/// SQLite snapshot storage. Settings, test states and card bodies are JSON
/// columns. Tracks load in key order, cards in insertion order.
pub struct SqliteRepository {
  conn: Mutex<Connection>,
}

impl SqliteRepository {
  pub fn open(path: &Path) -> Result<Self, DbError> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    // Create backup before migrations if database exists
    if path.exists() {
      let backup_path = path.with_extension("db.backup");
      if let Err(e) = std::fs::copy(path, &backup_path) {
        tracing::warn!("Could not create database backup: {}", e);
      }
    }

    let conn = Connection::open(path)?;
    run_migrations(&conn)?;
    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  pub fn open_in_memory() -> Result<Self, DbError> {
    let conn = Connection::open_in_memory()?;
    run_migrations(&conn)?;
    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  fn lock(&self) -> Result<MutexGuard<'_, Connection>, DbError> {
    self.conn.lock().map_err(|_| {
      tracing::error!("Database mutex poisoned");
      DbError::Lock
    })
  }
}

impl Repository for SqliteRepository {
  fn load_all_tracks(&self) -> Result<Vec<User>, DbError> {
    let conn = self.lock()?;

    let mut users: BTreeMap<UserId, User> = BTreeMap::new();
    {
      let mut stmt =
        conn.prepare("SELECT id, username, first_name, last_name, email FROM users ORDER BY id")?;
      let rows = stmt.query_map([], |row| {
        let profile = UserProfile {
          username: row.get(1)?,
          first_name: row.get(2)?,
          last_name: row.get(3)?,
          email: row.get(4)?,
        };
        Ok(User::new(row.get(0)?, profile))
      })?;
      for user in rows {
        let user = user?;
        users.insert(user.id, user);
      }
    }

    let mut stmt = conn.prepare(
      r#"
      SELECT user_id, key, from_language, to_language, settings, tests, mru_position
      FROM tracks
      ORDER BY user_id, key
      "#,
    )?;
    let rows = stmt.query_map([], |row| {
      Ok((
        row.get::<_, UserId>(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, String>(2)?,
        row.get::<_, String>(3)?,
        row.get::<_, String>(4)?,
        row.get::<_, String>(5)?,
        row.get::<_, i64>(6)?,
      ))
    })?;

    let mut card_stmt =
      conn.prepare("SELECT body FROM cards WHERE user_id = ?1 AND track_key = ?2 ORDER BY position")?;

    let mut mru: BTreeMap<UserId, Vec<(i64, String)>> = BTreeMap::new();
    for row in rows {
      let (user_id, key, from_language, to_language, settings, tests, mru_position) = row?;
      let Some(user) = users.get_mut(&user_id) else {
        tracing::warn!(user_id, track = %key, "Skipping track of unknown user");
        continue;
      };

      let settings: TrackSettings = serde_json::from_str(&settings)?;
      let tests: PerSkill<SkillTestState> = serde_json::from_str(&tests)?;
      let bodies = card_stmt
        .query_map(params![user_id, key], |r| r.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
      let cards = bodies
        .iter()
        .map(|b| serde_json::from_str::<Card>(b))
        .collect::<Result<Vec<_>, _>>()?;

      mru.entry(user_id).or_default().push((mru_position, key.clone()));
      user.tracks.push(Track {
        key,
        from_language,
        to_language,
        cards,
        tests,
        settings,
      });
    }

    for (user_id, mut keys) in mru {
      keys.sort();
      if let Some(user) = users.get_mut(&user_id) {
        user.track_keys = keys.into_iter().map(|(_, key)| key).collect();
      }
    }

    Ok(users.into_values().collect())
  }

  fn save_tracks(&self, users: &[User]) -> Result<(), DbError> {
    let mut conn = self.lock()?;
    let tx = conn.transaction()?;
    tx.execute_batch("DELETE FROM cards; DELETE FROM tracks; DELETE FROM users;")?;
    for user in users {
      insert_user(&tx, user)?;
    }
    tx.commit()?;
    Ok(())
  }
}

fn insert_user(tx: &Transaction<'_>, user: &User) -> Result<(), DbError> {
  tx.execute(
    "INSERT INTO users (id, username, first_name, last_name, email) VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      user.id,
      user.profile.username,
      user.profile.first_name,
      user.profile.last_name,
      user.profile.email,
    ],
  )?;

  for track in &user.tracks {
    let mru_position = user
      .track_keys
      .iter()
      .position(|k| k == &track.key)
      .unwrap_or(user.track_keys.len());
    tx.execute(
      r#"
      INSERT INTO tracks (user_id, key, from_language, to_language, settings, tests, mru_position)
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
      "#,
      params![
        user.id,
        track.key,
        track.from_language,
        track.to_language,
        serde_json::to_string(&track.settings)?,
        serde_json::to_string(&track.tests)?,
        mru_position as i64,
      ],
    )?;

    for (position, card) in track.cards.iter().enumerate() {
      tx.execute(
        r#"
        INSERT INTO cards (user_id, track_key, id, position, term, creation_date, body)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
          user.id,
          track.key,
          card.id,
          position as i64,
          card.content.term,
          crate::domain::date::format_date(card.creation_date),
          serde_json::to_string(card)?,
        ],
      )?;
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::sample_users;

  #[test]
  fn test_empty_database_loads_nothing() {
    let repo = SqliteRepository::open_in_memory().unwrap();
    assert!(repo.load_all_tracks().unwrap().is_empty());
  }

  #[test]
  fn test_save_then_load_preserves_everything() {
    let repo = SqliteRepository::open_in_memory().unwrap();
    let users = sample_users();
    repo.save_tracks(&users).unwrap();
    assert_eq!(repo.load_all_tracks().unwrap(), users);
  }

  #[test]
  fn test_save_replaces_previous_snapshot() {
    let repo = SqliteRepository::open_in_memory().unwrap();
    let mut users = sample_users();
    repo.save_tracks(&users).unwrap();

    users[0].tracks[0].cards.pop();
    users.truncate(1);
    repo.save_tracks(&users).unwrap();
    assert_eq!(repo.load_all_tracks().unwrap(), users);
  }

  #[test]
  fn test_reopen_file_database_and_backup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("vocab.db");
    let users = sample_users();
    SqliteRepository::open(&path).unwrap().save_tracks(&users).unwrap();

    let reopened = SqliteRepository::open(&path).unwrap();
    assert_eq!(reopened.load_all_tracks().unwrap(), users);
    assert!(path.with_extension("db.backup").exists());
  }
}
