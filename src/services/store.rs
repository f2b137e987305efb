//! In-memory authoritative store of users and their tracks.
//!
//! Each track sits behind its own lock so edits to different tracks proceed
//! in parallel. Callers address tracks by `(user_id, key)` and run their work
//! inside a closure while the lock is held; nothing awaits under a lock.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{touch_key, track_key, Track, TrackSettings, User, UserId, UserProfile};
use crate::srs::{self, RolloverReport, SchedulingError};

pub type TrackHandle = Arc<RwLock<Track>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    UserNotFound(UserId),
    TrackNotFound(String),
    TrackExists(String),
    UsernameTaken(String),
    /// A thread panicked while holding a store lock
    Lock,
    Scheduling(SchedulingError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::UserNotFound(id) => write!(f, "User {} not found", id),
            StoreError::TrackNotFound(key) => write!(f, "Track '{}' not found", key),
            StoreError::TrackExists(key) => write!(f, "Track '{}' already exists", key),
            StoreError::UsernameTaken(name) => write!(f, "Username '{}' is already taken", name),
            StoreError::Lock => write!(f, "Store unavailable"),
            StoreError::Scheduling(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Scheduling(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SchedulingError> for StoreError {
    fn from(e: SchedulingError) -> Self {
        StoreError::Scheduling(e)
    }
}

impl StoreError {
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Scheduling(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// A user with tracks behind individual locks.
struct UserEntry {
    profile: UserProfile,
    track_keys: Vec<String>,
    tracks: BTreeMap<String, TrackHandle>,
}

/// Track overview for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub key: String,
    pub from_language: String,
    pub to_language: String,
    pub card_count: usize,
}

#[derive(Default)]
pub struct Store {
    users: RwLock<BTreeMap<UserId, UserEntry>>,
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, StoreError> {
    lock.read().map_err(|_| {
        tracing::error!("Store lock poisoned");
        StoreError::Lock
    })
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, StoreError> {
    lock.write().map_err(|_| {
        tracing::error!("Store lock poisoned");
        StoreError::Lock
    })
}

fn username_taken(users: &BTreeMap<UserId, UserEntry>, username: &str) -> bool {
    users.values().any(|u| u.profile.username == username)
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the store from loaded users. Track keys missing from a user's
    /// MRU list are appended so every track stays reachable.
    pub fn from_users(users: Vec<User>) -> Self {
        let mut map = BTreeMap::new();
        for user in users {
            let mut track_keys: Vec<String> = user
                .track_keys
                .into_iter()
                .filter(|k| user.tracks.iter().any(|t| &t.key == k))
                .collect();
            let mut tracks = BTreeMap::new();
            for track in user.tracks {
                if !track_keys.contains(&track.key) {
                    track_keys.push(track.key.clone());
                }
                tracks.insert(track.key.clone(), Arc::new(RwLock::new(track)));
            }
            map.insert(
                user.id,
                UserEntry {
                    profile: user.profile,
                    track_keys,
                    tracks,
                },
            );
        }
        Self {
            users: RwLock::new(map),
        }
    }

    pub fn create_user(&self, profile: UserProfile) -> Result<User, StoreError> {
        let mut users = write(&self.users)?;
        let username = profile.username.trim().to_string();
        if username_taken(&users, &username) {
            return Err(StoreError::UsernameTaken(username));
        }

        let id = users.keys().next_back().map_or(1, |max| max + 1);
        let profile = UserProfile { username, ..profile };
        users.insert(
            id,
            UserEntry {
                profile: profile.clone(),
                track_keys: Vec::new(),
                tracks: BTreeMap::new(),
            },
        );
        tracing::info!(user_id = id, username = %profile.username, "Created user");
        Ok(User::new(id, profile))
    }

    /// True when no user has this username yet (compared trimmed).
    pub fn username_available(&self, username: &str) -> Result<bool, StoreError> {
        let users = read(&self.users)?;
        Ok(!username_taken(&users, username.trim()))
    }

    /// Remove a user together with all of their tracks.
    pub fn delete_user(&self, user_id: UserId) -> Result<(), StoreError> {
        let mut users = write(&self.users)?;
        let entry = users
            .remove(&user_id)
            .ok_or(StoreError::UserNotFound(user_id))?;
        tracing::info!(user_id, tracks = entry.tracks.len(), "Deleted user");
        Ok(())
    }

    /// Every user's profile and MRU track keys, ordered by id.
    pub fn users(&self) -> Result<Vec<User>, StoreError> {
        let users = read(&self.users)?;
        Ok(users
            .iter()
            .map(|(id, entry)| {
                let mut user = User::new(*id, entry.profile.clone());
                user.track_keys = entry.track_keys.clone();
                user
            })
            .collect())
    }

    /// Profile and MRU track keys of a user, without track contents.
    pub fn user(&self, user_id: UserId) -> Result<User, StoreError> {
        let users = read(&self.users)?;
        let entry = users.get(&user_id).ok_or(StoreError::UserNotFound(user_id))?;
        let mut user = User::new(user_id, entry.profile.clone());
        user.track_keys = entry.track_keys.clone();
        Ok(user)
    }

    /// Tracks of a user, most recently used first.
    pub fn track_summaries(&self, user_id: UserId) -> Result<Vec<TrackSummary>, StoreError> {
        let users = read(&self.users)?;
        let entry = users.get(&user_id).ok_or(StoreError::UserNotFound(user_id))?;
        let mut summaries = Vec::with_capacity(entry.track_keys.len());
        for key in &entry.track_keys {
            if let Some(handle) = entry.tracks.get(key) {
                let track = read(handle)?;
                summaries.push(TrackSummary {
                    key: track.key.clone(),
                    from_language: track.from_language.clone(),
                    to_language: track.to_language.clone(),
                    card_count: track.cards.len(),
                });
            }
        }
        Ok(summaries)
    }

    pub fn create_track(
        &self,
        user_id: UserId,
        from_language: &str,
        to_language: &str,
        settings: TrackSettings,
        today: NaiveDate,
    ) -> Result<Track, StoreError> {
        let mut users = write(&self.users)?;
        let entry = users
            .get_mut(&user_id)
            .ok_or(StoreError::UserNotFound(user_id))?;

        let key = track_key(from_language, to_language);
        if entry.tracks.contains_key(&key) {
            return Err(StoreError::TrackExists(key));
        }

        let mut track = Track::new(from_language, to_language, settings);
        srs::roll_forward_track(&mut track, today);
        touch_key(&mut entry.track_keys, &key);
        entry
            .tracks
            .insert(key.clone(), Arc::new(RwLock::new(track.clone())));
        tracing::info!(user_id, track = %key, "Created track");
        Ok(track)
    }

    pub fn delete_track(&self, user_id: UserId, key: &str) -> Result<(), StoreError> {
        let mut users = write(&self.users)?;
        let entry = users
            .get_mut(&user_id)
            .ok_or(StoreError::UserNotFound(user_id))?;
        if entry.tracks.remove(key).is_none() {
            return Err(StoreError::TrackNotFound(key.to_string()));
        }
        entry.track_keys.retain(|k| k != key);
        tracing::info!(user_id, track = %key, "Deleted track");
        Ok(())
    }

    /// Look up a track and move it to the front of the user's MRU list.
    fn open_track(&self, user_id: UserId, key: &str) -> Result<TrackHandle, StoreError> {
        let mut users = write(&self.users)?;
        let entry = users
            .get_mut(&user_id)
            .ok_or(StoreError::UserNotFound(user_id))?;
        let handle = entry
            .tracks
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::TrackNotFound(key.to_string()))?;
        touch_key(&mut entry.track_keys, key);
        Ok(handle)
    }

    /// Run `f` under the track's read lock.
    pub fn read_track<R>(
        &self,
        user_id: UserId,
        key: &str,
        f: impl FnOnce(&Track) -> Result<R, SchedulingError>,
    ) -> Result<R, StoreError> {
        let handle = self.open_track(user_id, key)?;
        let track = read(&handle)?;
        Ok(f(&track)?)
    }

    /// Run `f` under the track's write lock.
    pub fn write_track<R>(
        &self,
        user_id: UserId,
        key: &str,
        f: impl FnOnce(&mut Track) -> Result<R, SchedulingError>,
    ) -> Result<R, StoreError> {
        let handle = self.open_track(user_id, key)?;
        let mut track = write(&handle)?;
        Ok(f(&mut track)?)
    }

    /// Roll every track forward to `today`, one track lock at a time.
    pub fn roll_forward_all(&self, today: NaiveDate) -> Result<RolloverReport, StoreError> {
        let handles: Vec<TrackHandle> = {
            let users = read(&self.users)?;
            users
                .values()
                .flat_map(|u| u.tracks.values().cloned())
                .collect()
        };

        let mut report = RolloverReport::default();
        for handle in handles {
            let mut track = write(&handle)?;
            report.merge(srs::roll_forward_track(&mut track, today));
        }
        Ok(report)
    }

    /// Deep copy of every user and track, for persistence.
    pub fn snapshot(&self) -> Result<Vec<User>, StoreError> {
        let users = read(&self.users)?;
        let mut out = Vec::with_capacity(users.len());
        for (id, entry) in users.iter() {
            let mut user = User::new(*id, entry.profile.clone());
            user.track_keys = entry.track_keys.clone();
            for handle in entry.tracks.values() {
                user.tracks.push(read(handle)?.clone());
            }
            out.push(user);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CardContent, Skill};
    use crate::srs::{editing, TestStatus};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn profile(name: &str) -> UserProfile {
        UserProfile {
            username: name.to_string(),
            ..UserProfile::default()
        }
    }

    fn store_with_user() -> (Store, UserId) {
        let store = Store::new();
        let user = store.create_user(profile("ivan")).unwrap();
        (store, user.id)
    }

    #[test]
    fn test_user_ids_increment_and_names_unique() {
        let store = Store::new();
        assert_eq!(store.create_user(profile("a")).unwrap().id, 1);
        assert_eq!(store.create_user(profile("b")).unwrap().id, 2);
        assert_eq!(
            store.create_user(profile(" a ")),
            Err(StoreError::UsernameTaken("a".to_string()))
        );
    }

    #[test]
    fn test_username_available() {
        let (store, _) = store_with_user();
        assert!(!store.username_available("ivan").unwrap());
        assert!(!store.username_available(" ivan ").unwrap());
        assert!(store.username_available("petro").unwrap());
    }

    #[test]
    fn test_delete_user_drops_tracks_and_frees_name() {
        let (store, id) = store_with_user();
        store.create_user(profile("petro")).unwrap();
        store
            .create_track(id, "English", "Dutch", TrackSettings::default(), day(1))
            .unwrap();

        store.delete_user(id).unwrap();
        assert_eq!(store.user(id), Err(StoreError::UserNotFound(id)));
        assert_eq!(
            store.read_track(id, "English-Dutch", |_| Ok(())),
            Err(StoreError::UserNotFound(id))
        );
        assert!(store.username_available("ivan").unwrap());
        assert_eq!(store.delete_user(id), Err(StoreError::UserNotFound(id)));

        let names: Vec<_> = store
            .users()
            .unwrap()
            .into_iter()
            .map(|u| u.profile.username)
            .collect();
        assert_eq!(names, vec!["petro"]);
    }

    #[test]
    fn test_unknown_user_and_track() {
        let (store, id) = store_with_user();
        assert_eq!(store.user(42), Err(StoreError::UserNotFound(42)));
        assert_eq!(
            store.read_track(id, "English-Dutch", |t| Ok(t.cards.len())),
            Err(StoreError::TrackNotFound("English-Dutch".to_string()))
        );
    }

    #[test]
    fn test_create_track_twice_conflicts() {
        let (store, id) = store_with_user();
        store
            .create_track(id, "English", "Dutch", TrackSettings::default(), day(1))
            .unwrap();
        assert_eq!(
            store
                .create_track(id, "English", "Dutch", TrackSettings::default(), day(1))
                .map(|t| t.key),
            Err(StoreError::TrackExists("English-Dutch".to_string()))
        );
    }

    #[test]
    fn test_track_access_moves_key_to_front() {
        let (store, id) = store_with_user();
        for to in ["Dutch", "Greek", "Czech"] {
            store
                .create_track(id, "English", to, TrackSettings::default(), day(1))
                .unwrap();
        }
        assert_eq!(
            store.user(id).unwrap().track_keys,
            vec!["English-Czech", "English-Greek", "English-Dutch"]
        );

        store.read_track(id, "English-Dutch", |_| Ok(())).unwrap();
        let keys: Vec<_> = store
            .track_summaries(id)
            .unwrap()
            .into_iter()
            .map(|s| s.key)
            .collect();
        assert_eq!(keys, vec!["English-Dutch", "English-Czech", "English-Greek"]);
    }

    #[test]
    fn test_write_track_propagates_scheduling_errors() {
        let (store, id) = store_with_user();
        store
            .create_track(id, "English", "Dutch", TrackSettings::default(), day(1))
            .unwrap();
        let result = store.write_track(id, "English-Dutch", |t| editing::delete_card(t, 3, day(1)));
        assert_eq!(
            result.map(|c| c.id),
            Err(StoreError::Scheduling(SchedulingError::CardNotFound(3)))
        );
    }

    #[test]
    fn test_snapshot_roundtrip_through_from_users() {
        let (store, id) = store_with_user();
        store
            .create_track(id, "English", "Dutch", TrackSettings::default(), day(1))
            .unwrap();
        store
            .write_track(id, "English-Dutch", |t| {
                Ok(editing::insert_card(t, CardContent::new("hello", vec!["hallo".into()]), day(1)))
            })
            .unwrap();

        let snapshot = store.snapshot().unwrap();
        let restored = Store::from_users(snapshot.clone());
        assert_eq!(restored.snapshot().unwrap(), snapshot);
        assert_eq!(snapshot[0].tracks[0].cards.len(), 1);
    }

    #[test]
    fn test_from_users_repairs_mru_list() {
        let mut user = User::new(7, profile("olha"));
        user.tracks.push(Track::new("English", "Dutch", TrackSettings::default()));
        user.track_keys = vec!["Gone-Track".to_string()];
        let store = Store::from_users(vec![user]);
        assert_eq!(store.user(7).unwrap().track_keys, vec!["English-Dutch"]);
    }

    #[test]
    fn test_roll_forward_all_resets_failed_tests() {
        let (store, id) = store_with_user();
        let settings = TrackSettings {
            daily_test_tries: 1,
            ..TrackSettings::default()
        };
        store
            .create_track(id, "English", "Dutch", settings, day(1))
            .unwrap();
        store
            .write_track(id, "English-Dutch", |t| {
                editing::insert_card(t, CardContent::new("a", vec![]), day(1));
                srs::apply_outcome(t, Skill::FromLanguage, &[1], false, day(1))
            })
            .unwrap();

        let report = store.roll_forward_all(day(2)).unwrap();
        assert_eq!(report.tracks, 1);
        let status = store
            .read_track(id, "English-Dutch", |t| Ok(t.test_state(Skill::FromLanguage).status))
            .unwrap();
        assert_ne!(status, TestStatus::Failed);
    }

    #[test]
    fn test_delete_track() {
        let (store, id) = store_with_user();
        store
            .create_track(id, "English", "Dutch", TrackSettings::default(), day(1))
            .unwrap();
        store.delete_track(id, "English-Dutch").unwrap();
        assert!(store.user(id).unwrap().track_keys.is_empty());
        assert_eq!(
            store.delete_track(id, "English-Dutch"),
            Err(StoreError::TrackNotFound("English-Dutch".to_string()))
        );
    }
}
