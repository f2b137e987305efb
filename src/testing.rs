//! Fixture builders shared by unit tests.

use chrono::NaiveDate;

use crate::domain::{CardContent, CardQuota, Skill, Track, TrackSettings, User, UserProfile};
use crate::srs::{self, editing};

/// First day used by the fixtures.
pub fn fixture_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

pub fn profile(username: &str) -> UserProfile {
    UserProfile {
        username: username.to_string(),
        first_name: "Test".to_string(),
        last_name: username.to_uppercase(),
        email: format!("{}@example.com", username),
    }
}

/// A track with `terms` inserted on the fixture day.
pub fn track_with_terms(from: &str, to: &str, settings: TrackSettings, terms: &[&str]) -> Track {
    let mut track = Track::new(from, to, settings);
    for term in terms {
        let content = CardContent::new(*term, vec![format!("{}-translation", term)]);
        editing::insert_card(&mut track, content, fixture_day());
    }
    track
}

/// Two users with tracks in varied states: passed and failed tests,
/// lapsed cards, optional content and an unlimited quota.
/// Tracks are in key order, as snapshots produce them.
pub fn sample_users() -> Vec<User> {
    let day = fixture_day();

    let mut first = User::new(1, profile("anna"));
    let mut german = track_with_terms("English", "German", TrackSettings::default(), &["house", "tree", "cat"]);
    german.cards[0].content.pronunciation = Some("house.mp3".to_string());
    german.cards[1].content.examples = vec!["The tree is tall".to_string()];
    german.cards[1].content.notes = "irregular plural".to_string();
    let _ = srs::apply_outcome(&mut german, Skill::FromLanguage, &[1, 2], true, day);

    let spanish_settings = TrackSettings {
        daily_test_cards: CardQuota::Unlimited,
        daily_test_tries: 1,
        writing_enabled: true,
        failed_cards_priority: true,
        ..TrackSettings::default()
    };
    let mut spanish = track_with_terms("English", "Spanish", spanish_settings, &["dog", "sun"]);
    let _ = srs::apply_outcome(&mut spanish, Skill::Writing, &[1], false, day);

    first.tracks = vec![german, spanish];
    first.track_keys = vec!["English-Spanish".to_string(), "English-German".to_string()];

    let mut second = User::new(2, profile("bohdan"));
    second.tracks = vec![track_with_terms("Ukrainian", "English", TrackSettings::default(), &["кіт"])];
    second.track_keys = vec!["Ukrainian-English".to_string()];

    vec![first, second]
}
