pub mod card;
pub mod date;
pub mod settings;
pub mod skill;
pub mod track;
pub mod user;

pub use card::{Card, CardContent, CardId, DECOY_SUFFIX};
pub use settings::{CardQuota, TrackSettings};
pub use skill::{PerSkill, Skill};
pub use track::{track_key, Track};
pub use user::{touch_key, User, UserId, UserProfile};
