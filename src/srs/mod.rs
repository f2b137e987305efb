//! Spaced-repetition scheduling: per-card review dates, per-skill daily test
//! sessions, and the selection of cards for testing and study.

pub mod editing;
pub mod error;
pub mod interval;
pub mod outcome;
pub mod rollover;
pub mod schedule;
pub mod study_selector;
pub mod test_selector;
pub mod test_state;

pub use error::SchedulingError;
pub use interval::{interval, repeat_date, INTERVAL_DAYS};
pub use outcome::{apply_outcome, OutcomeReport};
pub use rollover::{recompute_missing, roll_forward_all, roll_forward_track, RolloverReport};
pub use schedule::CardSchedule;
pub use study_selector::{
  can_study, generate_decoys, select_study_batch, select_study_batch_with, DecoyLimit,
  StudyBatch, StudyBucket, StudyCriterion, StudyOptions, MIN_STUDY_CARDS,
};
pub use test_selector::select_test_batch;
pub use test_state::{SkillTestState, TestStatus};
