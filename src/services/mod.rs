//! Application services around the scheduling core.
//!
//! The store is the in-memory authority; the persistence sink and the
//! maintenance task run in the background beside the HTTP server.

pub mod clock;
pub mod maintenance;
pub mod persistence;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use maintenance::{roll_forward_store, MaintenanceTask};
pub use persistence::PersistenceSink;
pub use store::{Store, StoreError, TrackSummary};
