//! Application state shared by all handlers.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::db::LogOnError;
use crate::services::{Clock, PersistenceSink, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub clock: Arc<dyn Clock>,
    /// None when running without persistence (tests)
    pub sink: Option<PersistenceSink>,
}

impl AppState {
    pub fn new(store: Arc<Store>, clock: Arc<dyn Clock>, sink: Option<PersistenceSink>) -> Self {
        Self { store, clock, sink }
    }

    /// Date used for every scheduling decision of one request.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Queue a snapshot of the store after a mutation.
    pub fn persist(&self) {
        if let Some(sink) = &self.sink {
            if let Some(users) = self.store.snapshot().log_warn("Failed to snapshot store") {
                sink.submit(users);
            }
        }
    }
}
