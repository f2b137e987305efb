//! Daily maintenance task.
//!
//! Watches the clock and rolls every track forward once the date changes.
//! The task only runs while the server runs; startup performs its own
//! roll-forward before requests are accepted.

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::clock::Clock;
use super::persistence::PersistenceSink;
use super::store::{Store, StoreError};
use crate::srs::RolloverReport;

/// Message types for maintenance task communication
#[derive(Debug)]
pub enum MaintenanceMessage {
    Shutdown,
}

/// Roll the whole store forward to the clock's date and queue a snapshot.
pub fn roll_forward_store(
    store: &Store,
    clock: &dyn Clock,
    sink: Option<&PersistenceSink>,
) -> Result<(NaiveDate, RolloverReport), StoreError> {
    let today = clock.today();
    let report = store.roll_forward_all(today)?;
    tracing::info!(
        date = %crate::domain::date::format_date(today),
        tracks = report.tracks,
        cards = report.cards,
        due = report.due_schedules,
        "Rolled schedules forward"
    );
    if let Some(sink) = sink {
        sink.submit(store.snapshot()?);
    }
    Ok((today, report))
}

pub struct MaintenanceTask {
    sender: mpsc::Sender<MaintenanceMessage>,
}

impl MaintenanceTask {
    /// Start the task in the background. `last_run` is the date of the
    /// startup roll-forward.
    pub fn start(
        store: Arc<Store>,
        clock: Arc<dyn Clock>,
        sink: PersistenceSink,
        check_interval: Duration,
        last_run: NaiveDate,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(maintenance_loop(store, clock, sink, check_interval, last_run, rx));
        (Self { sender: tx }, handle)
    }

    pub fn shutdown(&self) {
        let _ = self.sender.try_send(MaintenanceMessage::Shutdown);
    }
}

async fn maintenance_loop(
    store: Arc<Store>,
    clock: Arc<dyn Clock>,
    sink: PersistenceSink,
    check_interval: Duration,
    mut last_run: NaiveDate,
    mut receiver: mpsc::Receiver<MaintenanceMessage>,
) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(check_interval) => {}
            msg = receiver.recv() => match msg {
                Some(MaintenanceMessage::Shutdown) | None => {
                    tracing::info!("Maintenance task stopping");
                    break;
                }
            },
        }

        if clock.today() == last_run {
            continue;
        }

        match roll_forward_store(&store, clock.as_ref(), Some(&sink)) {
            Ok((today, _)) => last_run = today,
            Err(e) => tracing::warn!("Daily roll-forward failed: {}", e),
        }
    }
}
