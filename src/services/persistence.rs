//! Best-effort background persistence of store snapshots.
//!
//! Mutations hand a snapshot to the sink and return immediately. The sink
//! keeps only the newest pending snapshot in a slot and wakes a single
//! background task that writes it through the repository; failures are
//! logged and never reach the caller.

use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::db::{LogOnError, Repository};
use crate::domain::User;

type Slot = Arc<Mutex<Option<Vec<User>>>>;

#[derive(Clone)]
pub struct PersistenceSink {
    pending: Slot,
    wake: mpsc::Sender<()>,
}

impl PersistenceSink {
    /// Start the writer task on the current tokio runtime.
    ///
    /// The task ends once every sink clone is dropped and the last pending
    /// snapshot has been written.
    pub fn spawn(repository: Arc<dyn Repository>) -> (Self, JoinHandle<()>) {
        let pending: Slot = Arc::default();
        // One pending wake-up is enough: the writer always reads the slot
        let (tx, rx) = mpsc::channel(1);
        let handle = tokio::spawn(writer_loop(repository, Arc::clone(&pending), rx));
        (Self { pending, wake: tx }, handle)
    }

    /// Replace the pending snapshot without waiting for it to be written.
    pub fn submit(&self, users: Vec<User>) {
        match self.pending.lock() {
            Ok(mut slot) => *slot = Some(users),
            Err(_) => {
                tracing::warn!("Persistence slot poisoned, snapshot dropped");
                return;
            }
        }
        if let Err(mpsc::error::TrySendError::Closed(_)) = self.wake.try_send(()) {
            tracing::warn!("Persistence sink closed, snapshot not written");
        }
    }
}

fn take_pending(pending: &Slot) -> Option<Vec<User>> {
    pending.lock().ok().and_then(|mut slot| slot.take())
}

async fn writer_loop(repository: Arc<dyn Repository>, pending: Slot, mut wake: mpsc::Receiver<()>) {
    while wake.recv().await.is_some() {
        let Some(latest) = take_pending(&pending) else {
            continue;
        };

        let repo = Arc::clone(&repository);
        let tracks: usize = latest.iter().map(|u| u.tracks.len()).sum();
        let result = tokio::task::spawn_blocking(move || repo.save_tracks(&latest)).await;
        match result {
            Ok(saved) => {
                if saved.log_warn("Failed to persist store snapshot").is_some() {
                    tracing::debug!(tracks, "Persisted store snapshot");
                }
            }
            Err(e) => tracing::warn!("Persistence task panicked: {}", e),
        }
    }
    tracing::info!("Persistence sink closed");
}
