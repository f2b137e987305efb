use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vocab_tracker::db::{self, LogOnError};
use vocab_tracker::services::{roll_forward_store, Clock, MaintenanceTask, PersistenceSink, Store, SystemClock};
use vocab_tracker::state::AppState;
use vocab_tracker::{config, handlers};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vocab_tracker=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = config::load_config();

  let repository = db::open_repository(config.storage_backend, &config.database_path)
    .expect("Failed to open storage");
  let users = repository.load_all_tracks().expect("Failed to load stored tracks");
  tracing::info!(users = users.len(), "Loaded store");

  let store = Arc::new(Store::from_users(users));
  let clock: Arc<dyn Clock> = Arc::new(SystemClock);
  let (sink, writer) = PersistenceSink::spawn(Arc::clone(&repository));

  // Selections must see today's state before the first request
  let (today, _) = roll_forward_store(&store, clock.as_ref(), Some(&sink))
    .expect("Startup roll-forward failed");

  let (maintenance, maintenance_handle) = MaintenanceTask::start(
    Arc::clone(&store),
    Arc::clone(&clock),
    sink.clone(),
    config.maintenance_interval,
    today,
  );

  let state = AppState::new(Arc::clone(&store), clock, Some(sink));
  let app = handlers::router(state, &config.audio_dir);

  let bind_addr = config.bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", config.port);

  axum::serve(listener, app)
    .with_graceful_shutdown(async {
      let _ = tokio::signal::ctrl_c().await;
      tracing::info!("Shutting down");
    })
    .await
    .expect("Server failed to start");

  maintenance.shutdown();
  let _ = maintenance_handle.await;
  // Every sink clone is gone with the router and the maintenance task, so the
  // writer finishes its in-flight save and exits
  writer.await.log_warn("Persistence writer failed");

  // Final snapshot, written after the writer so no older save can follow it
  if let Some(users) = store.snapshot().log_warn("Failed to snapshot store on shutdown") {
    repository
      .save_tracks(&users)
      .log_warn("Failed to save store on shutdown");
  }
}
