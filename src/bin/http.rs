#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::sync::Arc;

    use tracing::{info, warn};
    use work_calendar::{
        AppConfig, InMemoryWorkItemStore, SessionProvider, StaticSessionProvider, WorkBoard,
        WorkItemStore, http_api, telemetry,
    };

    telemetry::init_tracing("info")?;
    let config = AppConfig::from_env()?;

    let store: Arc<dyn WorkItemStore> = match &config.database_path {
        #[cfg(feature = "sqlite")]
        Some(path) => Arc::new(work_calendar::SqliteWorkItemStore::new(path)?),
        #[cfg(not(feature = "sqlite"))]
        Some(path) => {
            warn!(path = %path.display(), "sqlite support not compiled in; using memory store");
            Arc::new(InMemoryWorkItemStore::new())
        }
        None => Arc::new(InMemoryWorkItemStore::new()),
    };

    let sessions = match &config.sessions_path {
        Some(path) => StaticSessionProvider::from_json_file(path)?,
        None => StaticSessionProvider::new(),
    };
    if sessions.is_empty() {
        warn!("no sessions configured; every request will be rejected as unauthenticated");
    }
    let sessions: Arc<dyn SessionProvider> = Arc::new(sessions);

    info!(
        addr = %config.http_addr,
        start_hour = config.timeline.start_hour(),
        end_hour = config.timeline.end_hour(),
        slot_minutes = config.timeline.slot_minutes(),
        "starting work calendar"
    );
    let state = http_api::AppState::new(WorkBoard::new(store, sessions)).with_window(config.timeline);
    http_api::serve(config.http_addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
