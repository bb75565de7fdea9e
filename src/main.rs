use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use event_feed_api::{
    background::BackgroundScheduler,
    build_router,
    config::LogFormat,
    database::{self, PgEventStore},
    services::{HttpFeedSource, InMemoryEventStore, SharedEventStore, SyncService},
    AppState, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Load configuration
    let config = Arc::new(Config::from_env()?);

    init_tracing(config.log_format);
    info!("Starting event feed API server...");

    let store: SharedEventStore = match &config.database_url {
        Some(url) => {
            let pool = database::new_pool(url).await?;
            info!("Using Postgres event store");
            Arc::new(PgEventStore::new(pool))
        }
        None => {
            info!("DATABASE_URL not set, keeping events in memory");
            Arc::new(InMemoryEventStore::new())
        }
    };

    let source = HttpFeedSource::new(config.provider_url.clone(), config.provider_timeout())?;
    info!("Provider feed: {}", source.url());

    let sync = SyncService::new(Arc::new(source), store.clone());

    // First cycle runs here, then on the interval
    let scheduler = BackgroundScheduler::start(sync.clone(), config.sync_interval()).await?;

    let app_state = AppState {
        store,
        sync,
        config: config.clone(),
    };
    let app = build_router(app_state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutting down...");
            scheduler.shutdown().await;
        }
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "event_feed_api=debug,tower_http=debug".into());

    match format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
