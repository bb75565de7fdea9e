// Run a single sync cycle and print what ended up in the store
// Usage: cargo run --bin sync_once -- [--url <feed-url> | --file <feed.xml>] [--database-url <url>]

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use event_feed_api::{
    config::DEFAULT_PROVIDER_URL,
    database::{self, PgEventStore},
    services::{
        FeedSource, FileFeedSource, HttpFeedSource, InMemoryEventStore, SharedEventStore,
        SyncService,
    },
};

#[derive(Parser, Debug)]
#[command(about = "Fetch the provider feed once and upsert its online events")]
struct Args {
    /// Provider feed URL
    #[arg(long, env = "PROVIDER_URL", default_value = DEFAULT_PROVIDER_URL)]
    url: String,

    /// Read the feed from a local XML file instead of the provider (takes precedence over --url)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Write to Postgres instead of a throwaway in-memory store
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Only print events contained in this window (requires --ends-at)
    #[arg(long, requires = "ends_at")]
    starts_at: Option<String>,

    #[arg(long, requires = "starts_at")]
    ends_at: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "event_feed_api=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let source: Arc<dyn FeedSource> = match &args.file {
        Some(path) => Arc::new(FileFeedSource::new(path)),
        None => Arc::new(HttpFeedSource::new(
            args.url.clone(),
            Duration::from_secs(args.timeout),
        )?),
    };

    let store: SharedEventStore = match &args.database_url {
        Some(url) => Arc::new(PgEventStore::new(database::new_pool(url).await?)),
        None => Arc::new(InMemoryEventStore::new()),
    };

    let sync = SyncService::new(source, store.clone());
    let report = sync.run_cycle().await?;

    // Everything when no window is given; string ordering puts "" first and "\u{10FFFF}" last
    let (starts_at, ends_at) = match (&args.starts_at, &args.ends_at) {
        (Some(s), Some(e)) => (s.clone(), e.clone()),
        _ => (String::new(), char::MAX.to_string()),
    };
    let events = store.query(&starts_at, &ends_at).await?;

    let output = serde_json::json!({
        "report": report,
        "events": events,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
