use scorefeed::api::{self, ApiState};
use scorefeed::cache::{CacheEvent, EventCache};
use scorefeed::config::Config;
use scorefeed::crawler::Crawler;
use scorefeed::feed::FeedClient;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Load config
    let config_path = Path::new("scorefeed.toml");
    let config = if config_path.exists() {
        Config::load(config_path)?
    } else {
        Config::from_env()?
    };

    // Initialize logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .init();
    }

    info!("scorefeed v{} starting", env!("CARGO_PKG_VERSION"));
    if !config_path.exists() {
        info!("no scorefeed.toml found, using env-only config");
    }

    // --- Event Cache ---
    let (cache_tx, mut cache_rx) = mpsc::unbounded_channel::<CacheEvent>();
    let cache = EventCache::with_events(cache_tx);

    // --- Crawler ---
    let client = FeedClient::new(&config.feed)?;
    let crawler = Crawler::new(client, cache.clone(), config.feed.mapping_format);
    let poll_interval = Duration::from_millis(config.feed.poll_interval_ms);
    info!(
        upstream = %config.feed.base_url,
        interval_ms = config.feed.poll_interval_ms,
        "feed crawler configured"
    );
    tokio::spawn(crawler.run(poll_interval));

    // --- Read Endpoint ---
    if config.server.enabled {
        let api_state = ApiState {
            cache: cache.clone(),
        };
        let bind = config.server.bind.clone();
        tokio::spawn(async move {
            if let Err(e) = api::serve(api_state, &bind).await {
                error!(error = %e, "read endpoint server error");
            }
        });
    } else {
        info!("read endpoint disabled (set server.enabled=true in config)");
    }

    // Cache summary every 60s
    let cache_for_summary = cache.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let stats = cache_for_summary.stats();
            info!(
                events = stats.total,
                active = stats.active,
                removed = stats.removed,
                "cache summary"
            );
        }
    });

    // --- Main Event Loop ---
    info!("entering main event loop - press Ctrl+C to stop");

    loop {
        tokio::select! {
            Some(cache_event) = cache_rx.recv() => {
                match cache_event {
                    CacheEvent::Inserted { id, status } => {
                        info!(id = %id, status = %status, "event inserted");
                    }
                    CacheEvent::Removed { id } => {
                        info!(id = %id, "event removed");
                    }
                    CacheEvent::StatusChanged { id, from, to } => {
                        info!(id = %id, from = %from, to = %to, "status changed");
                    }
                    CacheEvent::ScoresChanged { id, before, after } => {
                        debug!(
                            id = %id,
                            before = ?before,
                            after = ?after,
                            "scores changed"
                        );
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                let stats = cache.stats();
                info!(
                    events = stats.total,
                    active = stats.active,
                    "shutting down..."
                );
                break;
            }
        }
    }

    Ok(())
}
