//! Periodic fetch → decode → merge driver.
//!
//! Each cycle pulls both upstream blobs, decodes them into event records and
//! merges the records into the cache one at a time, in feed order. A failed
//! fetch skips the whole cycle; nothing is decoded or merged from a partial
//! snapshot.

use crate::cache::{CacheEvent, EventCache};
use crate::decode::{decode_snapshot, MappingFormat};
use crate::feed::{FeedError, FeedSource};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Cap on individually logged diagnostics per cycle.
const MAX_LOGGED_SKIPS: usize = 5;

/// Outcome of one crawl cycle.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    pub records: usize,
    pub inserted: usize,
    pub removed: usize,
    pub status_changes: usize,
    pub score_changes: usize,
    pub skipped: usize,
    pub duration: Duration,
}

impl SyncStats {
    pub fn has_changes(&self) -> bool {
        self.inserted > 0 || self.removed > 0 || self.status_changes > 0 || self.score_changes > 0
    }
}

pub struct Crawler<S> {
    source: S,
    cache: EventCache,
    format: MappingFormat,
}

impl<S: FeedSource> Crawler<S> {
    pub fn new(source: S, cache: EventCache, format: MappingFormat) -> Self {
        Self {
            source,
            cache,
            format,
        }
    }

    pub fn cache(&self) -> &EventCache {
        &self.cache
    }

    /// Run a single cycle.
    pub async fn fetch_and_update(&self) -> Result<SyncStats, FeedError> {
        let start = Instant::now();

        let (raw_events, raw_mappings) =
            futures::try_join!(self.source.fetch_events(), self.source.fetch_mappings())?;

        let decoded = decode_snapshot(&raw_events, &raw_mappings, self.format);

        let mut stats = SyncStats {
            records: decoded.value.len(),
            skipped: decoded.skipped.len(),
            ..SyncStats::default()
        };

        if !decoded.skipped.is_empty() {
            warn!(
                skipped = decoded.skipped.len(),
                records = stats.records,
                "feed snapshot contained malformed entries"
            );
            for entry in decoded.skipped.iter().take(MAX_LOGGED_SKIPS) {
                debug!(
                    position = entry.position,
                    reason = %entry.reason,
                    raw = %entry.raw,
                    "skipped feed entry"
                );
            }
        }

        for record in decoded.value {
            for event in self.cache.merge(record) {
                match event {
                    CacheEvent::Inserted { .. } => stats.inserted += 1,
                    CacheEvent::Removed { .. } => stats.removed += 1,
                    CacheEvent::StatusChanged { .. } => stats.status_changes += 1,
                    CacheEvent::ScoresChanged { .. } => stats.score_changes += 1,
                }
            }
        }

        stats.duration = start.elapsed();
        Ok(stats)
    }

    /// Crawl forever at `poll_interval`. Failed cycles are logged and the
    /// loop carries on with the next tick.
    pub async fn run(self, poll_interval: Duration) {
        info!(
            interval_ms = poll_interval.as_millis() as u64,
            format = %self.format,
            "starting feed crawler"
        );

        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            match self.fetch_and_update().await {
                Ok(stats) => {
                    if stats.has_changes() {
                        let cache = self.cache.stats();
                        info!(
                            records = stats.records,
                            inserted = stats.inserted,
                            removed = stats.removed,
                            status_changes = stats.status_changes,
                            score_changes = stats.score_changes,
                            cached = cache.total,
                            active = cache.active,
                            elapsed_ms = stats.duration.as_millis() as u64,
                            "feed sync"
                        );
                    } else {
                        debug!(records = stats.records, "feed sync, no changes");
                    }
                }
                Err(e) => warn!(error = %e, "feed fetch failed, skipping cycle"),
            }
        }
    }
}
