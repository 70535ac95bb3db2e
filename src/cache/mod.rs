//! Reconciling in-memory event cache.
//!
//! Every decoded record is merged into the latest known state for its id.
//! Lifecycle only moves forward: once an event has been merged with status
//! `REMOVED` it is frozen, and later merges for that id are ignored even if
//! upstream flips it back to `PRE` or `LIVE`. Entries are never deleted.
//!
//! Merge is atomic per id (the check for a frozen entry and the write happen
//! under the same shard lock) and entries are replaced whole, so readers
//! never see a half-updated record.

use crate::event::{EventRecord, EventStatus, Scores};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::trace;

/// Change notifications emitted by [`EventCache::merge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    Inserted {
        id: String,
        status: EventStatus,
    },
    Removed {
        id: String,
    },
    StatusChanged {
        id: String,
        from: EventStatus,
        to: EventStatus,
    },
    ScoresChanged {
        id: String,
        before: Scores,
        after: Scores,
    },
}

impl CacheEvent {
    pub fn event_id(&self) -> &str {
        match self {
            CacheEvent::Inserted { id, .. }
            | CacheEvent::Removed { id }
            | CacheEvent::StatusChanged { id, .. }
            | CacheEvent::ScoresChanged { id, .. } => id,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total: usize,
    pub active: usize,
    pub removed: usize,
}

/// Thread-safe event store keyed by event id. Cheap to clone; clones share
/// the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct EventCache {
    events: Arc<DashMap<String, EventRecord>>,
    event_tx: Option<mpsc::UnboundedSender<CacheEvent>>,
}

impl EventCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache that also publishes every notification on `event_tx`.
    pub fn with_events(event_tx: mpsc::UnboundedSender<CacheEvent>) -> Self {
        Self {
            events: Arc::new(DashMap::new()),
            event_tx: Some(event_tx),
        }
    }

    /// Merge one decoded record into the cache and return the notifications
    /// it produced (also sent on the event channel, if any).
    pub fn merge(&self, mut record: EventRecord) -> Vec<CacheEvent> {
        let mut events = Vec::new();

        match self.events.entry(record.id.clone()) {
            Entry::Occupied(mut slot) => {
                let current = slot.get();
                if current.removed {
                    trace!(id = %record.id, "merge ignored, event already removed");
                    return events;
                }

                if record.status == EventStatus::Removed {
                    record.removed = true;
                    events.push(CacheEvent::Removed {
                        id: record.id.clone(),
                    });
                } else {
                    if current.status != record.status {
                        events.push(CacheEvent::StatusChanged {
                            id: record.id.clone(),
                            from: current.status,
                            to: record.status,
                        });
                    }
                    if current.scores != record.scores {
                        events.push(CacheEvent::ScoresChanged {
                            id: record.id.clone(),
                            before: current.scores.clone(),
                            after: record.scores.clone(),
                        });
                    }
                    record.removed = false;
                }

                slot.insert(record);
            }
            Entry::Vacant(slot) => {
                if record.status == EventStatus::Removed {
                    record.removed = true;
                    events.push(CacheEvent::Removed {
                        id: record.id.clone(),
                    });
                } else {
                    record.removed = false;
                    events.push(CacheEvent::Inserted {
                        id: record.id.clone(),
                        status: record.status,
                    });
                }

                slot.insert(record);
            }
        }

        if let Some(tx) = &self.event_tx {
            for event in &events {
                let _ = tx.send(event.clone());
            }
        }

        events
    }

    /// Merge a batch in order, returning every notification produced.
    pub fn merge_all(&self, records: impl IntoIterator<Item = EventRecord>) -> Vec<CacheEvent> {
        records
            .into_iter()
            .flat_map(|record| self.merge(record))
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<EventRecord> {
        self.events.get(id).map(|r| r.clone())
    }

    /// Every cached record, removed ones included.
    pub fn get_all(&self) -> HashMap<String, EventRecord> {
        self.events
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Only records that have not been removed. Independent of later merges.
    pub fn get_active(&self) -> HashMap<String, EventRecord> {
        self.events
            .iter()
            .filter(|entry| entry.value().is_active())
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Counts come from a single pass so they stay consistent while merges
    /// run concurrently.
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        for entry in self.events.iter() {
            stats.total += 1;
            if entry.value().removed {
                stats.removed += 1;
            } else {
                stats.active += 1;
            }
        }
        stats
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&self) {
        self.events.clear();
    }
}
