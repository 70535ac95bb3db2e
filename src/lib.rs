//! Live sports event feed: decode the upstream text snapshot, reconcile it
//! into an in-memory cache, and serve the cache over HTTP.
//!
//! Re-exports the modules the `scorefeed` binary and integration tests use.

pub mod api;
pub mod cache;
pub mod config;
pub mod crawler;
pub mod decode;
pub mod event;
pub mod feed;

pub use cache::{CacheEvent, CacheStats, EventCache};
pub use decode::{decode_feed, decode_snapshot, Decoded, MappingFormat, MappingTable};
pub use event::{Competitor, Competitors, EventRecord, EventStatus, Score, Scores, Side};
