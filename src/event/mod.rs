//! Decoded event records as served to readers.
//!
//! JSON layout mirrors the upstream client contract:
//!
//! ```text
//! {
//!   "id": "...", "status": "LIVE", "startTime": "2023-11-14T22:13:20Z",
//!   "sport": "FOOTBALL", "competition": "...",
//!   "scores": { "CURRENT": { "type": "CURRENT", "home": "1", "away": "0" } },
//!   "competitors": { "HOME": { "type": "HOME", "name": "..." }, "AWAY": { ... } },
//!   "removed": false
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const UNKNOWN_SPORT: &str = "Unknown Sport";
pub const UNKNOWN_COMPETITION: &str = "Unknown Competition";
pub const UNKNOWN_HOME: &str = "Unknown Home";
pub const UNKNOWN_AWAY: &str = "Unknown Away";

/// Lifecycle status of an event. Closed set; anything unrecognised is `Pre`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Pre,
    Live,
    Removed,
}

impl EventStatus {
    /// Match a resolved status name against the three literals.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "PRE" => Some(EventStatus::Pre),
            "LIVE" => Some(EventStatus::Live),
            "REMOVED" => Some(EventStatus::Removed),
            _ => None,
        }
    }

    /// Resolve an optional mapped name, defaulting to `Pre`.
    pub fn resolve(label: Option<&str>) -> Self {
        label.and_then(Self::from_label).unwrap_or_default()
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Pre => write!(f, "PRE"),
            EventStatus::Live => write!(f, "LIVE"),
            EventStatus::Removed => write!(f, "REMOVED"),
        }
    }
}

/// One score line, e.g. a period result. Values are passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    #[serde(rename = "type")]
    pub kind: String,
    pub home: String,
    pub away: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Home,
    Away,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Home => write!(f, "HOME"),
            Side::Away => write!(f, "AWAY"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    #[serde(rename = "type")]
    pub side: Side,
    pub name: String,
}

/// Exactly one home and one away competitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitors {
    #[serde(rename = "HOME")]
    pub home: Competitor,
    #[serde(rename = "AWAY")]
    pub away: Competitor,
}

impl Competitors {
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            home: Competitor {
                side: Side::Home,
                name: home.into(),
            },
            away: Competitor {
                side: Side::Away,
                name: away.into(),
            },
        }
    }
}

/// Score lines keyed by their resolved type label.
pub type Scores = BTreeMap<String, Score>;

/// The canonical decoded and cached unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: String,
    pub status: EventStatus,
    pub start_time: DateTime<Utc>,
    pub sport: String,
    pub competition: String,
    pub scores: Scores,
    pub competitors: Competitors,
    /// Set by the cache once a `REMOVED` status has been merged. Terminal.
    #[serde(default)]
    pub removed: bool,
}

impl EventRecord {
    pub fn is_active(&self) -> bool {
        !self.removed
    }
}
