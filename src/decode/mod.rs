//! Raw feed decoding.
//!
//! Two flat text blobs come from upstream: the event feed and an id→name
//! mapping table. Decoding is permissive: malformed fragments are dropped
//! and reported as [`SkippedEntry`] diagnostics instead of failing the
//! batch, so one bad line never costs us the rest of the snapshot.

pub mod feed;
pub mod mapping;

pub use feed::{decode_feed, decode_scores, decode_snapshot};
pub use mapping::{Delimiters, FormatError, MappingFormat, MappingTable};

/// Why a fragment of input was dropped or defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Mapping entry with an empty id or empty name.
    MalformedMapping,
    /// Score entry missing `@`, a type id, or one side of `home:away`.
    MalformedScore,
    /// Feed line with fewer positional fields than required; the missing
    /// fields were decoded as empty strings.
    MissingFields { found: usize },
    /// Start time absent or not a valid epoch-millis integer; defaulted to
    /// the Unix epoch.
    InvalidStartTime,
}

impl SkipReason {
    pub fn name(&self) -> &'static str {
        match self {
            SkipReason::MalformedMapping => "MALFORMED_MAPPING",
            SkipReason::MalformedScore => "MALFORMED_SCORE",
            SkipReason::MissingFields { .. } => "MISSING_FIELDS",
            SkipReason::InvalidStartTime => "INVALID_START_TIME",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingFields { found } => {
                write!(f, "{} (found {} of {})", self.name(), found, feed::REQUIRED_FIELDS)
            }
            other => write!(f, "{}", other.name()),
        }
    }
}

/// A dropped or defaulted input fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// 1-based line number (feed) or entry number (mapping table).
    pub position: usize,
    pub reason: SkipReason,
    pub raw: String,
}

/// Best-effort decode result plus whatever had to be skipped to get it.
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    pub value: T,
    pub skipped: Vec<SkippedEntry>,
}

impl<T> Decoded<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            skipped: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}
