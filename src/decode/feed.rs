//! Event feed decoder.
//!
//! One event per line, comma-separated, fixed positional order:
//!
//! ```text
//! eventId,sportId,competitionId,startTimeEpochMs,homeTeamId,awayTeamId,statusId,scores
//! ```
//!
//! `scores` is everything after the seventh comma, split on `|` into
//! `scoreTypeId@home:away` entries. Field order is the only validation there
//! is: a reordered upstream decodes into nonsense without complaint.

use super::mapping::{MappingFormat, MappingTable};
use super::{Decoded, SkipReason, SkippedEntry};
use crate::event::{
    Competitors, EventRecord, EventStatus, Score, Scores, UNKNOWN_AWAY, UNKNOWN_COMPETITION,
    UNKNOWN_HOME, UNKNOWN_SPORT,
};
use chrono::{DateTime, TimeZone, Utc};

/// Positional fields before the score blob.
pub const REQUIRED_FIELDS: usize = 7;

const FIELD_SEPARATOR: char = ',';
const SCORE_SEPARATOR: char = '|';
const SCORE_TYPE_SEPARATOR: char = '@';
const SCORE_SIDE_SEPARATOR: char = ':';

/// Decode both raw blobs of one upstream snapshot.
pub fn decode_snapshot(
    raw_events: &str,
    raw_mappings: &str,
    format: MappingFormat,
) -> Decoded<Vec<EventRecord>> {
    let mappings = MappingTable::parse(raw_mappings, format.delimiters());
    let mut events = decode_feed(raw_events, &mappings.value);

    let mut skipped = mappings.skipped;
    skipped.append(&mut events.skipped);
    events.skipped = skipped;
    events
}

/// Decode the event feed against an already-built mapping table. Returns one
/// record per non-blank line, in input order.
pub fn decode_feed(raw: &str, mappings: &MappingTable) -> Decoded<Vec<EventRecord>> {
    let mut decoded = Decoded::new(Vec::new());

    for (idx, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = decode_line(idx + 1, line, mappings, &mut decoded.skipped);
        decoded.value.push(record);
    }

    decoded
}

fn decode_line(
    line_no: usize,
    line: &str,
    mappings: &MappingTable,
    skipped: &mut Vec<SkippedEntry>,
) -> EventRecord {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();

    if fields.len() < REQUIRED_FIELDS {
        skipped.push(SkippedEntry {
            position: line_no,
            reason: SkipReason::MissingFields {
                found: fields.len(),
            },
            raw: line.to_string(),
        });
    }

    let field = |i: usize| fields.get(i).copied().map(str::trim).unwrap_or_default();

    let start_time = match parse_start_time(field(3)) {
        Some(ts) => ts,
        None => {
            skipped.push(SkippedEntry {
                position: line_no,
                reason: SkipReason::InvalidStartTime,
                raw: field(3).to_string(),
            });
            DateTime::<Utc>::UNIX_EPOCH
        }
    };

    let score_blob = if fields.len() > REQUIRED_FIELDS {
        fields[REQUIRED_FIELDS..].join(",")
    } else {
        String::new()
    };

    EventRecord {
        id: field(0).to_string(),
        status: EventStatus::resolve(mappings.get(field(6))),
        start_time,
        sport: mappings.resolve_or(field(1), UNKNOWN_SPORT).to_string(),
        competition: mappings
            .resolve_or(field(2), UNKNOWN_COMPETITION)
            .to_string(),
        scores: decode_scores(line_no, &score_blob, mappings, skipped),
        competitors: Competitors::new(
            mappings.resolve_or(field(4), UNKNOWN_HOME),
            mappings.resolve_or(field(5), UNKNOWN_AWAY),
        ),
        removed: false,
    }
}

fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    let millis = raw.parse::<i64>().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

/// Decode a `type@home:away|...` blob. Malformed entries are dropped and
/// recorded against `line_no`; empty segments are ignored outright.
pub fn decode_scores(
    line_no: usize,
    blob: &str,
    mappings: &MappingTable,
    skipped: &mut Vec<SkippedEntry>,
) -> Scores {
    let mut scores = Scores::new();

    for entry in blob.split(SCORE_SEPARATOR) {
        if entry.trim().is_empty() {
            continue;
        }

        match parse_score_entry(entry) {
            Some((type_id, home, away)) => {
                let label = mappings.resolve_or(type_id, type_id).to_string();
                scores.insert(
                    label.clone(),
                    Score {
                        kind: label,
                        home: home.to_string(),
                        away: away.to_string(),
                    },
                );
            }
            None => skipped.push(SkippedEntry {
                position: line_no,
                reason: SkipReason::MalformedScore,
                raw: entry.to_string(),
            }),
        }
    }

    scores
}

/// Parts are trimmed the same way mapping entries are, so `" t2@3:3"` still
/// resolves `t2`.
fn parse_score_entry(entry: &str) -> Option<(&str, &str, &str)> {
    let mut halves = entry.split(SCORE_TYPE_SEPARATOR).map(str::trim);
    let type_id = halves.next().filter(|t| !t.is_empty())?;
    let result = halves.next()?;

    let mut sides = result.split(SCORE_SIDE_SEPARATOR).map(str::trim);
    let home = sides.next().filter(|h| !h.is_empty())?;
    let away = sides.next().filter(|a| !a.is_empty())?;

    Some((type_id, home, away))
}
