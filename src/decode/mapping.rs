//! Id → name side table.
//!
//! Canonical wire format is `id:name;id:name;...`. Older upstreams shipped
//! one `id;name` pair per line; that layout is still readable but only when
//! selected explicitly via [`MappingFormat::Lines`].

use super::{Decoded, SkipReason, SkippedEntry};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    #[error("entry and field delimiters must differ, both are {0:?}")]
    DelimiterCollision(char),
}

/// The two separator levels of a mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    entry: char,
    field: char,
}

impl Delimiters {
    pub const CANONICAL: Delimiters = Delimiters {
        entry: ';',
        field: ':',
    };

    pub const LINES: Delimiters = Delimiters {
        entry: '\n',
        field: ';',
    };

    pub fn new(entry: char, field: char) -> Result<Self, FormatError> {
        if entry == field {
            return Err(FormatError::DelimiterCollision(entry));
        }
        Ok(Self { entry, field })
    }

    pub fn entry(&self) -> char {
        self.entry
    }

    pub fn field(&self) -> char {
        self.field
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// Named mapping table layouts, selectable from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingFormat {
    /// `id:name;id:name`
    #[default]
    Canonical,
    /// `id;name\nid;name`
    Lines,
}

impl MappingFormat {
    pub fn delimiters(&self) -> Delimiters {
        match self {
            MappingFormat::Canonical => Delimiters::CANONICAL,
            MappingFormat::Lines => Delimiters::LINES,
        }
    }
}

impl std::fmt::Display for MappingFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappingFormat::Canonical => write!(f, "canonical"),
            MappingFormat::Lines => write!(f, "lines"),
        }
    }
}

/// Lookup table from opaque upstream ids to display names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    names: HashMap<String, String>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw table. Entries with an empty id or name are skipped and
    /// reported; duplicate ids keep the last name seen.
    pub fn parse(raw: &str, delimiters: Delimiters) -> Decoded<MappingTable> {
        let mut decoded = Decoded::new(MappingTable::new());

        for (idx, entry) in raw.split(delimiters.entry()).enumerate() {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }

            let mut parts = entry.split(delimiters.field());
            let id = parts.next().map(str::trim).unwrap_or_default();
            let name = parts.next().map(str::trim).unwrap_or_default();

            if id.is_empty() || name.is_empty() {
                decoded.skipped.push(SkippedEntry {
                    position: idx + 1,
                    reason: SkipReason::MalformedMapping,
                    raw: entry.to_string(),
                });
                continue;
            }

            decoded.value.insert(id, name);
        }

        decoded
    }

    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(id.into(), name.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Name for `id`, or `fallback` when the id is unknown.
    pub fn resolve_or<'a>(&'a self, id: &str, fallback: &'a str) -> &'a str {
        self.get(id).unwrap_or(fallback)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical() {
        let decoded = MappingTable::parse(" id1 : FOOTBALL ; id2:LIVE ;", Delimiters::CANONICAL);
        assert!(decoded.is_clean());
        let table = decoded.value;
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("id1"), Some("FOOTBALL"));
        assert_eq!(table.get("id2"), Some("LIVE"));
        assert_eq!(table.get("id3"), None);
    }

    #[test]
    fn test_parse_lines_variant() {
        let raw = "a1;Barcelona\r\nb2;Real Madrid\n\n";
        let table = MappingTable::parse(raw, MappingFormat::Lines.delimiters()).value;
        assert_eq!(table.get("a1"), Some("Barcelona"));
        assert_eq!(table.get("b2"), Some("Real Madrid"));
    }

    #[test]
    fn test_malformed_entries_are_reported_not_raised() {
        let decoded = MappingTable::parse("id1:ok;:noid;noname:;bare;id2:fine", Delimiters::CANONICAL);
        assert_eq!(decoded.value.len(), 2);
        let positions: Vec<usize> = decoded.skipped.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![2, 3, 4]);
        assert!(decoded
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::MalformedMapping));
        assert_eq!(decoded.skipped[2].raw, "bare");
    }

    #[test]
    fn test_duplicate_id_last_wins() {
        let table = MappingTable::parse("x:first;x:second", Delimiters::CANONICAL).value;
        assert_eq!(table.get("x"), Some("second"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let decoded = MappingTable::parse("", Delimiters::CANONICAL);
        assert!(decoded.value.is_empty());
        assert!(decoded.is_clean());

        let decoded = MappingTable::parse("  \n ", Delimiters::LINES);
        assert!(decoded.value.is_empty());
    }

    #[test]
    fn test_resolve_or_fallback() {
        let table = MappingTable::parse("s1:TENNIS", Delimiters::CANONICAL).value;
        assert_eq!(table.resolve_or("s1", "Unknown Sport"), "TENNIS");
        assert_eq!(table.resolve_or("s9", "Unknown Sport"), "Unknown Sport");
    }

    #[test]
    fn test_delimiter_collision_rejected() {
        assert_eq!(
            Delimiters::new(';', ';'),
            Err(FormatError::DelimiterCollision(';'))
        );
        let d = Delimiters::new('|', '=').unwrap();
        let table = MappingTable::parse("a=Alpha|b=Beta", d).value;
        assert_eq!(table.get("b"), Some("Beta"));
    }
}
