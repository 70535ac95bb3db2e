//! Integration test: decode → merge → query through the public library API.

use scorefeed::{decode_snapshot, EventCache, EventStatus, MappingFormat};

const EVENT_ID: &str = "78784a2e-3bbb-45d3-aec1-a53b3ca0b6f0";
const SPORT_ID: &str = "a1ab04e9-9d28-4e36-a4c4-76ba49fd4457";
const COMPETITION_ID: &str = "65b99ec6-3c2b-4fd2-8630-8c743f38f67a";
const HOME_ID: &str = "62b202fb-9cec-45ce-932a-f0d40ab5d8ca";
const AWAY_ID: &str = "387c26c1-dc55-47c4-9599-3734cd8ae40e";
const LIVE_ID: &str = "bf382528-4fa9-4b06-b531-e090e3161b0c";
const REMOVED_ID: &str = "0c4a1d2e-7d1b-4f39-9f0e-2a6f5b8e1c33";
const CURRENT_ID: &str = "d737f2a8-17e1-4ecb-a419-405bb9bf97e4";
const PERIOD_1_ID: &str = "18e716a4-d65c-495e-a0fc-a3b7efb822f5";
const PERIOD_2_ID: &str = "a8bfb268-781a-48d8-83aa-9b3a7b5573c6";

fn mappings() -> String {
    [
        format!("{}:LIVE", LIVE_ID),
        format!("{}:REMOVED", REMOVED_ID),
        format!("{}:FOOTBALL", SPORT_ID),
        format!("{}:UEFA Champions League", COMPETITION_ID),
        format!("{}:Barcelona", HOME_ID),
        format!("{}:Real Madrid", AWAY_ID),
        format!("{}:CURRENT", CURRENT_ID),
        format!("{}:PERIOD_1", PERIOD_1_ID),
        format!("{}:PERIOD_2", PERIOD_2_ID),
    ]
    .join(";")
}

fn feed_line(event_id: &str, status_id: &str, scores: &str) -> String {
    format!(
        "{},{},{},1749762778896,{},{},{},{}",
        event_id, SPORT_ID, COMPETITION_ID, HOME_ID, AWAY_ID, status_id, scores
    )
}

#[test]
fn test_parse_and_store() {
    let scores = format!("{}@12:13|{}@4:5|{}@8:8", CURRENT_ID, PERIOD_1_ID, PERIOD_2_ID);
    let feed = feed_line(EVENT_ID, LIVE_ID, &scores);

    let decoded = decode_snapshot(&feed, &mappings(), MappingFormat::Canonical);
    assert!(decoded.is_clean());
    assert_eq!(decoded.value.len(), 1);

    let cache = EventCache::new();
    cache.merge_all(decoded.value.clone());
    assert_eq!(cache.get_active().len(), decoded.value.len());

    let one = &decoded.value[0];
    assert_eq!(one.sport, "FOOTBALL");
    assert_eq!(one.competition, "UEFA Champions League");
    assert_eq!(one.status, EventStatus::Live);
    assert_eq!(one.competitors.home.name, "Barcelona");
    assert_eq!(one.competitors.away.name, "Real Madrid");
    assert_eq!(one.start_time.timestamp_millis(), 1_749_762_778_896);
    assert_eq!(one.scores["CURRENT"].home, "12");
    assert_eq!(one.scores["PERIOD_2"].away, "8");
}

#[test]
fn test_bulk_removal_and_resurrection_guard() {
    let cache = EventCache::new();

    let feed: Vec<String> = (0..500)
        .map(|i| feed_line(&format!("ev-{}", i), LIVE_ID, &format!("{}@0:0", CURRENT_ID)))
        .collect();
    let decoded = decode_snapshot(&feed.join("\n"), &mappings(), MappingFormat::Canonical);
    assert_eq!(decoded.value.len(), 500);
    cache.merge_all(decoded.value);

    let removal: Vec<String> = (0..50)
        .map(|i| feed_line(&format!("ev-{}", i), REMOVED_ID, ""))
        .collect();
    let decoded = decode_snapshot(&removal.join("\n"), &mappings(), MappingFormat::Canonical);
    let events = cache.merge_all(decoded.value);
    assert_eq!(events.len(), 50);

    let stats = cache.stats();
    assert_eq!(stats.total, 500);
    assert_eq!(stats.active, 450);
    assert_eq!(stats.removed, 50);

    // upstream flips the first one back to LIVE with a new score
    let resurrect = feed_line("ev-0", LIVE_ID, &format!("{}@1:0", CURRENT_ID));
    let decoded = decode_snapshot(&resurrect, &mappings(), MappingFormat::Canonical);
    assert!(cache.merge_all(decoded.value).is_empty());

    assert!(!cache.get_active().contains_key("ev-0"));
    let frozen = cache.get("ev-0").unwrap();
    assert_eq!(frozen.status, EventStatus::Removed);
    assert!(frozen.scores.is_empty());
}

#[test]
fn test_lines_mapping_format() {
    let mappings = format!("{};FOOTBALL\n{};LIVE\n", SPORT_ID, LIVE_ID);
    let feed = feed_line(EVENT_ID, LIVE_ID, "");

    let decoded = decode_snapshot(&feed, &mappings, MappingFormat::Lines);
    let event = &decoded.value[0];
    assert_eq!(event.sport, "FOOTBALL");
    assert_eq!(event.status, EventStatus::Live);
    assert_eq!(event.competition, "Unknown Competition");
}
