use serde_json;
use crate::types::*;
use crate::feeds::LineFeedMap;

fn feed_map(json: &str) -> LineFeedMap {
    serde_json::from_str(json).unwrap()
}

#[test]
fn parse_stop_with_string_fields() {
    // older exports stringify everything
    let data = r#"{
        "stop_id": "R14",
        "stop_name": "Union Sq - 14 St",
        "stop_lat": "40.735736",
        "stop_lon": "-73.990568",
        "location_type": "1",
        "parent_station": ""
    }"#;
    let stop: StopRecord = serde_json::from_str(data).unwrap();
    assert_eq!(stop.stop_id, "R14");
    assert_eq!(stop.location_type, LocationType::Station);
    assert!((stop.stop_lat - 40.735736).abs() < 1e-9);
    assert_eq!(stop.parent_station, None);
}

#[test]
fn parse_stop_with_numeric_fields() {
    let data = r#"{
        "stop_id": "R14N",
        "stop_name": "Union Sq - 14 St",
        "stop_lat": 40.735736,
        "stop_lon": -73.990568,
        "location_type": 0,
        "parent_station": "R14"
    }"#;
    let stop: StopRecord = serde_json::from_str(data).unwrap();
    assert_eq!(stop.location_type, LocationType::Platform);
    assert_eq!(stop.parent_station.as_deref(), Some("R14"));
}

#[test]
fn parse_stop_without_location_type() {
    let data = r#"{
        "stop_id": "R14N",
        "stop_name": "Union Sq - 14 St",
        "stop_lat": "40.735736",
        "stop_lon": "-73.990568"
    }"#;
    let stop: StopRecord = serde_json::from_str(data).unwrap();
    assert_eq!(stop.location_type, LocationType::Platform);
    assert_eq!(stop.parent_station, None);
}

#[test]
fn status_entry_passes_unknown_fields_through() {
    let data = r#"{
        "name": "123456",
        "status": "GOOD SERVICE",
        "text": "",
        "Date": "",
        "Time": ""
    }"#;
    let entry: StatusEntry = serde_json::from_str(data).unwrap();
    assert_eq!(entry.name, "123456");
    assert_eq!(entry.extra["status"], "GOOD SERVICE");
    let out = serde_json::to_value(&entry).unwrap();
    assert_eq!(out["Date"], "");
}

#[test]
fn parse_schedule_envelope() {
    let data = r#"{
        "schedule": {
            "R14": {
                "N": [
                    {"routeId": "N", "tripId": "0123", "arrivalTime": 1700000000, "departureTime": 1700000030}
                ],
                "S": []
            }
        }
    }"#;
    let resp: ScheduleResponse = serde_json::from_str(data).unwrap();
    let north = resp.arrivals("R14", Direction::North);
    assert_eq!(north.len(), 1);
    assert_eq!(north[0].route_id, "N");
    assert_eq!(north[0].relative_time, None);
    assert!(resp.arrivals("R14", Direction::South).is_empty());
    assert!(resp.arrivals("R20", Direction::North).is_empty());
}

#[test]
fn schedule_envelope_without_schedule_key_is_empty() {
    let resp: ScheduleResponse = serde_json::from_str(r#"{"updated": 1700000000}"#).unwrap();
    assert!(resp.schedule.is_none());
    assert!(resp.arrivals("R14", Direction::North).is_empty());
}

#[test]
fn arrival_serializes_camel_case() {
    let data = r#"{"routeId": "Q", "arrivalTime": 1700000000, "stopId": "R14N"}"#;
    let arr: ArrivalInfo = serde_json::from_str(data).unwrap();
    // unknown upstream fields must round-trip
    assert_eq!(arr.extra["stopId"], "R14N");
    let mut arr = arr;
    arr.relative_time = Some(-1);
    let out = serde_json::to_value(&arr).unwrap();
    assert_eq!(out["routeId"], "Q");
    assert_eq!(out["arrivalTime"], 1700000000i64);
    assert_eq!(out["relativeTime"], -1);
    assert_eq!(out["stopId"], "R14N");
    assert!(out.get("tripId").is_none());
}

#[test]
fn feed_resolution_is_total_and_pure() {
    let feeds = feed_map(r#"{"A": 26, "7": 51, "L": "l-feed"}"#);
    for _ in 0..3 {
        assert_eq!(feeds.resolve("A"), Some(&crate::feeds::FeedId::Num(26)));
        assert_eq!(feeds.resolve("L"), Some(&crate::feeds::FeedId::Name("l-feed".into())));
        assert_eq!(feeds.resolve("ZZ"), None);
        assert_eq!(feeds.resolve(""), None);
    }
    assert_eq!(feeds.len(), 3);
}

#[test]
fn feed_resolution_by_stop_id_prefix() {
    let feeds = feed_map(r#"{"A": 26, "7": 51}"#);
    assert!(feeds.resolve_prefix("A02N").is_some());
    assert!(feeds.resolve_prefix("726S").is_some());
    assert!(feeds.resolve_prefix("X05").is_none());
    assert!(feeds.resolve_prefix("").is_none());
}

#[test]
fn direction_parsing() {
    assert_eq!("N".parse::<Direction>().ok(), Some(Direction::North));
    assert_eq!("S".parse::<Direction>().ok(), Some(Direction::South));
    assert!("E".parse::<Direction>().is_err());
    assert!("n".parse::<Direction>().is_err());
    assert!("NS".parse::<Direction>().is_err());
    assert!("".parse::<Direction>().is_err());
    assert_eq!(Direction::North.to_string(), "N");
}
