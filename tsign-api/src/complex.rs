//! Groups raw stop records into station complexes.
//!
//! The provider historically issued a separate station record per line for
//! what is physically one station, so records within roughly 100m of each
//! other are presented as one logical "complex" serving the union of their
//! lines.

use serde_derive::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use tsign_mta::feeds::LineFeedMap;
use tsign_mta::types::{LocationType, StopRecord};

/// Coordinate tolerance (decimal degrees, ~100m) under which two station
/// records count as co-located. Strict less-than, on both axes.
///
/// Known precision limitation: two genuinely distinct stations closer than
/// this merge, and noisy coordinates within one complex can split it. Both
/// are accepted approximations; do not tune this constant to "fix" them.
pub const COORD_TOLERANCE: f64 = 0.001;

/// A set of co-located stop records presented as one logical station.
#[derive(Serialize, Debug, Clone)]
pub struct StationComplex {
    pub name: String,
    pub stop_ids: Vec<String>,
    pub lines: Vec<String>,
    pub lat: f64,
    pub lon: f64,
}

/// Groups `stops` into station complexes.
///
/// Seeds are the records with `location_type == Station`, visited in
/// stop-id order: the proximity relation is not transitive, so a fixed
/// seed order is what makes the grouping reproducible. Each station stop
/// id lands in exactly one complex; a station near nothing else becomes a
/// singleton complex of its own.
///
/// The proximity scan is O(n²) over the station records. Fine at
/// transit-system scale (hundreds of stations, recomputed per request);
/// a coarse spatial grid would be the fix if that ever changes.
pub fn resolve_complexes(stops: &HashMap<String, StopRecord>, feeds: &LineFeedMap) -> Vec<StationComplex> {
    let mut stations: Vec<&StopRecord> = stops.values()
        .filter(|s| s.location_type == LocationType::Station)
        .collect();
    stations.sort_by(|a, b| a.stop_id.cmp(&b.stop_id));

    // Platform records, indexed by their parent station.
    let mut children: HashMap<&str, Vec<&StopRecord>> = HashMap::new();
    for stop in stops.values() {
        if let Some(ref parent) = stop.parent_station {
            children.entry(parent.as_str()).or_insert_with(Vec::new).push(stop);
        }
    }

    let mut processed: HashSet<&str> = HashSet::new();
    let mut complexes = vec![];

    for seed in stations.iter().copied() {
        if processed.contains(seed.stop_id.as_str()) {
            continue;
        }
        let similar: Vec<&StopRecord> = stations.iter().copied()
            .filter(|s| {
                !processed.contains(s.stop_id.as_str())
                    && (s.stop_lat - seed.stop_lat).abs() < COORD_TOLERANCE
                    && (s.stop_lon - seed.stop_lon).abs() < COORD_TOLERANCE
            })
            .collect();

        let mut stop_ids = vec![];
        let mut lines = BTreeSet::new();
        for member in similar {
            processed.insert(member.stop_id.as_str());
            stop_ids.push(member.stop_id.clone());
            if let Some(line) = line_code(&member.stop_id, feeds) {
                lines.insert(line);
            }
            // one level down: the member's platforms carry line prefixes
            // of their own
            if let Some(kids) = children.get(member.stop_id.as_str()) {
                for child in kids {
                    if let Some(line) = line_code(&child.stop_id, feeds) {
                        lines.insert(line);
                    }
                }
            }
        }
        stop_ids.sort();

        complexes.push(StationComplex {
            name: seed.stop_name.clone(),
            stop_ids,
            lines: lines.into_iter().collect(),
            lat: seed.stop_lat,
            lon: seed.stop_lon,
        });
    }
    complexes
}

/// The line-family code of a stop id (its first character), provided the
/// feed table knows it. Unmapped prefixes yield nothing.
fn line_code(stop_id: &str, feeds: &LineFeedMap) -> Option<String> {
    let prefix = stop_id.get(..1)?;
    feeds.resolve(prefix)?;
    Some(prefix.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn stop(id: &str, name: &str, lat: f64, lon: f64, lt: LocationType, parent: Option<&str>) -> (String, StopRecord) {
        (id.to_string(), StopRecord {
            stop_id: id.to_string(),
            stop_name: name.to_string(),
            stop_lat: lat,
            stop_lon: lon,
            location_type: lt,
            parent_station: parent.map(|p| p.to_string()),
        })
    }

    fn feeds() -> LineFeedMap {
        serde_json::from_str(r#"{"A": 26, "R": 16, "L": 2, "1": 1}"#).unwrap()
    }

    #[test]
    fn co_located_stations_merge_into_one_complex() {
        let stops: HashMap<_, _> = vec![
            stop("A31", "14 St", 40.740893, -73.999704, LocationType::Station, None),
            stop("L02", "6 Av", 40.740400, -74.000100, LocationType::Station, None),
            stop("R23", "Whitehall St", 40.703087, -74.012994, LocationType::Station, None),
        ].into_iter().collect();
        let ret = resolve_complexes(&stops, &feeds());
        assert_eq!(ret.len(), 2);
        let merged = ret.iter().find(|c| c.stop_ids.len() == 2).unwrap();
        assert_eq!(merged.stop_ids, vec!["A31", "L02"]);
        assert_eq!(merged.lines, vec!["A", "L"]);
        // seed is the lowest stop id, and donates name and coordinates
        assert_eq!(merged.name, "14 St");
        assert!((merged.lat - 40.740893).abs() < 1e-9);
    }

    #[test]
    fn grouping_partitions_the_station_set() {
        let stops: HashMap<_, _> = vec![
            stop("A31", "14 St", 40.7408, -73.9997, LocationType::Station, None),
            stop("L02", "6 Av", 40.7404, -74.0001, LocationType::Station, None),
            stop("L03", "Union Sq", 40.7347, -73.9909, LocationType::Station, None),
            stop("R20", "Union Sq", 40.7356, -73.9905, LocationType::Station, None),
            stop("R23", "Whitehall St", 40.7030, -74.0129, LocationType::Station, None),
            // platforms must not appear in any complex
            stop("A31N", "14 St", 40.7408, -73.9997, LocationType::Platform, Some("A31")),
            stop("R20S", "Union Sq", 40.7356, -73.9905, LocationType::Platform, Some("R20")),
        ].into_iter().collect();
        let ret = resolve_complexes(&stops, &feeds());
        let mut seen = HashSet::new();
        for complex in &ret {
            for id in &complex.stop_ids {
                assert!(seen.insert(id.clone()), "{} appears in two complexes", id);
            }
        }
        let stations: HashSet<_> = stops.values()
            .filter(|s| s.location_type == LocationType::Station)
            .map(|s| s.stop_id.clone())
            .collect();
        assert_eq!(seen, stations);
    }

    #[test]
    fn tolerance_boundary_is_strict() {
        // exactly the tolerance apart: must NOT merge. Coordinates are
        // chosen so the delta is bit-exact against the constant.
        let stops: HashMap<_, _> = vec![
            stop("A01", "Here", 0.0, 0.0, LocationType::Station, None),
            stop("R01", "There", COORD_TOLERANCE, 0.0, LocationType::Station, None),
        ].into_iter().collect();
        let ret = resolve_complexes(&stops, &feeds());
        assert_eq!(ret.len(), 2);

        // 0.0009 on both axes: must merge
        let stops: HashMap<_, _> = vec![
            stop("A01", "Here", 0.0, 0.0, LocationType::Station, None),
            stop("R01", "There", 0.0009, 0.0009, LocationType::Station, None),
        ].into_iter().collect();
        let ret = resolve_complexes(&stops, &feeds());
        assert_eq!(ret.len(), 1);
        assert_eq!(ret[0].stop_ids, vec!["A01", "R01"]);
    }

    #[test]
    fn isolated_station_becomes_singleton_complex() {
        let stops: HashMap<_, _> = vec![
            stop("A65", "Far Rockaway", 40.6050, -73.7554, LocationType::Station, None),
        ].into_iter().collect();
        let ret = resolve_complexes(&stops, &feeds());
        assert_eq!(ret.len(), 1);
        assert_eq!(ret[0].stop_ids, vec!["A65"]);
        assert_eq!(ret[0].lines, vec!["A"]);
    }

    #[test]
    fn platform_children_contribute_line_codes() {
        // the station record has an unmapped prefix, but its platform
        // carries a known line family
        let stops: HashMap<_, _> = vec![
            stop("X22", "Some Jct", 40.7000, -74.0000, LocationType::Station, None),
            stop("119N", "Some Jct", 40.7000, -74.0000, LocationType::Platform, Some("X22")),
        ].into_iter().collect();
        let ret = resolve_complexes(&stops, &feeds());
        assert_eq!(ret.len(), 1);
        assert_eq!(ret[0].lines, vec!["1"]);
    }

    #[test]
    fn unmapped_prefixes_collect_no_lines() {
        let stops: HashMap<_, _> = vec![
            stop("X22", "Some Jct", 40.7000, -74.0000, LocationType::Station, None),
        ].into_iter().collect();
        let ret = resolve_complexes(&stops, &feeds());
        assert_eq!(ret.len(), 1);
        assert!(ret[0].lines.is_empty());
    }
}
