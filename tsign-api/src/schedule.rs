//! Merges per-line-per-station arrival predictions into ordered lists.

use chrono::Utc;
use log::*;
use std::collections::{HashMap, HashSet};
use tsign_mta::client::MtaClient;
use tsign_mta::feeds::{FeedId, LineFeedMap};
use tsign_mta::types::{ArrivalInfo, Direction, DirectionTimes, ScheduleResponse};

use crate::errors::*;

/// Whole minutes from `now_millis` until an arrival at `arrival_secs`,
/// truncated toward negative infinity: a train that left 30 seconds ago
/// reads as -1, not 0.
pub fn relative_minutes(arrival_secs: i64, now_millis: i64) -> i64 {
    (arrival_secs * 1000 - now_millis).div_euclid(60_000)
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Fetches and merges schedules on behalf of the request handlers.
///
/// Failure policy: the first upstream transport error aborts the whole
/// request, with no partial results. Absence of data never does; a
/// station/direction/line combination with nothing scheduled is an empty
/// list, which is a perfectly normal steady state.
pub struct ScheduleAggregator<'a> {
    mta: &'a MtaClient,
    feeds: &'a LineFeedMap,
}

impl<'a> ScheduleAggregator<'a> {
    pub fn new(mta: &'a MtaClient, feeds: &'a LineFeedMap) -> Self {
        Self { mta, feeds }
    }

    /// The upstream schedule for one station, all directions, exactly as
    /// the provider returns it (no relative-time tagging).
    pub fn station_schedule(&self, station: &str) -> SignResult<DirectionTimes> {
        let feed = match self.feeds.resolve_prefix(station) {
            Some(f) => f,
            None => return Ok(DirectionTimes::default()),
        };
        let resp = self.fetch(station, feed)?;
        let ret = resp.schedule
            .and_then(|mut m| m.remove(station))
            .unwrap_or_default();
        Ok(ret)
    }

    /// Arrivals at `station` in `dir`, tagged with relative time.
    /// Upstream order is preserved (the provider pre-sorts per station).
    pub fn station_direction(&self, station: &str, dir: Direction) -> SignResult<Vec<ArrivalInfo>> {
        let feed = match self.feeds.resolve_prefix(station) {
            Some(f) => f,
            None => return Ok(vec![]),
        };
        let resp = self.fetch(station, feed)?;
        let now = now_millis();
        let mut ret = resp.arrivals(station, dir).to_vec();
        for arr in &mut ret {
            arr.relative_time = Some(relative_minutes(arr.arrival_time, now));
        }
        Ok(ret)
    }

    /// Combined schedule across several stations and lines, one direction,
    /// sorted ascending by raw arrival time.
    ///
    /// Lines the feed table doesn't know are dropped up front; they can
    /// never produce arrivals, and are not worth an error.
    pub fn combined(&self, stations: &[&str], lines: &[&str], dir: Direction) -> SignResult<Vec<ArrivalInfo>> {
        let feeds = resolve_feed_set(self.feeds, lines);
        let wanted: HashSet<&str> = lines.iter().copied().collect();
        let now = now_millis();
        let mut combined = vec![];
        for station in stations {
            for feed in &feeds {
                let resp = self.fetch(station, feed)?;
                collect_matching(&resp, station, dir, &wanted, now, &mut combined);
            }
        }
        sort_by_arrival(&mut combined);
        Ok(combined)
    }

    fn fetch(&self, station: &str, feed: &FeedId) -> SignResult<ScheduleResponse> {
        self.mta.schedule(station, feed).map_err(|e| {
            warn!("schedule fetch failed (station {}, feed {}): {}", station, feed, e);
            SignError::from(e)
        })
    }
}

/// The deduplicated set of feeds needed to cover `lines`. Unknown line
/// codes resolve to nothing and drop out here.
fn resolve_feed_set<'f>(feeds: &'f LineFeedMap, lines: &[&str]) -> HashSet<&'f FeedId> {
    lines.iter()
        .filter_map(|l| feeds.resolve(l))
        .collect()
}

/// Appends the arrivals in `resp` under `station`+`dir` whose route is in
/// `wanted`, tagged with relative time.
fn collect_matching(resp: &ScheduleResponse, station: &str, dir: Direction, wanted: &HashSet<&str>, now_millis: i64, out: &mut Vec<ArrivalInfo>) {
    for arr in resp.arrivals(station, dir) {
        if !wanted.contains(arr.route_id.as_str()) {
            continue;
        }
        let mut arr = arr.clone();
        arr.relative_time = Some(relative_minutes(arr.arrival_time, now_millis));
        out.push(arr);
    }
}

/// Sorts by the upstream timestamp, not the derived relative time (which
/// is monotonic with it anyway).
fn sort_by_arrival(arrivals: &mut Vec<ArrivalInfo>) {
    arrivals.sort_by_key(|a| a.arrival_time);
}
