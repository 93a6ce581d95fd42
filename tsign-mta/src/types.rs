//! Wire types for the provider's JSON API.

use serde_derive::{Serialize, Deserialize};
use failure_derive::Fail;
use std::collections::HashMap;
use std::str::FromStr;
use std::fmt;

use crate::fns;

/// What kind of physical thing a stop record describes.
///
/// `Station` records are the grouping seeds for station complexes;
/// `Platform` records point back at their station via `parent_station`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationType {
    Platform,
    Station,
    Other(u8)
}

impl LocationType {
    pub fn code(self) -> u8 {
        match self {
            LocationType::Platform => 0,
            LocationType::Station => 1,
            LocationType::Other(n) => n
        }
    }
}

impl From<u8> for LocationType {
    fn from(code: u8) -> LocationType {
        match code {
            0 => LocationType::Platform,
            1 => LocationType::Station,
            n => LocationType::Other(n)
        }
    }
}

impl Default for LocationType {
    fn default() -> LocationType {
        LocationType::Platform
    }
}

/// A raw stop record from the provider's stops dump.
///
/// The first character of `stop_id` identifies the line family the
/// record was originally issued for.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StopRecord {
    pub stop_id: String,
    pub stop_name: String,
    #[serde(deserialize_with = "fns::de_coord")]
    pub stop_lat: f64,
    #[serde(deserialize_with = "fns::de_coord")]
    pub stop_lon: f64,
    #[serde(deserialize_with = "fns::de_location_type",
            serialize_with = "fns::ser_location_type",
            default)]
    pub location_type: LocationType,
    /// Back-reference to the owning `Station` record, present on platforms.
    #[serde(deserialize_with = "fns::de_nonempty_opt", default)]
    pub parent_station: Option<String>,
}

/// One service-status entry.
///
/// Only `name` is ever interpreted (for substring search); the rest of
/// the entry is passed through to the client untouched.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StatusEntry {
    pub name: String,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// One predicted arrival at a station, as the upstream feed reports it.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalInfo {
    /// Line code of the arriving train.
    pub route_id: String,
    /// Predicted arrival, in epoch seconds.
    pub arrival_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<i64>,
    /// Whole minutes until arrival, negative once the train has left.
    /// Computed at response time; never present in upstream data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_time: Option<i64>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Arrival lists for one station, keyed by direction of travel.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DirectionTimes {
    #[serde(rename = "N", default)]
    pub north: Vec<ArrivalInfo>,
    #[serde(rename = "S", default)]
    pub south: Vec<ArrivalInfo>,
}

impl DirectionTimes {
    pub fn direction(&self, dir: Direction) -> &[ArrivalInfo] {
        match dir {
            Direction::North => &self.north,
            Direction::South => &self.south
        }
    }
}

/// Envelope returned by the provider's schedule endpoint.
///
/// A missing `schedule` key means the provider had nothing for the
/// request, which is an empty result rather than a failure; transport
/// failures never get this far.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ScheduleResponse {
    pub schedule: Option<HashMap<String, DirectionTimes>>,
}

impl ScheduleResponse {
    /// Arrivals for one station and direction. Empty when the station or
    /// the direction is absent from the payload.
    pub fn arrivals(&self, station: &str, dir: Direction) -> &[ArrivalInfo] {
        self.schedule.as_ref()
            .and_then(|m| m.get(station))
            .map(|d| d.direction(dir))
            .unwrap_or(&[])
    }
}

/// Error returned when parsing a direction value other than `N` or `S`.
#[derive(Fail, Debug)]
#[fail(display = "direction must be N or S")]
pub struct InvalidDirection;

/// Direction of travel at a station.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::South => "S"
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Direction {
    type Err = InvalidDirection;
    fn from_str(s: &str) -> Result<Self, InvalidDirection> {
        match s {
            "N" => Ok(Direction::North),
            "S" => Ok(Direction::South),
            _ => Err(InvalidDirection)
        }
    }
}
