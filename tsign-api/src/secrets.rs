//! Renders the `secrets.py` artifact the LED-sign firmware imports.
//!
//! The board reads its wifi credentials and display selection from this
//! file at boot, so the layout below is kept byte-for-byte stable.

use rouille::Request;
use std::collections::HashSet;
use tsign_mta::types::Direction;

use crate::errors::*;

const DEFAULT_TIMEZONE: &str = "America/New_York";

/// The values serialized into a board configuration file.
#[derive(Debug, Clone)]
pub struct SecretsConfig {
    pub ssid: String,
    pub password: String,
    pub timezone: String,
    pub stations: Vec<String>,
    pub direction: Direction,
    pub api_url: String,
    pub lines: Vec<String>,
}

impl SecretsConfig {
    /// Builds a config from `/config/export` query parameters. Station ids
    /// and line codes arrive comma-separated; lines picked from several
    /// station complexes overlap, so they are deduplicated here.
    pub fn from_request(req: &Request) -> SignResult<Self> {
        let ssid = param(req, "ssid")?;
        let password = param(req, "pass")?;
        let api_url = param(req, "url")?;
        let direction = param(req, "direction")?.parse::<Direction>()?;
        let stations = split_csv(&param(req, "stations")?);
        if stations.is_empty() {
            Err(SignError::MissingParameter("stations"))?
        }
        let lines = dedup(split_csv(&param(req, "lines")?));
        if lines.is_empty() {
            Err(SignError::MissingParameter("lines"))?
        }
        let timezone = req.get_param("tz")
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TIMEZONE.into());
        Ok(Self { ssid, password, timezone, stations, direction, api_url, lines })
    }

    /// The `secrets.py` text itself.
    pub fn render(&self) -> String {
        format!("secrets = {{
    'ssid': '{}',
    'password': '{}',
    'timezone' : '{}',
    'mta_station': '{}',
    'mta_train_direction': '{}',
    'mta_api_url': '{}',
    'debug': False,
    'mta_train_lines': '{}'
}}",
            self.ssid,
            self.password,
            self.timezone,
            self.stations.join(","),
            self.direction,
            self.api_url,
            self.lines.join(","))
    }
}

fn param(req: &Request, name: &'static str) -> SignResult<String> {
    match req.get_param(name) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SignError::MissingParameter(name)),
    }
}

/// Splits a comma-separated parameter, dropping empty segments.
fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .filter(|p| !p.is_empty())
        .map(|p| p.to_string())
        .collect()
}

/// Order-preserving dedup.
fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.into_iter()
        .filter(|i| seen.insert(i.clone()))
        .collect()
}
