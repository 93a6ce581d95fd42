//! Main app context.

use rouille::{Request, Response, router};
use std::time::Duration;
use tsign_util::http::HttpServer;
use tsign_util::user_agent;
use tsign_mta::client::MtaClient;
use tsign_mta::feeds::LineFeedMap;
use tsign_mta::types::Direction;

use crate::config::Config;
use crate::complex;
use crate::schedule::ScheduleAggregator;
use crate::secrets::SecretsConfig;
use crate::errors::*;

/// Transit system whose status entries are served.
const STATUS_SYSTEM: &str = "subway";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

pub struct App {
    /// Client for the upstream feed provider.
    mta: MtaClient,
    /// Line→feed table, loaded once at startup. rouille's worker threads
    /// only ever read it.
    feeds: LineFeedMap,
}

impl HttpServer for App {
    type Error = SignError;

    fn on_request(&self, req: &Request) -> SignResult<Response> {
        router!(req,
            (GET) (/) => {
                Ok(Response::text(user_agent!()))
            },
            (GET) (/status) => {
                let ret = self.mta.status(STATUS_SYSTEM)?;
                Ok(Response::json(&ret))
            },
            (GET) (/status/{id: String}) => {
                let ret = self.mta.status(STATUS_SYSTEM)?;
                let ret = ret.into_iter()
                    .find(|e| e.name.contains(&id))
                    .ok_or(SignError::NotFound)?;
                Ok(Response::json(&ret))
            },
            (GET) (/station) => {
                let stops = self.mta.stops()?;
                let ret = complex::resolve_complexes(&stops, &self.feeds);
                Ok(Response::json(&ret))
            },
            (GET) (/station/{id: String}) => {
                let ret = self.mta.stop(&id)?;
                Ok(Response::json(&ret))
            },
            (GET) (/schedule/{station: String}) => {
                let ret = self.aggregator().station_schedule(&station)?;
                Ok(Response::json(&ret))
            },
            (GET) (/schedule/{station: String}/{dir: Direction}) => {
                let ret = self.aggregator().station_direction(&station, dir)?;
                Ok(Response::json(&ret))
            },
            (GET) (/schedule/{stations: String}/{lines: String}/{dir: Direction}) => {
                let stations = split_path_list(&stations)?;
                let lines = split_path_list(&lines)?;
                let ret = self.aggregator().combined(&stations, &lines, dir)?;
                Ok(Response::json(&ret))
            },
            (GET) (/config/export) => {
                let cfg = SecretsConfig::from_request(req)?;
                Ok(Response::text(cfg.render()))
            },
            _ => {
                Err(SignError::InvalidPath)
            }
        )
    }
}

impl App {
    pub fn new(cfg: &Config, feeds: LineFeedMap) -> Result<Self> {
        let timeout = Duration::from_secs(
            cfg.fetch_timeout_secs.unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS));
        let mta = MtaClient::new(user_agent!(), cfg.upstream_url.clone(), timeout)?;
        Ok(Self { mta, feeds })
    }
    fn aggregator(&self) -> ScheduleAggregator {
        ScheduleAggregator::new(&self.mta, &self.feeds)
    }
}

/// Splits a comma-separated path segment, dropping empty entries; a list
/// with nothing left in it is a malformed request.
fn split_path_list(s: &str) -> SignResult<Vec<&str>> {
    let ret: Vec<&str> = s.split(',')
        .filter(|p| !p.is_empty())
        .collect();
    if ret.is_empty() {
        Err(SignError::InvalidPath)?
    }
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_lists_split_and_reject_empty() {
        assert_eq!(split_path_list("R14,A31").unwrap(), vec!["R14", "A31"]);
        assert_eq!(split_path_list("R14,").unwrap(), vec!["R14"]);
        assert!(split_path_list("").is_err());
        assert!(split_path_list(",,").is_err());
    }
}
