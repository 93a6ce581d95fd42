//! Blocking JSON client for the upstream provider.

use reqwest::{Client, Method};
use reqwest::Error as ReqwestError;
use failure_derive::Fail;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt::Display;
use std::time::Duration;
use log::*;

use tsign_util::impl_from_for_error;
use crate::feeds::FeedId;
use crate::types::{ScheduleResponse, StatusEntry, StopRecord};

/// An error encountered talking to the upstream provider.
#[derive(Debug, Fail)]
pub enum MtaError {
    /// The requested entity does not exist upstream.
    #[fail(display = "not found (upstream)")]
    RemoteNotFound,
    /// The upstream provider is down or overloaded.
    #[fail(display = "upstream unavailable")]
    RemoteUnavailable,
    /// The upstream provider returned some other error.
    #[fail(display = "upstream error (code {}): {}", code, error)]
    RemoteError {
        /// The HTTP status code returned.
        code: u16,
        /// The error text.
        error: String
    },
    /// reqwest error. Timeouts land here as well.
    #[fail(display = "reqwest: {}", _0)]
    Reqwest(ReqwestError)
}
impl_from_for_error!(MtaError,
                     ReqwestError => Reqwest);

impl MtaError {
    pub fn status_code(&self) -> u16 {
        use self::MtaError::*;
        match *self {
            RemoteNotFound => 404,
            RemoteUnavailable => 503,
            RemoteError { .. } => 502,
            _ => 502
        }
    }
}

pub type MtaResult<T> = Result<T, MtaError>;

/// Client for the provider's JSON API.
pub struct MtaClient {
    pub base_url: String,
    pub user_agent: String,
    cli: Client
}

impl MtaClient {
    /// Creates a client. `timeout` bounds every fetch; a fetch that times
    /// out surfaces as a transport error.
    pub fn new(ua: String, base_url: String, timeout: Duration) -> MtaResult<Self> {
        let cli = Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            user_agent: ua,
            base_url, cli
        })
    }
    fn req<T, U>(&self, url: T) -> MtaResult<U> where T: Display, U: DeserializeOwned {
        let url = format!("{}{}", self.base_url, url);
        debug!("upstream: GET {}", url);
        let mut resp = self.cli.request(Method::GET, &url)
            .header(reqwest::header::USER_AGENT, &self.user_agent as &str)
            .send()
            .map_err(|e| {
                warn!("upstream: GET {} failed: {}", url, e);
                e
            })?;
        let status = resp.status();
        debug!("upstream: response code {}", status.as_u16());
        match status.as_u16() {
            404 => Err(MtaError::RemoteNotFound)?,
            502 | 503 | 504 => Err(MtaError::RemoteUnavailable)?,
            _ => {}
        }
        if !status.is_success() {
            let text = resp.text()?;
            warn!("upstream: request failed ({}): {}", status.as_u16(), text);
            Err(MtaError::RemoteError {
                code: status.as_u16(),
                error: text
            })?
        }
        let ret: U = resp.json()?;
        Ok(ret)
    }
    /// Service-status entries for one transit system (e.g. "subway").
    pub fn status(&self, system: &str) -> MtaResult<Vec<StatusEntry>> {
        self.req(format!("/status/{}", system))
    }
    /// The full stop-record dump, keyed by stop id.
    pub fn stops(&self) -> MtaResult<HashMap<String, StopRecord>> {
        self.req("/stops")
    }
    /// A single stop record.
    pub fn stop(&self, id: &str) -> MtaResult<StopRecord> {
        self.req(format!("/stops/{}", id))
    }
    /// Arrival predictions for `station` carried by `feed`.
    pub fn schedule(&self, station: &str, feed: &FeedId) -> MtaResult<ScheduleResponse> {
        self.req(format!("/schedule/{}/{}", station, feed))
    }
}
