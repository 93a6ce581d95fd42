//! Standard configuration module.

use serde_derive::Deserialize;
use tsign_util::{ConfigExt, crate_name};

/// `tsign-api` configuration.
#[derive(Deserialize, Debug)]
pub struct Config {
    /// Address to listen on.
    pub listen: String,
    /// Base URL of the upstream feed provider's API.
    pub upstream_url: String,
    /// Path to the line→feed table (defaults to ./feeds.json).
    #[serde(default)]
    pub feeds_path: Option<String>,
    /// Per-fetch timeout towards the upstream, in seconds (default 10).
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
}

impl ConfigExt for Config {
    fn crate_name() -> &'static str {
        crate_name!()
    }
}
