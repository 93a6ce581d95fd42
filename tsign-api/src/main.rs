//! Aggregates realtime subway data from the upstream feed provider into a
//! small JSON API, for LED train signs and the config page that feeds them.

pub mod errors;
pub mod config;
pub mod ctx;
pub mod complex;
pub mod schedule;
pub mod secrets;

use log::*;
use tsign_util::ConfigExt;
use tsign_mta::feeds::LineFeedMap;
use self::config::Config;
use self::ctx::App;
use errors::Result;

fn main() -> Result<()> {
    tsign_util::setup_logging()?;
    info!("tsign-api, but not yet");
    info!("loading config");
    let cfg = Config::load()?;
    let feeds_path = cfg.feeds_path.clone()
        .unwrap_or_else(|| "./feeds.json".into());
    info!("loading line→feed table from {}", feeds_path);
    let feeds = LineFeedMap::load(&feeds_path)?;
    info!("{} line codes mapped", feeds.len());
    let app = App::new(&cfg, feeds)?;
    tsign_util::http::start_server(&cfg.listen, app);
}
