//! The static line→feed table.

use serde_derive::{Serialize, Deserialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::fmt;

/// An upstream feed identifier.
///
/// The provider assigns numeric ids to its subway feeds, but string ids
/// turn up elsewhere, so both spellings are accepted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum FeedId {
    Num(u64),
    Name(String)
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FeedId::Num(n) => write!(f, "{}", n),
            FeedId::Name(ref s) => write!(f, "{}", s)
        }
    }
}

/// The line→feed table, loaded once at startup and immutable afterwards.
///
/// Lookups for unknown line codes return `None`, never an error; callers
/// are expected to skip such lines, since they can never produce data.
#[derive(Deserialize, Debug, Clone)]
#[serde(transparent)]
pub struct LineFeedMap {
    feeds: HashMap<String, FeedId>,
}

impl LineFeedMap {
    /// Loads the table from a JSON file mapping line code → feed id.
    pub fn load(path: &str) -> Result<Self, failure::Error> {
        let f = File::open(path)?;
        let f = BufReader::new(f);
        let ret = serde_json::from_reader(f)?;
        Ok(ret)
    }
    /// O(1) lookup of the feed carrying `line`.
    pub fn resolve(&self, line: &str) -> Option<&FeedId> {
        self.feeds.get(line)
    }
    /// Feed lookup by the line-family prefix (first character) of a stop id.
    pub fn resolve_prefix(&self, stop_id: &str) -> Option<&FeedId> {
        stop_id.get(..1).and_then(|c| self.feeds.get(c))
    }
    pub fn len(&self) -> usize {
        self.feeds.len()
    }
}
