//! Client library for the upstream realtime transit-feed provider.
//!
//! Contains the wire types for the provider's JSON API, the static
//! line→feed table, and a blocking client with a tagged error type, so
//! consumers never have to inspect ad-hoc payload shapes to tell a
//! transport failure from an empty result.

pub mod fns;
pub mod types;
pub mod feeds;
pub mod client;

#[cfg(test)]
mod tests;
