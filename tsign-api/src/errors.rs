//! Standard fare error handling.
//!
//! Absence of data is never an error here: empty schedules and unknown
//! line codes produce empty results. Errors are reserved for caller
//! mistakes and upstream transport failure.

pub use failure::Error;
use failure_derive::Fail;
use tsign_util::impl_from_for_error;
use tsign_util::http::StatusCode;
use tsign_mta::client::MtaError;
use tsign_mta::types::InvalidDirection;

/// Error that could occur when processing a request.
#[derive(Fail, Debug)]
pub enum SignError {
    /// The API path doesn't exist.
    #[fail(display = "invalid path")]
    InvalidPath,
    /// A direction other than N or S was supplied.
    #[fail(display = "direction must be N or S")]
    InvalidDirection,
    /// A required parameter was missing or empty.
    #[fail(display = "missing parameter: {}", _0)]
    MissingParameter(&'static str),
    /// Nothing matched the request.
    #[fail(display = "not found")]
    NotFound,
    /// Upstream fetch failed. The detail is logged, not leaked.
    #[fail(display = "upstream service unavailable")]
    Upstream(MtaError),
}

impl StatusCode for SignError {
    fn status_code(&self) -> u16 {
        use self::SignError::*;

        match *self {
            InvalidPath => 400,
            InvalidDirection => 400,
            MissingParameter(_) => 400,
            NotFound => 404,
            Upstream(ref e) => e.status_code(),
        }
    }
}

impl From<InvalidDirection> for SignError {
    fn from(_: InvalidDirection) -> SignError {
        SignError::InvalidDirection
    }
}

impl_from_for_error!(SignError,
                     MtaError => Upstream);

pub type SignResult<T> = ::std::result::Result<T, SignError>;
pub type Result<T, E = Error> = ::std::result::Result<T, E>;
