//! Client side of the election service's HTTP/JSON API.

pub mod client;
pub mod errors;
#[doc(hidden)]
pub mod test_helpers;
pub mod types;

pub use client::{ELECTION_ID_HEADER, ElectionApi, HttpElectionApi};
pub use errors::ApiError;
pub use types::{RestrictedRole, StatusNotification};
