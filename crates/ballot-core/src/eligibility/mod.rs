//! Vote eligibility: reconcile the locally cached "voted" flag with the
//! election service before a vote may start.

pub mod check;
pub mod reconcile;

pub use check::{UnknownStatusPolicy, VoteCheck, check_vote_status};
pub use reconcile::{ReconcileAction, reconcile};
