//! ballot-core: Core library for the election screen of a campus voting app
//!
//! This library provides the countdown, eligibility and voting-flow logic
//! behind the election screen. It is used by the `ballot` CLI.
//!
//! # Main Entry Points
//!
//! - [`screen`] - Election screen controller and its state
//! - [`countdown`] - Deadline countdown and the task that drives it
//! - [`eligibility`] - Reconcile the local voted flag with the service
//! - [`guard`] - Self-vote guard and vote hand-off
//! - [`lifecycle`] - End an election when its countdown expires
//! - [`api`] - HTTP client for the election service
//! - [`config`] - Configuration management

pub mod api;
pub mod config;
pub mod countdown;
pub mod elections;
pub mod eligibility;
pub mod errors;
pub mod events;
pub mod guard;
pub mod lifecycle;
pub mod logging;
pub mod navigation;
pub mod screen;
pub mod storage;

// Re-export commonly used types at crate root for convenience
pub use api::{ApiError, ElectionApi, HttpElectionApi, RestrictedRole, StatusNotification};
pub use config::BallotConfig;
pub use countdown::{Clock, CountdownState, ManualClock, SystemClock};
pub use elections::{Candidate, CandidateRoster, Election, ElectionStatus, Voter};
pub use eligibility::{UnknownStatusPolicy, VoteCheck};
pub use errors::{BallotError, FlowError};
pub use guard::GuardOutcome;
pub use lifecycle::TransitionOutcome;
pub use navigation::{Notice, NoticeKind, Route};
pub use screen::{ElectionScreen, Phase, ScreenConfig, ScreenState, VoteStart, VoteStep};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

// Re-export logging initialization
pub use logging::init_logging;
