pub mod types;

pub use types::{Candidate, CandidateRoster, Election, ElectionStatus, Voter};
