//! Self-vote guard: the last local check before the multi-step vote flow.

use tracing::{info, warn};

use crate::elections::{Candidate, Voter};
use crate::navigation::{Notice, Route};
use crate::storage::{KeyValueStore, StorageError, keys};

#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    /// The viewer picked themselves. Nothing was written.
    SelfVote(Notice),
    /// Hand-off data is stored; continue to the OTP step.
    Proceed(Route),
}

/// Refuse a vote for oneself, otherwise store the hand-off and route to OTP.
///
/// Makes no network call. Ids compare as strings, so `7` and `"7"` from the
/// service are the same user.
pub fn guard_vote<S: KeyValueStore + ?Sized>(
    store: &mut S,
    election_id: &str,
    voter: &Voter,
    candidate: &Candidate,
) -> Result<GuardOutcome, StorageError> {
    if voter.userid == candidate.candidate_id {
        warn!(
            event = "core.guard.self_vote_blocked",
            election_id = election_id,
            user_id = %voter.userid
        );
        return Ok(GuardOutcome::SelfVote(Notice::self_vote()));
    }

    keys::write_handoff(store, candidate, voter)?;
    info!(
        event = "core.guard.handoff_written",
        election_id = election_id,
        candidate_id = %candidate.candidate_id
    );

    Ok(GuardOutcome::Proceed(Route::Otp {
        election_id: election_id.to_string(),
        candidate_id: candidate.candidate_id.clone(),
    }))
}
