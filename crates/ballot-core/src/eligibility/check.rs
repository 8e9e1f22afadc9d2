use tracing::{error, info, warn};

use super::reconcile::{ReconcileAction, reconcile};
use crate::api::{ApiError, ElectionApi};
use crate::errors::FlowError;
use crate::navigation::Notice;
use crate::storage::KeyValueStore;
use crate::storage::keys;

/// What to do when the vote status cannot be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownStatusPolicy {
    /// Let the viewer proceed; the service rejects a duplicate vote later.
    #[default]
    FailOpen,
    /// Block with a "status unavailable" notice.
    FailClosed,
}

impl UnknownStatusPolicy {
    pub fn from_fail_closed(fail_closed: bool) -> Self {
        if fail_closed {
            UnknownStatusPolicy::FailClosed
        } else {
            UnknownStatusPolicy::FailOpen
        }
    }
}

/// Result of asking whether the viewer may start voting.
#[derive(Debug, Clone, PartialEq)]
pub enum VoteCheck {
    /// The viewer may proceed. `cleared_stale` is set when a local flag
    /// that the service contradicted was removed.
    Eligible { cleared_stale: bool },
    AlreadyVoted(Notice),
    /// The account's role may not vote.
    Forbidden(Notice),
    /// Status unknown under [`UnknownStatusPolicy::FailClosed`].
    Unavailable(Notice),
}

impl VoteCheck {
    pub fn is_eligible(&self) -> bool {
        matches!(self, VoteCheck::Eligible { .. })
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            VoteCheck::Eligible { .. } => None,
            VoteCheck::AlreadyVoted(n) | VoteCheck::Forbidden(n) | VoteCheck::Unavailable(n) => {
                Some(n)
            }
        }
    }
}

/// Ask the service whether the viewer has voted and reconcile the local flag.
///
/// The service is authoritative. A missing token fails with
/// [`FlowError::AuthMissing`] before any request is made.
pub async fn check_vote_status<A, S>(
    api: &A,
    store: &mut S,
    election_id: &str,
    policy: UnknownStatusPolicy,
) -> Result<VoteCheck, FlowError>
where
    A: ElectionApi,
    S: KeyValueStore + ?Sized,
{
    let Some(token) = keys::load_token(store)? else {
        warn!(
            event = "core.eligibility.check_failed",
            election_id = election_id,
            reason = "no_token"
        );
        return Err(FlowError::AuthMissing);
    };

    let remote = match api.check_vote_status(&token, election_id).await {
        Ok(has_voted) => has_voted,
        Err(ApiError::RoleForbidden { role, .. }) => {
            info!(
                event = "core.eligibility.role_forbidden",
                election_id = election_id,
                role = %role
            );
            return Ok(VoteCheck::Forbidden(Notice::role_not_allowed(role)));
        }
        Err(e) => return Ok(unknown_status(election_id, &e, policy)),
    };

    let local = keys::is_marked_voted(store, election_id)?;
    let (_, action) = reconcile(local, remote);
    match action {
        ReconcileAction::MarkVoted => keys::mark_voted(store, election_id)?,
        ReconcileAction::ClearStale => {
            info!(
                event = "core.eligibility.stale_flag_cleared",
                election_id = election_id
            );
            keys::clear_voted(store, election_id)?;
        }
        ReconcileAction::None => {}
    }

    if remote {
        info!(
            event = "core.eligibility.already_voted",
            election_id = election_id
        );
        return Ok(VoteCheck::AlreadyVoted(Notice::already_voted()));
    }

    info!(event = "core.eligibility.eligible", election_id = election_id);
    Ok(VoteCheck::Eligible {
        cleared_stale: action == ReconcileAction::ClearStale,
    })
}

fn unknown_status(election_id: &str, error: &ApiError, policy: UnknownStatusPolicy) -> VoteCheck {
    match policy {
        UnknownStatusPolicy::FailOpen => {
            warn!(
                event = "core.eligibility.status_unknown",
                election_id = election_id,
                error = %error,
                policy = "fail_open"
            );
            VoteCheck::Eligible {
                cleared_stale: false,
            }
        }
        UnknownStatusPolicy::FailClosed => {
            error!(
                event = "core.eligibility.status_unknown",
                election_id = election_id,
                error = %error,
                policy = "fail_closed"
            );
            VoteCheck::Unavailable(Notice::status_unavailable())
        }
    }
}
