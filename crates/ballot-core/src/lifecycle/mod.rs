//! Lifecycle transition run when an election's countdown reaches zero.

use tracing::{debug, error, info, warn};

use crate::api::{ApiError, ElectionApi, StatusNotification};
use crate::elections::{Election, ElectionStatus};
use crate::errors::FlowError;
use crate::navigation::Route;
use crate::storage::{KeyValueStore, keys};

#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// Status is `ended` on the service. `notified` reports whether the
    /// best-effort broadcast went out.
    Completed { route: Route, notified: bool },
    /// The status update was rejected. Not retried; the viewer stays put.
    StatusUpdateFailed { error: ApiError },
}

/// Mark the election ended on the service and announce it.
///
/// The notification is sent only after the status update succeeds and its
/// failure never fails the transition. `election` supplies the names the
/// notification carries; without it no notification is sent.
pub async fn end_election<A, S>(
    api: &A,
    store: &S,
    election_id: &str,
    election: Option<&Election>,
) -> Result<TransitionOutcome, FlowError>
where
    A: ElectionApi,
    S: KeyValueStore + ?Sized,
{
    let Some(token) = keys::load_token(store)? else {
        warn!(
            event = "core.lifecycle.transition_failed",
            election_id = election_id,
            reason = "no_token"
        );
        return Err(FlowError::AuthMissing);
    };

    info!(
        event = "core.lifecycle.transition_started",
        election_id = election_id
    );

    if let Err(e) = api
        .set_election_status(&token, election_id, ElectionStatus::Ended)
        .await
    {
        error!(
            event = "core.lifecycle.status_update_failed",
            election_id = election_id,
            error = %e
        );
        return Ok(TransitionOutcome::StatusUpdateFailed { error: e });
    }

    let notified = match election {
        Some(election) => {
            let notification =
                StatusNotification::for_election(election_id, election, ElectionStatus::Ended);
            match api.send_status_notification(&token, &notification).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(
                        event = "core.lifecycle.notification_failed",
                        election_id = election_id,
                        error = %e
                    );
                    false
                }
            }
        }
        None => {
            debug!(
                event = "core.lifecycle.notification_skipped",
                election_id = election_id,
                reason = "no_election_details"
            );
            false
        }
    };

    info!(
        event = "core.lifecycle.transition_completed",
        election_id = election_id,
        notified = notified
    );

    Ok(TransitionOutcome::Completed {
        route: Route::Results {
            election_id: election_id.to_string(),
        },
        notified,
    })
}
