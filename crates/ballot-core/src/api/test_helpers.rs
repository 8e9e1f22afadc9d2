//! In-memory [`ElectionApi`] used by this crate's tests and by the CLI's.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::client::ElectionApi;
use super::errors::ApiError;
use super::types::StatusNotification;
use crate::elections::{CandidateRoster, Election, ElectionStatus};

/// A request the fake received, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    FetchCandidates {
        token: String,
        election_id: String,
    },
    FetchElection {
        token: String,
        election_id: String,
    },
    CheckVoteStatus {
        token: String,
        election_id: String,
    },
    SetElectionStatus {
        token: String,
        election_id: String,
        status: ElectionStatus,
    },
    SendStatusNotification {
        token: String,
        notification: StatusNotification,
    },
}

#[derive(Debug)]
struct FakeState {
    calls: Vec<ApiCall>,
    candidates: Result<CandidateRoster, ApiError>,
    elections: HashMap<String, Result<Election, ApiError>>,
    vote_status: Result<bool, ApiError>,
    set_status: Result<(), ApiError>,
    notification: Result<(), ApiError>,
}

/// Scripted election service. Clones share state.
#[derive(Debug, Clone)]
pub struct FakeElectionApi {
    state: Arc<Mutex<FakeState>>,
}

impl Default for FakeElectionApi {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeElectionApi {
    /// Candidates succeed with an empty roster for user `1`, vote status is
    /// `false`, status updates and notifications succeed, and every election
    /// lookup fails with 404 until one is registered.
    pub fn new() -> Self {
        let roster = CandidateRoster {
            user: crate::elections::Voter {
                userid: "1".to_string(),
                extra: Default::default(),
            },
            candidates: Vec::new(),
        };
        Self {
            state: Arc::new(Mutex::new(FakeState {
                calls: Vec::new(),
                candidates: Ok(roster),
                elections: HashMap::new(),
                vote_status: Ok(false),
                set_status: Ok(()),
                notification: Ok(()),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn with_candidates(self, result: Result<CandidateRoster, ApiError>) -> Self {
        self.lock().candidates = result;
        self
    }

    pub fn with_election(self, election_id: &str, result: Result<Election, ApiError>) -> Self {
        self.set_election(election_id, result);
        self
    }

    /// Replace the response for an election after construction.
    pub fn set_election(&self, election_id: &str, result: Result<Election, ApiError>) {
        self.lock().elections.insert(election_id.to_string(), result);
    }

    pub fn with_vote_status(self, result: Result<bool, ApiError>) -> Self {
        self.lock().vote_status = result;
        self
    }

    pub fn with_set_status(self, result: Result<(), ApiError>) -> Self {
        self.lock().set_status = result;
        self
    }

    pub fn with_notification(self, result: Result<(), ApiError>) -> Self {
        self.lock().notification = result;
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Status updates sent so far, as `(election_id, status)`.
    pub fn status_updates(&self) -> Vec<(String, ElectionStatus)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                ApiCall::SetElectionStatus {
                    election_id,
                    status,
                    ..
                } => Some((election_id.clone(), *status)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) -> MutexGuard<'_, FakeState> {
        let mut state = self.lock();
        state.calls.push(call);
        state
    }
}

impl ElectionApi for FakeElectionApi {
    async fn fetch_candidates(
        &self,
        token: &str,
        election_id: &str,
    ) -> Result<CandidateRoster, ApiError> {
        self.record(ApiCall::FetchCandidates {
            token: token.to_string(),
            election_id: election_id.to_string(),
        })
        .candidates
        .clone()
    }

    async fn fetch_election(&self, token: &str, election_id: &str) -> Result<Election, ApiError> {
        let state = self.record(ApiCall::FetchElection {
            token: token.to_string(),
            election_id: election_id.to_string(),
        });
        state.elections.get(election_id).cloned().unwrap_or_else(|| {
            Err(ApiError::Status {
                status: 404,
                message: Some("Election not found".to_string()),
            })
        })
    }

    async fn check_vote_status(&self, token: &str, election_id: &str) -> Result<bool, ApiError> {
        self.record(ApiCall::CheckVoteStatus {
            token: token.to_string(),
            election_id: election_id.to_string(),
        })
        .vote_status
        .clone()
    }

    async fn set_election_status(
        &self,
        token: &str,
        election_id: &str,
        status: ElectionStatus,
    ) -> Result<(), ApiError> {
        self.record(ApiCall::SetElectionStatus {
            token: token.to_string(),
            election_id: election_id.to_string(),
            status,
        })
        .set_status
        .clone()
    }

    async fn send_status_notification(
        &self,
        token: &str,
        notification: &StatusNotification,
    ) -> Result<(), ApiError> {
        self.record(ApiCall::SendStatusNotification {
            token: token.to_string(),
            notification: notification.clone(),
        })
        .notification
        .clone()
    }
}
