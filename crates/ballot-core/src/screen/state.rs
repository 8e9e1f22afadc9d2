use serde::Serialize;

use crate::countdown::CountdownState;
use crate::elections::{Candidate, Election, Voter};
use crate::navigation::{Notice, Route};

/// Shown in place of the candidate list when it is empty.
pub const NO_CANDIDATES_MESSAGE: &str = "No Candidates Approved";

/// Shown when election details fail to load and the service gave no reason.
pub const ELECTION_FETCH_FAILED_MESSAGE: &str = "Failed to fetch election details";

/// Loading state of the candidate list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Loading,
    Ready,
    /// The candidate fetch failed; a retry is offered.
    Failed { message: String },
}

/// Steps of the vote flow, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteStep {
    #[default]
    ChooseCandidate,
    OtpValidation,
    FacialRecognition,
    ConfirmVote,
}

impl VoteStep {
    pub const ALL: [VoteStep; 4] = [
        VoteStep::ChooseCandidate,
        VoteStep::OtpValidation,
        VoteStep::FacialRecognition,
        VoteStep::ConfirmVote,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VoteStep::ChooseCandidate => "Choose Candidate",
            VoteStep::OtpValidation => "OTP Validation",
            VoteStep::FacialRecognition => "Facial Recognition",
            VoteStep::ConfirmVote => "Confirm Vote",
        }
    }

    /// One-based position shown in the progress indicator.
    pub fn number(&self) -> usize {
        Self::ALL
            .iter()
            .position(|step| step == self)
            .map_or(1, |i| i + 1)
    }
}

/// Everything the election screen renders.
///
/// Only [`super::reduce`] changes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScreenState {
    pub election_id: String,
    pub phase: Phase,
    /// A pull-to-refresh is in flight; the current data stays visible.
    pub refreshing: bool,
    pub voter: Option<Voter>,
    pub candidates: Vec<Candidate>,
    pub election: Option<Election>,
    pub election_error: Option<String>,
    pub countdown: CountdownState,
    /// Latched once the countdown reaches zero.
    pub ended: bool,
    pub has_voted: bool,
    pub step: VoteStep,
    pub notice: Option<Notice>,
    /// Where the screen has asked to navigate, if anywhere.
    pub route: Option<Route>,
    /// Inline error left by a failed lifecycle transition.
    pub transition_error: Option<String>,
}

impl ScreenState {
    pub fn new(election_id: impl Into<String>) -> Self {
        Self {
            election_id: election_id.into(),
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn find_candidate(&self, candidate_id: &str) -> Option<&Candidate> {
        self.candidates
            .iter()
            .find(|c| c.candidate_id == candidate_id)
    }

    /// Placeholder text for an empty, loaded candidate list.
    pub fn empty_message(&self) -> Option<&'static str> {
        (self.phase == Phase::Ready && self.candidates.is_empty()).then_some(NO_CANDIDATES_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_steps_are_numbered_in_order() {
        let labels: Vec<_> = VoteStep::ALL
            .iter()
            .map(|s| format!("{}. {}", s.number(), s.label()))
            .collect();
        assert_eq!(
            labels,
            vec![
                "1. Choose Candidate",
                "2. OTP Validation",
                "3. Facial Recognition",
                "4. Confirm Vote"
            ]
        );
    }

    #[test]
    fn test_empty_message_only_when_loaded() {
        let mut state = ScreenState::new("12");
        assert_eq!(state.empty_message(), None);

        state.phase = Phase::Ready;
        assert_eq!(state.empty_message(), Some("No Candidates Approved"));
    }
}
