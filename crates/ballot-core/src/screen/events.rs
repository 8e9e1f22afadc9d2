use crate::countdown::CountdownState;
use crate::elections::{CandidateRoster, Election};
use crate::navigation::{Notice, Route};

use super::state::VoteStep;

/// Everything that can change the election screen.
///
/// Each variant describes what happened. The controller produces them from
/// API results, countdown updates and viewer actions.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenEvent {
    /// A fetch began. `refreshing` keeps the current data on screen.
    LoadStarted { refreshing: bool },
    CandidatesLoaded(CandidateRoster),
    CandidatesFailed { message: String },
    ElectionLoaded(Election),
    ElectionFailed { message: String },
    CountdownTicked(CountdownState),
    /// The countdown reached zero.
    ElectionEnded,
    TransitionFailed { message: String },
    VoteStatusKnown { has_voted: bool },
    StepChanged(VoteStep),
    NoticeShown(Notice),
    NoticeDismissed,
    Navigated(Route),
    /// The screen now shows a different election; all data is discarded.
    Reset { election_id: String },
}
