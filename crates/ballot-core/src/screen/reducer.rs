use crate::countdown::CountdownState;
use crate::navigation::Notice;

use super::events::ScreenEvent;
use super::state::{Phase, ScreenState};

/// Apply one event to the screen state.
///
/// Pure: no I/O and no clock. Once `ended` is set, countdown ticks are
/// ignored and the display stays at `00:00:00`.
pub fn reduce(mut state: ScreenState, event: ScreenEvent) -> ScreenState {
    match event {
        ScreenEvent::LoadStarted { refreshing } => {
            if refreshing {
                state.refreshing = true;
            } else {
                state.phase = Phase::Loading;
            }
        }
        ScreenEvent::CandidatesLoaded(roster) => {
            state.voter = Some(roster.user);
            state.candidates = roster.candidates;
            state.phase = Phase::Ready;
            state.refreshing = false;
        }
        ScreenEvent::CandidatesFailed { message } => {
            state.phase = Phase::Failed { message };
            state.refreshing = false;
        }
        ScreenEvent::ElectionLoaded(election) => {
            state.election = Some(election);
            state.election_error = None;
            state.refreshing = false;
        }
        ScreenEvent::ElectionFailed { message } => {
            state.election_error = Some(message);
            state.refreshing = false;
        }
        ScreenEvent::CountdownTicked(countdown) => {
            if !state.ended {
                state.countdown = countdown;
            }
        }
        ScreenEvent::ElectionEnded => {
            if !state.ended {
                state.ended = true;
                state.countdown = CountdownState::ZERO;
                state.notice = Some(Notice::election_ended(&state.election_id));
            }
        }
        ScreenEvent::TransitionFailed { message } => {
            state.transition_error = Some(message);
        }
        ScreenEvent::VoteStatusKnown { has_voted } => {
            state.has_voted = has_voted;
        }
        ScreenEvent::StepChanged(step) => {
            state.step = step;
        }
        ScreenEvent::NoticeShown(notice) => {
            state.notice = Some(notice);
        }
        ScreenEvent::NoticeDismissed => {
            if let Some(route) = state.notice.take().and_then(|n| n.redirect) {
                state.route = Some(route);
            }
        }
        ScreenEvent::Navigated(route) => {
            state.notice = None;
            state.route = Some(route);
        }
        ScreenEvent::Reset { election_id } => {
            state = ScreenState::new(election_id);
        }
    }
    state
}
