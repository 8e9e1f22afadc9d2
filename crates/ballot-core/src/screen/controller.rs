//! Single owner of the election screen's state and its countdown task.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use super::events::ScreenEvent;
use super::reducer::reduce;
use super::state::{ELECTION_FETCH_FAILED_MESSAGE, ScreenState, VoteStep};
use crate::api::{ApiError, ElectionApi};
use crate::config::BallotConfig;
use crate::countdown::{
    Clock, CountdownEvent, CountdownHandle, CountdownMonitor, CountdownUpdate, spawn_countdown,
};
use crate::eligibility::{UnknownStatusPolicy, check_vote_status};
use crate::errors::FlowError;
use crate::guard::{GuardOutcome, guard_vote};
use crate::lifecycle::{TransitionOutcome, end_election};
use crate::navigation::{Notice, Route};
use crate::storage::{KeyValueStore, keys};

/// Screen behaviour taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenConfig {
    pub tick_interval: Duration,
    pub unknown_status: UnknownStatusPolicy,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self::from_config(&BallotConfig::default())
    }
}

impl ScreenConfig {
    pub fn from_config(config: &BallotConfig) -> Self {
        Self {
            tick_interval: config.countdown.tick_interval(),
            unknown_status: UnknownStatusPolicy::from_fail_closed(config.voting.fail_closed()),
        }
    }
}

/// Result of the viewer pressing "vote" on a candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum VoteStart {
    /// A notice is shown instead of starting the flow.
    Blocked(Notice),
    Proceed(Route),
}

/// Identity and timing inputs the armed countdown was built from.
type ArmedTiming = (String, Option<DateTime<Utc>>, Option<u32>);

/// Controller for one election screen.
///
/// Owns the screen state, the local store and at most one countdown task.
/// Countdown updates arrive on an internal channel and are applied by
/// [`ElectionScreen::handle_update`]; updates from a timer that has since
/// been replaced are dropped.
pub struct ElectionScreen<A, S, C> {
    api: A,
    store: S,
    clock: C,
    config: ScreenConfig,
    state: ScreenState,
    updates_tx: UnboundedSender<CountdownUpdate>,
    updates_rx: UnboundedReceiver<CountdownUpdate>,
    countdown: Option<CountdownHandle>,
    generation: u64,
    armed: Option<ArmedTiming>,
    transition_fired: bool,
}

impl<A, S, C> ElectionScreen<A, S, C>
where
    A: ElectionApi,
    S: KeyValueStore,
    C: Clock + Clone,
{
    pub fn new(
        api: A,
        store: S,
        clock: C,
        election_id: impl Into<String>,
        config: ScreenConfig,
    ) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Self {
            api,
            store,
            clock,
            config,
            state: ScreenState::new(election_id),
            updates_tx,
            updates_rx,
            countdown: None,
            generation: 0,
            armed: None,
            transition_fired: false,
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn election_id(&self) -> &str {
        &self.state.election_id
    }

    /// Whether a countdown task is currently running.
    pub fn countdown_active(&self) -> bool {
        self.countdown.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn apply(&mut self, event: ScreenEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
    }

    fn require_token(&mut self) -> Result<String, FlowError> {
        match keys::load_token(&self.store)? {
            Some(token) => Ok(token),
            None => {
                warn!(
                    event = "core.screen.auth_missing",
                    election_id = %self.state.election_id
                );
                self.apply(ScreenEvent::Navigated(Route::Login));
                Err(FlowError::AuthMissing)
            }
        }
    }

    /// Route a failed primary fetch. 401/403 clear the token and send the
    /// viewer to login.
    fn classify_fetch_error(&mut self, error: ApiError) -> FlowError {
        if !error.is_auth_failure() {
            return FlowError::Api(error);
        }

        warn!(
            event = "core.screen.session_expired",
            election_id = %self.state.election_id,
            error = %error
        );
        if let Err(e) = keys::clear_token(&mut self.store) {
            error!(event = "core.screen.token_clear_failed", error = %e);
        }
        self.apply(ScreenEvent::Navigated(Route::Login));
        FlowError::AuthExpired { source: error }
    }

    /// Load candidates and election details, then arm the countdown.
    pub async fn initialize(&mut self) -> Result<(), FlowError> {
        info!(
            event = "core.screen.initialize_started",
            election_id = %self.state.election_id
        );
        self.load(false).await
    }

    /// Pull-to-refresh: re-run both fetches while keeping current data visible.
    pub async fn refresh(&mut self) -> Result<(), FlowError> {
        debug!(
            event = "core.screen.refresh_started",
            election_id = %self.state.election_id
        );
        self.load(true).await
    }

    /// Retry after a failed candidate fetch.
    pub async fn retry(&mut self) -> Result<(), FlowError> {
        self.apply(ScreenEvent::LoadStarted { refreshing: false });
        let token = self.require_token()?;
        self.load_candidates(&token).await
    }

    async fn load(&mut self, refreshing: bool) -> Result<(), FlowError> {
        self.apply(ScreenEvent::LoadStarted { refreshing });
        let token = self.require_token()?;

        let candidates = self.load_candidates(&token).await;
        if let Err(e) = &candidates
            && e.requires_login()
        {
            return candidates;
        }

        let election = self.load_election(&token).await;
        candidates.and(election)
    }

    async fn load_candidates(&mut self, token: &str) -> Result<(), FlowError> {
        let election_id = self.state.election_id.clone();
        match self.api.fetch_candidates(token, &election_id).await {
            Ok(roster) => {
                info!(
                    event = "core.screen.candidates_loaded",
                    election_id = %election_id,
                    count = roster.candidates.len()
                );
                self.apply(ScreenEvent::CandidatesLoaded(roster));
                Ok(())
            }
            Err(e) => {
                let error = self.classify_fetch_error(e);
                if let FlowError::Api(api_error) = &error {
                    error!(
                        event = "core.screen.candidates_failed",
                        election_id = %election_id,
                        error = %api_error
                    );
                    self.apply(ScreenEvent::CandidatesFailed {
                        message: api_error.to_string(),
                    });
                }
                Err(error)
            }
        }
    }

    async fn load_election(&mut self, token: &str) -> Result<(), FlowError> {
        let election_id = self.state.election_id.clone();
        match self.api.fetch_election(token, &election_id).await {
            Ok(election) => {
                info!(
                    event = "core.screen.election_loaded",
                    election_id = %election_id,
                    status = %election.status
                );
                self.apply(ScreenEvent::ElectionLoaded(election));
                self.rearm_countdown();
                Ok(())
            }
            Err(e) => {
                let error = self.classify_fetch_error(e);
                if let FlowError::Api(api_error) = &error {
                    let message = api_error
                        .server_message()
                        .unwrap_or(ELECTION_FETCH_FAILED_MESSAGE)
                        .to_string();
                    error!(
                        event = "core.screen.election_failed",
                        election_id = %election_id,
                        error = %api_error
                    );
                    self.apply(ScreenEvent::ElectionFailed { message });
                }
                Err(error)
            }
        }
    }

    /// Arm a countdown for the current election details.
    ///
    /// Does nothing when the election id and timing inputs match the armed
    /// timer, or once the election has ended on this screen. Otherwise the
    /// previous timer is stopped before the new one starts.
    fn rearm_countdown(&mut self) {
        if self.state.ended {
            return;
        }
        let Some(election) = self.state.election.as_ref() else {
            return;
        };

        let (start_date, duration) = election.timing();
        let timing = (self.state.election_id.clone(), start_date, duration);
        if self.armed.as_ref() == Some(&timing) {
            return;
        }

        let monitor = CountdownMonitor::for_election(&self.state.election_id, election);
        self.stop_countdown();
        self.generation += 1;
        self.armed = Some(timing);

        match monitor {
            Some(monitor) => {
                self.countdown = Some(spawn_countdown(
                    monitor,
                    self.clock.clone(),
                    self.config.tick_interval,
                    self.generation,
                    self.updates_tx.clone(),
                ));
            }
            None => {
                warn!(
                    event = "core.screen.countdown_skipped",
                    election_id = %self.state.election_id,
                    reason = "no_deadline"
                );
            }
        }
    }

    fn stop_countdown(&mut self) {
        if let Some(handle) = self.countdown.take() {
            handle.stop();
        }
    }

    /// Wait for the next countdown update. Pending forever if no timer is armed.
    pub async fn next_update(&mut self) -> Option<CountdownUpdate> {
        self.updates_rx.recv().await
    }

    /// Apply a countdown update and, on expiry, run the lifecycle transition.
    ///
    /// Returns the transition outcome when this update triggered it. The
    /// transition runs at most once per election shown.
    pub async fn handle_update(
        &mut self,
        update: CountdownUpdate,
    ) -> Result<Option<TransitionOutcome>, FlowError> {
        if update.generation != self.generation || update.election_id != self.state.election_id
        {
            debug!(
                event = "core.screen.stale_update_dropped",
                election_id = %update.election_id,
                generation = update.generation,
                current_generation = self.generation
            );
            return Ok(None);
        }

        match update.event {
            CountdownEvent::Tick(countdown) => {
                self.apply(ScreenEvent::CountdownTicked(countdown));
                Ok(None)
            }
            CountdownEvent::Ended => {
                self.apply(ScreenEvent::ElectionEnded);
                if self.transition_fired {
                    return Ok(None);
                }
                self.transition_fired = true;
                self.run_transition().await.map(Some)
            }
        }
    }

    async fn run_transition(&mut self) -> Result<TransitionOutcome, FlowError> {
        let election_id = self.state.election_id.clone();
        let outcome = end_election(
            &self.api,
            &self.store,
            &election_id,
            self.state.election.as_ref(),
        )
        .await;

        match &outcome {
            Ok(TransitionOutcome::Completed { route, .. }) => {
                self.apply(ScreenEvent::Navigated(route.clone()));
            }
            Ok(TransitionOutcome::StatusUpdateFailed { error }) => {
                self.apply(ScreenEvent::TransitionFailed {
                    message: error.to_string(),
                });
            }
            Err(e) if e.requires_login() => {
                self.apply(ScreenEvent::Navigated(Route::Login));
            }
            Err(e) => {
                self.apply(ScreenEvent::TransitionFailed {
                    message: e.to_string(),
                });
            }
        }
        outcome
    }

    /// Wait for updates until the lifecycle transition has run.
    ///
    /// `on_update` sees the state after every applied update. Fails with
    /// [`FlowError::NoCountdown`] if no timer is armed or the transition
    /// has already run for this election.
    pub async fn run_until_ended<F>(
        &mut self,
        mut on_update: F,
    ) -> Result<TransitionOutcome, FlowError>
    where
        F: FnMut(&ScreenState),
    {
        if self.countdown.is_none() || self.transition_fired {
            return Err(FlowError::NoCountdown);
        }

        while let Some(update) = self.next_update().await {
            let outcome = self.handle_update(update).await?;
            on_update(&self.state);
            if let Some(outcome) = outcome {
                return Ok(outcome);
            }
        }
        Err(FlowError::NoCountdown)
    }

    /// Show a different election. Stops the current timer; updates it
    /// already queued are discarded.
    pub fn set_election_id(&mut self, election_id: impl Into<String>) {
        let election_id = election_id.into();
        if election_id == self.state.election_id {
            return;
        }

        info!(
            event = "core.screen.election_changed",
            from = %self.state.election_id,
            to = %election_id
        );
        self.stop_countdown();
        self.generation += 1;
        self.armed = None;
        self.transition_fired = false;
        self.apply(ScreenEvent::Reset { election_id });
    }

    /// Start voting for a candidate: eligibility check, then self-vote guard.
    pub async fn start_vote(&mut self, candidate_id: &str) -> Result<VoteStart, FlowError> {
        if self.state.voter.is_none() {
            return Err(FlowError::NotLoaded);
        }
        if self.state.find_candidate(candidate_id).is_none() {
            return Err(FlowError::UnknownCandidate {
                candidate_id: candidate_id.to_string(),
            });
        }

        let election_id = self.state.election_id.clone();
        let check = match check_vote_status(
            &self.api,
            &mut self.store,
            &election_id,
            self.config.unknown_status,
        )
        .await
        {
            Ok(check) => check,
            Err(e) => {
                if e.requires_login() {
                    self.apply(ScreenEvent::Navigated(Route::Login));
                }
                return Err(e);
            }
        };

        self.apply(ScreenEvent::VoteStatusKnown {
            has_voted: matches!(check, crate::eligibility::VoteCheck::AlreadyVoted(_)),
        });
        if let Some(notice) = check.notice() {
            self.apply(ScreenEvent::NoticeShown(notice.clone()));
            return Ok(VoteStart::Blocked(notice.clone()));
        }

        let (Some(voter), Some(candidate)) = (
            self.state.voter.as_ref(),
            self.state.find_candidate(candidate_id),
        ) else {
            return Err(FlowError::NotLoaded);
        };

        match guard_vote(&mut self.store, &election_id, voter, candidate)? {
            GuardOutcome::SelfVote(notice) => {
                self.apply(ScreenEvent::NoticeShown(notice.clone()));
                Ok(VoteStart::Blocked(notice))
            }
            GuardOutcome::Proceed(route) => {
                self.apply(ScreenEvent::StepChanged(VoteStep::OtpValidation));
                self.apply(ScreenEvent::Navigated(route.clone()));
                Ok(VoteStart::Proceed(route))
            }
        }
    }

    /// Open a candidate's profile.
    pub fn view_profile(&mut self, candidate_id: &str) -> Result<Route, FlowError> {
        if self.state.find_candidate(candidate_id).is_none() {
            return Err(FlowError::UnknownCandidate {
                candidate_id: candidate_id.to_string(),
            });
        }
        let route = Route::Profile {
            election_id: self.state.election_id.clone(),
            candidate_id: candidate_id.to_string(),
        };
        self.apply(ScreenEvent::Navigated(route.clone()));
        Ok(route)
    }

    pub fn back_to_news(&mut self) -> Route {
        self.apply(ScreenEvent::Navigated(Route::News));
        Route::News
    }

    /// Acknowledge the open notice. Returns where it redirects, if anywhere.
    pub fn dismiss_notice(&mut self) -> Option<Route> {
        let redirect = self.state.notice.as_ref().and_then(|n| n.redirect.clone());
        self.apply(ScreenEvent::NoticeDismissed);
        redirect
    }

    /// Stop background work. Called when the screen goes away; dropping the
    /// controller has the same effect.
    pub fn teardown(&mut self) {
        debug!(
            event = "core.screen.teardown",
            election_id = %self.state.election_id
        );
        self.stop_countdown();
        self.armed = None;
    }
}
