use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::state::CountdownState;
use crate::elections::Election;

/// Outcome of evaluating the countdown at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Time remains; publish this state.
    Running(CountdownState),
    /// The deadline has just passed. Returned exactly once per monitor.
    Expired,
    /// The deadline passed on an earlier tick; nothing to do.
    Stopped,
}

/// Pure countdown state machine for a single election deadline.
///
/// Once the deadline is reached the monitor latches: every later call to
/// [`CountdownMonitor::tick`] returns [`Tick::Stopped`], even if the clock
/// moves backwards.
#[derive(Debug, Clone)]
pub struct CountdownMonitor {
    election_id: String,
    end_time: DateTime<Utc>,
    expired: bool,
}

impl CountdownMonitor {
    pub fn new(election_id: impl Into<String>, end_time: DateTime<Utc>) -> Self {
        Self {
            election_id: election_id.into(),
            end_time,
            expired: false,
        }
    }

    /// Build a monitor for an election, or `None` if it has no deadline.
    pub fn for_election(election_id: &str, election: &Election) -> Option<Self> {
        election
            .end_time()
            .map(|end_time| Self::new(election_id, end_time))
    }

    pub fn election_id(&self) -> &str {
        &self.election_id
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> Tick {
        if self.expired {
            return Tick::Stopped;
        }

        let remaining_ms = (self.end_time - now).num_milliseconds();
        if remaining_ms <= 0 {
            self.expired = true;
            info!(
                event = "core.countdown.expired",
                election_id = %self.election_id,
                end_time = %self.end_time,
            );
            return Tick::Expired;
        }

        let state = CountdownState::from_remaining_millis(remaining_ms);
        debug!(
            event = "core.countdown.ticked",
            election_id = %self.election_id,
            remaining = %state,
        );
        Tick::Running(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn one_hour_election() -> Election {
        Election {
            election_id: Some("12".to_string()),
            election_name: "SRC".to_string(),
            faculty_name: "Science".to_string(),
            start_date: Some(start()),
            duration: Some(60),
            status: Default::default(),
        }
    }

    #[test]
    fn test_running_state_one_second_before_deadline() {
        let mut monitor = CountdownMonitor::for_election("12", &one_hour_election()).unwrap();
        let tick = monitor.tick(start() + Duration::minutes(59) + Duration::seconds(59));
        assert_eq!(tick, Tick::Running(CountdownState::from_remaining_seconds(1)));

        let tick = monitor.tick(start() + Duration::seconds(1));
        match tick {
            Tick::Running(state) => assert_eq!(state.to_string(), "00:59:59"),
            other => panic!("expected running, got {:?}", other),
        }
    }

    #[test]
    fn test_expires_exactly_once_at_deadline() {
        let mut monitor = CountdownMonitor::for_election("12", &one_hour_election()).unwrap();
        let deadline = start() + Duration::minutes(60);

        assert_eq!(monitor.tick(deadline), Tick::Expired);
        assert!(monitor.is_expired());

        for offset in [0, 1, 60, 3600] {
            assert_eq!(
                monitor.tick(deadline + Duration::seconds(offset)),
                Tick::Stopped
            );
        }
    }

    #[test]
    fn test_does_not_resume_when_clock_moves_back() {
        let mut monitor = CountdownMonitor::new("12", start());
        assert_eq!(monitor.tick(start() + Duration::seconds(5)), Tick::Expired);
        assert_eq!(monitor.tick(start() - Duration::hours(1)), Tick::Stopped);
    }

    #[test]
    fn test_partial_second_remaining_is_still_running() {
        let mut monitor = CountdownMonitor::new("12", start());
        let tick = monitor.tick(start() - Duration::milliseconds(400));
        assert_eq!(tick, Tick::Running(CountdownState::ZERO));
        assert!(!monitor.is_expired());
    }

    #[test]
    fn test_no_monitor_without_deadline() {
        let mut election = one_hour_election();
        election.duration = None;
        assert!(CountdownMonitor::for_election("12", &election).is_none());
    }
}
