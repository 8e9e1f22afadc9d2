//! Periodic driver for a [`CountdownMonitor`].
//!
//! The task runs on the tokio runtime, ticks at a fixed interval and
//! publishes [`CountdownUpdate`]s on a channel. It exits after the
//! deadline passes, when the receiver is dropped, or when its
//! [`CountdownHandle`] is stopped or dropped.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::clock::Clock;
use super::monitor::{CountdownMonitor, Tick};
use super::state::CountdownState;

/// What a countdown task reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    Tick(CountdownState),
    /// The deadline passed. Sent once, after which the task exits.
    Ended,
}

/// A message from one armed countdown.
///
/// `generation` identifies the arming that produced the update so that a
/// consumer can drop messages from a timer it has already replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownUpdate {
    pub generation: u64,
    pub election_id: String,
    pub event: CountdownEvent,
}

/// Handle to a running countdown task. Dropping it cancels the task.
#[derive(Debug)]
pub struct CountdownHandle {
    generation: u64,
    election_id: String,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn election_id(&self) -> &str {
        &self.election_id
    }

    /// Cancel the task. After this returns the task sends no further updates
    /// except one that was already being sent concurrently.
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            debug!(
                event = "core.countdown.stop_requested",
                election_id = %self.election_id,
                generation = self.generation,
            );
        }
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawn a countdown task for `monitor`.
///
/// The first tick is evaluated immediately, then every `period`.
/// Must be called from within a tokio runtime.
pub fn spawn_countdown<C: Clock>(
    mut monitor: CountdownMonitor,
    clock: C,
    period: Duration,
    generation: u64,
    updates: UnboundedSender<CountdownUpdate>,
) -> CountdownHandle {
    let cancel = CancellationToken::new();
    let election_id = monitor.election_id().to_string();

    info!(
        event = "core.countdown.armed",
        election_id = %election_id,
        generation = generation,
        end_time = %monitor.end_time(),
        period_ms = period.as_millis() as u64,
    );

    let task_cancel = cancel.clone();
    let task_election_id = election_id.clone();
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = task_cancel.cancelled() => {
                    debug!(
                        event = "core.countdown.cancelled",
                        election_id = %task_election_id,
                        generation = generation,
                    );
                    break;
                }
                _ = ticker.tick() => {}
            }

            let event = match monitor.tick(clock.now()) {
                Tick::Running(state) => CountdownEvent::Tick(state),
                Tick::Expired => CountdownEvent::Ended,
                Tick::Stopped => break,
            };

            let update = CountdownUpdate {
                generation,
                election_id: task_election_id.clone(),
                event,
            };
            if updates.send(update).is_err() {
                debug!(
                    event = "core.countdown.receiver_dropped",
                    election_id = %task_election_id,
                );
                break;
            }
            if event == CountdownEvent::Ended {
                break;
            }
        }
    });

    CountdownHandle {
        generation,
        election_id,
        cancel,
        task,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::clock::ManualClock;
    use chrono::{TimeZone, Utc};
    use tokio::sync::mpsc;

    fn deadline() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_then_ends_once() {
        let clock = ManualClock::new(deadline() - chrono::Duration::seconds(2));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_countdown(
            CountdownMonitor::new("12", deadline()),
            clock.clone(),
            Duration::from_secs(1),
            1,
            tx,
        );

        let first = rx.recv().await.unwrap();
        assert_eq!(first.generation, 1);
        assert_eq!(first.election_id, "12");
        assert_eq!(
            first.event,
            CountdownEvent::Tick(CountdownState::from_remaining_seconds(2))
        );

        clock.advance(chrono::Duration::seconds(1));
        let second = rx.recv().await.unwrap();
        assert_eq!(
            second.event,
            CountdownEvent::Tick(CountdownState::from_remaining_seconds(1))
        );

        clock.advance(chrono::Duration::seconds(1));
        let third = rx.recv().await.unwrap();
        assert_eq!(third.event, CountdownEvent::Ended);

        // Task exits after ending; the channel closes with no further updates.
        assert!(rx.recv().await.is_none());
        tokio::task::yield_now().await;
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_before_deadline() {
        let clock = ManualClock::new(deadline() - chrono::Duration::seconds(5));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_countdown(
            CountdownMonitor::new("12", deadline()),
            clock.clone(),
            Duration::from_secs(1),
            3,
            tx,
        );

        assert!(matches!(
            rx.recv().await.unwrap().event,
            CountdownEvent::Tick(_)
        ));

        handle.stop();
        clock.set(deadline() + chrono::Duration::minutes(1));
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert!(rx.recv().await.is_none(), "no update after stop");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_task() {
        let clock = ManualClock::new(deadline() - chrono::Duration::seconds(5));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_countdown(
            CountdownMonitor::new("12", deadline()),
            clock,
            Duration::from_secs(1),
            1,
            tx,
        );
        let _ = rx.recv().await;
        drop(handle);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_past_deadline_ends_on_first_tick() {
        let clock = ManualClock::new(deadline() + chrono::Duration::hours(2));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _handle = spawn_countdown(
            CountdownMonitor::new("12", deadline()),
            clock,
            Duration::from_secs(1),
            1,
            tx,
        );

        assert_eq!(rx.recv().await.unwrap().event, CountdownEvent::Ended);
        assert!(rx.recv().await.is_none());
    }
}
