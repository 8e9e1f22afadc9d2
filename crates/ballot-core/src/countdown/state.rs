use serde::{Deserialize, Serialize};

/// Whole hours, minutes and seconds left before an election closes.
///
/// Derived on every tick and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountdownState {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl CountdownState {
    /// Countdown shown once the election has closed.
    pub const ZERO: CountdownState = CountdownState {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Decompose a whole number of remaining seconds.
    ///
    /// Hours are not wrapped, so an election longer than a day shows e.g. `26:00:00`.
    pub fn from_remaining_seconds(total_seconds: u64) -> Self {
        let total_minutes = total_seconds / 60;
        Self {
            hours: total_minutes / 60,
            minutes: total_minutes % 60,
            seconds: total_seconds % 60,
        }
    }

    /// Decompose a remaining duration in milliseconds, truncating partial seconds.
    ///
    /// Negative input clamps to zero.
    pub fn from_remaining_millis(millis: i64) -> Self {
        let millis = u64::try_from(millis).unwrap_or(0);
        Self::from_remaining_seconds(millis / 1000)
    }

    pub fn total_seconds(&self) -> u64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl std::fmt::Display for CountdownState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}
