//! Election countdown: remaining-time arithmetic, a latching deadline
//! monitor, and a cancellable tokio task that drives it.

pub mod clock;
pub mod monitor;
pub mod state;
pub mod task;

pub use clock::{Clock, ManualClock, SystemClock};
pub use monitor::{CountdownMonitor, Tick};
pub use state::CountdownState;
pub use task::{CountdownEvent, CountdownHandle, CountdownUpdate, spawn_countdown};
