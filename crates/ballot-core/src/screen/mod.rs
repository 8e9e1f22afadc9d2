//! The election screen: state, the events that change it, a pure reducer,
//! and the controller that drives it from API results and the countdown.

pub mod controller;
pub mod events;
pub mod reducer;
pub mod state;

pub use controller::{ElectionScreen, ScreenConfig, VoteStart};
pub use events::ScreenEvent;
pub use reducer::reduce;
pub use state::{
    ELECTION_FETCH_FAILED_MESSAGE, NO_CANDIDATES_MESSAGE, Phase, ScreenState, VoteStep,
};
