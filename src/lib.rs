pub mod audio;
pub mod cli;
pub mod clock;
pub mod config;
pub mod display;
pub mod event_loop;
pub mod logging;
pub mod meter;
pub mod scheduler;
pub mod state;
pub mod tempo;
pub mod tui;
pub mod ui;

pub use cli::Args;
pub use scheduler::{BeatScheduler, RunState};
pub use state::{MetronomeState, SharedState};

use meter::{Subdivision, Tempo, TimeSignature};
use std::sync::Arc;

pub fn create_shared_state(
    tempo: Tempo,
    time_signature: TimeSignature,
    subdivision: Subdivision,
) -> SharedState {
    Arc::new(MetronomeState::new(tempo, time_signature, subdivision))
}
