//! Headless beat display
//!
//! Used with `--headless`: no terminal UI, the current beat of the measure is
//! drawn on an indicatif progress bar on stderr.

mod headless;
mod progress;

pub use headless::run_headless;
pub use progress::create_beat_progress;
