use crate::meter::TimeSignature;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

pub fn create_beat_progress(time_signature: TimeSignature) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(
        Some(u64::from(time_signature.numerator())),
        ProgressDrawTarget::stderr(),
    );
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{prefix:.bold} [{bar:24.yellow}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▊ "),
    );
    pb.set_prefix("Beat");
    pb
}
