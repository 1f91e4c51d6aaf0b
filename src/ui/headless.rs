use super::progress::create_beat_progress;
use crate::config::UI_POLL_INTERVAL;
use crate::display::tempo_label;
use crate::event_loop::EventLoop;
use crate::tempo::TempoMarking;
use log::info;

/// Drives the event loop without a terminal UI until quit, or until the
/// scheduler stops on its own after its measure limit.
pub fn run_headless(event_loop: &mut EventLoop) {
    let state = event_loop.shared_state().clone();
    let pb = create_beat_progress(state.time_signature());
    let mut last_position = None;

    while event_loop.step(UI_POLL_INTERVAL) {
        if !event_loop.is_running() {
            info!("Metronome stopped, leaving headless mode");
            break;
        }

        let position = event_loop.beat_position();
        if last_position != Some(position) {
            let tempo = state.tempo();
            pb.set_length(u64::from(state.time_signature().numerator()));
            pb.set_position(u64::from(position));
            pb.set_message(format!(
                "{} {} {} {}",
                tempo_label(tempo),
                TempoMarking::from(tempo),
                state.time_signature(),
                state.subdivision()
            ));
            last_position = Some(position);
        }
    }

    pb.finish_with_message(format!("{} measures", event_loop.completed_measures()));
}
