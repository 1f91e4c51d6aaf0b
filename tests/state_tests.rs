use std::sync::Arc;
use std::thread;
use tempokeeper::meter::{Subdivision, Tempo, TimeSignature};
use tempokeeper::state::MetronomeState;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_initialization() {
        let state = MetronomeState::default();
        assert_eq!(state.tempo().bpm(), 80);
        assert_eq!(state.time_signature().numerator(), 4);
        assert_eq!(state.subdivision(), Subdivision::Quarter);
        assert!(!state.is_running());
    }

    #[test]
    fn test_parameter_updates() {
        let state = MetronomeState::default();

        state.set_tempo(Tempo::new(140));
        assert_eq!(state.tempo().bpm(), 140);

        state.set_time_signature(TimeSignature::new(6).unwrap());
        assert_eq!(state.time_signature().to_string(), "6/4");

        state.set_subdivision(Subdivision::Sixteenth);
        assert_eq!(state.subdivision().count(), 4);
    }

    #[test]
    fn test_tempo_stays_in_range() {
        let state = MetronomeState::default();
        state.set_tempo(Tempo::new(30));
        assert_eq!(state.tempo().bpm(), Tempo::MIN);
        state.set_tempo(Tempo::new(300));
        assert_eq!(state.tempo().bpm(), Tempo::MAX);
    }

    #[test]
    fn test_running_flag() {
        let state = MetronomeState::default();
        state.set_running(true);
        assert!(state.is_running());
        state.set_running(false);
        assert!(!state.is_running());
    }

    #[test]
    fn test_reader_sees_writer_updates_across_threads() {
        let state = Arc::new(MetronomeState::default());

        let writer_state = state.clone();
        let writer = thread::spawn(move || {
            for bpm in Tempo::MIN..=Tempo::MAX {
                writer_state.set_tempo(Tempo::new(bpm));
            }
        });

        // Every value a reader observes must be a valid tempo.
        for _ in 0..1000 {
            let bpm = state.tempo().bpm();
            assert!((Tempo::MIN..=Tempo::MAX).contains(&bpm));
        }

        writer.join().unwrap();
        assert_eq!(state.tempo().bpm(), Tempo::MAX);
    }
}
