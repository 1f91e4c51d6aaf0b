use crate::meter::{Subdivision, Tempo, TimeSignature};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

/// Live metronome parameters shared between the UI thread and the beat loop.
///
/// Each value is its own atomic scalar. The UI thread is the only writer of
/// tempo, signature and subdivision; the scheduler owns the running flag.
/// A reader may see one field updated before another; the worst case is one
/// tick played with a stale value.
pub struct MetronomeState {
    bpm: AtomicU32,
    numerator: AtomicU32,
    subdivision: AtomicU32,
    is_running: AtomicBool,
}

pub type SharedState = Arc<MetronomeState>;

impl Default for MetronomeState {
    fn default() -> Self {
        Self::new(Tempo::default(), TimeSignature::default(), Subdivision::default())
    }
}

impl MetronomeState {
    pub fn new(tempo: Tempo, time_signature: TimeSignature, subdivision: Subdivision) -> Self {
        Self {
            bpm: AtomicU32::new(tempo.bpm()),
            numerator: AtomicU32::new(time_signature.numerator()),
            subdivision: AtomicU32::new(subdivision.count()),
            is_running: AtomicBool::new(false),
        }
    }

    pub fn tempo(&self) -> Tempo {
        Tempo::new(self.bpm.load(Ordering::SeqCst))
    }

    pub fn set_tempo(&self, tempo: Tempo) {
        self.bpm.store(tempo.bpm(), Ordering::SeqCst);
    }

    pub fn time_signature(&self) -> TimeSignature {
        TimeSignature::new(self.numerator.load(Ordering::SeqCst)).unwrap_or_default()
    }

    pub fn set_time_signature(&self, time_signature: TimeSignature) {
        self.numerator
            .store(time_signature.numerator(), Ordering::SeqCst);
    }

    pub fn subdivision(&self) -> Subdivision {
        Subdivision::from_count(self.subdivision.load(Ordering::SeqCst)).unwrap_or_default()
    }

    pub fn set_subdivision(&self, subdivision: Subdivision) {
        self.subdivision.store(subdivision.count(), Ordering::SeqCst);
    }

    pub fn set_running(&self, running: bool) {
        self.is_running.store(running, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }
}
