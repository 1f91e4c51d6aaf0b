use crate::audio::ToneSink;
use crate::clock::{BeatLoop, CancelToken, SystemTimeSource, TimeSource};
use crate::config::GRACE_PERIOD;
use crate::event_loop::EngineMessage;
use crate::state::SharedState;
use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::{error, info, warn};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

struct ActiveRun {
    cancel: Arc<CancelToken>,
    // Disconnects when the loop thread returns.
    exited_rx: Receiver<()>,
    handle: JoinHandle<()>,
}

/// Starts and stops the background beat loop.
///
/// At most one loop is alive per scheduler. `start` and `stop` are both
/// idempotent and are meant to be called from the UI thread.
pub struct BeatScheduler {
    state: SharedState,
    tones: Arc<dyn ToneSink>,
    ui_tx: Sender<EngineMessage>,
    time: Arc<dyn TimeSource>,
    grace_period: Duration,
    measure_limit: Option<u64>,
    run: Option<ActiveRun>,
}

impl BeatScheduler {
    pub fn new(state: SharedState, tones: Arc<dyn ToneSink>, ui_tx: Sender<EngineMessage>) -> Self {
        Self::with_time_source(state, tones, ui_tx, Arc::new(SystemTimeSource))
    }

    pub fn with_time_source(
        state: SharedState,
        tones: Arc<dyn ToneSink>,
        ui_tx: Sender<EngineMessage>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            state,
            tones,
            ui_tx,
            time,
            grace_period: GRACE_PERIOD,
            measure_limit: None,
            run: None,
        }
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Makes every run end by itself after `measures` complete measures.
    pub fn with_measure_limit(mut self, measures: Option<u64>) -> Self {
        self.measure_limit = measures;
        self
    }

    pub fn run_state(&self) -> RunState {
        if self.run.is_some() {
            RunState::Running
        } else {
            RunState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Launches the loop on its own thread and returns immediately.
    pub fn start(&mut self) {
        if self.run.is_some() {
            return;
        }

        // A fresh token per run: a loop left over from a timed-out stop keeps
        // its raised flag and cannot be revived.
        let cancel = Arc::new(CancelToken::new());
        let (exited_tx, exited_rx) = bounded::<()>(0);

        let beat_loop = BeatLoop {
            state: self.state.clone(),
            tones: self.tones.clone(),
            ui_tx: self.ui_tx.clone(),
            time: self.time.clone(),
            cancel: cancel.clone(),
            measure_limit: self.measure_limit,
        };

        let spawned = thread::Builder::new()
            .name("beat-loop".to_string())
            .spawn(move || {
                let _exited = exited_tx;
                beat_loop.run();
            });

        match spawned {
            Ok(handle) => {
                self.state.set_running(true);
                self.run = Some(ActiveRun {
                    cancel,
                    exited_rx,
                    handle,
                });
                info!("Metronome started at {}", self.state.tempo());
            }
            Err(e) => error!("Failed to spawn beat loop thread: {}", e),
        }
    }

    /// Cancels the loop and waits up to the grace period for it to exit.
    pub fn stop(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };

        run.cancel.cancel();
        match run.exited_rx.recv_timeout(self.grace_period) {
            Err(RecvTimeoutError::Disconnected) | Ok(()) => {
                if run.handle.join().is_err() {
                    error!("Beat loop thread panicked");
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "Beat loop did not exit within {:?}, detaching it",
                    self.grace_period
                );
            }
        }

        self.state.set_running(false);
        info!("Metronome stopped");
    }
}

impl Drop for BeatScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentToneSink;
    use crate::state::MetronomeState;
    use crossbeam::channel::unbounded;

    fn scheduler() -> (BeatScheduler, Receiver<EngineMessage>) {
        let (tx, rx) = unbounded();
        let state = Arc::new(MetronomeState::default());
        (BeatScheduler::new(state, Arc::new(SilentToneSink), tx), rx)
    }

    #[test]
    fn test_starts_stopped() {
        let (scheduler, _rx) = scheduler();
        assert_eq!(scheduler.run_state(), RunState::Stopped);
    }

    #[test]
    fn test_start_and_stop_transitions() {
        let (mut scheduler, rx) = scheduler();
        scheduler.start();
        assert_eq!(scheduler.run_state(), RunState::Running);

        // The first tick fires immediately.
        let first = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(first, EngineMessage::Flash { downbeat: true }));

        scheduler.stop();
        assert_eq!(scheduler.run_state(), RunState::Stopped);
    }

    #[test]
    fn test_stop_when_stopped_is_noop() {
        let (mut scheduler, _rx) = scheduler();
        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());
    }
}
