// clock.rs

use crate::audio::ToneSink;
use crate::event_loop::EngineMessage;
use crate::meter::BeatCounter;
use crate::state::SharedState;
use crate::tempo::{Tone, ToneKind};
use crossbeam::channel::{bounded, Receiver, Sender};
use log::{debug, info, trace, warn};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancellation flag that also wakes a loop blocked in [`CancelToken::wait_timeout`].
pub struct CancelToken {
    cancelled: AtomicBool,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (wake_tx, wake_rx) = bounded(1);
        CancelToken {
            cancelled: AtomicBool::new(false),
            wake_tx,
            wake_rx,
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        let _ = self.wake_tx.try_send(());
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Blocks for up to `timeout`. Returns `true` as soon as the token is cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.is_cancelled() {
            return true;
        }
        match self.wake_rx.recv_timeout(timeout) {
            Ok(()) => true,
            Err(_) => self.is_cancelled(),
        }
    }
}

/// Where the beat loop gets the time from and how it sleeps
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Instant;

    /// Sleeps for `duration` unless `cancel` fires first. Returns `false` if
    /// the sleep was cut short by cancellation.
    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool;
}

/// The monotonic system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool {
        !cancel.wait_timeout(duration)
    }
}

/// A virtual clock that only moves when slept on or advanced.
///
/// Sleeping returns immediately after moving the clock forward, which lets a
/// full measure be simulated without waiting for it.
pub struct ManualTimeSource {
    origin: Instant,
    elapsed_nanos: AtomicU64,
}

impl Default for ManualTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualTimeSource {
    pub fn new() -> Self {
        ManualTimeSource {
            origin: Instant::now(),
            elapsed_nanos: AtomicU64::new(0),
        }
    }

    pub fn origin(&self) -> Instant {
        self.origin
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos.load(Ordering::SeqCst))
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed_nanos
            .fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        self.advance(duration);
        !cancel.is_cancelled()
    }
}

/// One run of the beat loop and everything it talks to.
pub struct BeatLoop {
    pub state: SharedState,
    pub tones: Arc<dyn ToneSink>,
    pub ui_tx: Sender<EngineMessage>,
    pub time: Arc<dyn TimeSource>,
    pub cancel: Arc<CancelToken>,
    /// Stop on its own after this many complete measures.
    pub measure_limit: Option<u64>,
}

impl BeatLoop {
    /// Runs until the cancel token fires or the UI queue goes away. With a
    /// measure limit set it also ends once the last measure has played out.
    ///
    /// Wake times accumulate against a fixed schedule (`next_time`), so sleep
    /// overshoot does not add up across ticks. Tempo and subdivision are
    /// re-read on every sub-tick; the numerator once per main beat.
    pub fn run(&self) {
        info!("Beat loop started");
        let mut beat = BeatCounter::new();
        let mut measures: u64 = 0;
        let mut next_time = self.time.now();

        loop {
            let numerator = self.state.time_signature().numerator();
            let mut sub_index = 0;

            loop {
                let subdivision = self.state.subdivision();
                if sub_index >= subdivision.count() {
                    break;
                }
                if self.cancel.is_cancelled() {
                    info!("Beat loop cancelled");
                    return;
                }

                let tempo = self.state.tempo();
                let sub_interval = tempo.sub_interval(subdivision);

                let now = self.time.now();
                if next_time > now && !self.time.sleep(next_time - now, &self.cancel) {
                    info!("Beat loop cancelled while waiting");
                    return;
                }

                // Half a sub-interval or more behind: drop the lost time
                // instead of firing the next tick right on top of this one.
                let fired_at = self.time.now();
                if fired_at >= next_time + sub_interval / 2 {
                    trace!("Beat loop behind by {:?}", fired_at - next_time);
                    next_time = fired_at;
                }

                let is_downbeat = beat.is_downbeat(sub_index);
                let is_main_tick = sub_index == 0;

                if is_main_tick
                    && self
                        .ui_tx
                        .send(EngineMessage::Flash {
                            downbeat: is_downbeat,
                        })
                        .is_err()
                {
                    warn!("UI queue closed, stopping beat loop");
                    return;
                }

                let tone = Tone::new(ToneKind::for_tick(is_downbeat, is_main_tick), tempo);
                if let Err(e) = self.tones.play(&tone) {
                    debug!("Tone dropped: {}", e);
                }
                trace!(
                    "Tick beat={} sub={}/{} tempo={}",
                    beat.current(),
                    sub_index + 1,
                    subdivision.count(),
                    tempo
                );

                next_time += sub_interval;
                sub_index += 1;
            }

            if beat.advance(numerator) {
                measures += 1;
                if self.measure_limit.map_or(false, |limit| measures >= limit) {
                    self.finish(measures, next_time);
                    return;
                }
            }
        }
    }

    /// Lets the last beat of the final measure run its full length, then
    /// reports the completed measures to the UI.
    fn finish(&self, measures: u64, end_time: Instant) {
        let now = self.time.now();
        if end_time > now && !self.time.sleep(end_time - now, &self.cancel) {
            info!("Beat loop cancelled while finishing");
            return;
        }
        info!("Beat loop finished after {} measures", measures);
        if self
            .ui_tx
            .send(EngineMessage::MeasuresComplete(measures))
            .is_err()
        {
            warn!("UI queue closed before measures were reported");
        }
    }
}
