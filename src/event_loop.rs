// event_loop.rs

use crate::display::FlashIndicator;
use crate::meter::{Subdivision, Tempo, TimeSignature};
use crate::scheduler::BeatScheduler;
use crate::state::SharedState;
use crossbeam::channel::{Receiver, RecvTimeoutError, TryRecvError};
use log::{debug, info};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportAction {
    Start,
    Stop,
    Toggle,
}

/// Everything posted to the UI thread: flashes from the beat loop and
/// commands from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMessage {
    Flash { downbeat: bool },
    /// The loop reached its measure limit and has exited.
    MeasuresComplete(u64),
    TransportCommand(TransportAction),
    AdjustTempo(i32),
    CycleTimeSignature,
    CycleSubdivision,
    SetSubdivision(Subdivision),
    Quit,
}

/// UI-thread side of the metronome. All display state is mutated here.
pub struct EventLoop {
    shared_state: SharedState,
    scheduler: BeatScheduler,
    engine_rx: Receiver<EngineMessage>,
    indicator: FlashIndicator,
    beat_position: u32,
    completed_measures: u64,
    quit: bool,
}

impl EventLoop {
    pub fn new(
        shared_state: SharedState,
        scheduler: BeatScheduler,
        engine_rx: Receiver<EngineMessage>,
    ) -> Self {
        EventLoop {
            shared_state,
            scheduler,
            engine_rx,
            indicator: FlashIndicator::default(),
            beat_position: 0,
            completed_measures: 0,
            quit: false,
        }
    }

    pub fn shared_state(&self) -> &SharedState {
        &self.shared_state
    }

    pub fn indicator(&self) -> &FlashIndicator {
        &self.indicator
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Beat of the most recent flash, 0 before the first flash of a run.
    pub fn beat_position(&self) -> u32 {
        self.beat_position
    }

    /// Measures completed in the current run.
    pub fn completed_measures(&self) -> u64 {
        self.completed_measures
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn handle(&mut self, msg: EngineMessage, now: Instant) {
        match msg {
            EngineMessage::Flash { downbeat } => self.on_flash(downbeat, now),
            EngineMessage::MeasuresComplete(measures) => self.on_measures_complete(measures),
            EngineMessage::TransportCommand(action) => self.on_transport(action),
            EngineMessage::AdjustTempo(delta) => {
                self.set_tempo(self.shared_state.tempo().adjust(delta));
            }
            EngineMessage::CycleTimeSignature => {
                self.set_time_signature(self.shared_state.time_signature().next());
            }
            EngineMessage::CycleSubdivision => {
                self.set_subdivision(self.shared_state.subdivision().next());
            }
            EngineMessage::SetSubdivision(sub) => self.set_subdivision(sub),
            EngineMessage::Quit => {
                info!("Quit requested");
                self.scheduler.stop();
                self.quit = true;
            }
        }
    }

    /// Drains the queue without blocking and applies due flash reversions.
    /// Returns false once quit has been requested.
    pub fn pump(&mut self, now: Instant) -> bool {
        loop {
            match self.engine_rx.try_recv() {
                Ok(msg) => self.handle(msg, now),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        self.indicator.refresh(now);
        !self.quit
    }

    /// Blocks up to `timeout` for the next message, then pumps.
    pub fn step(&mut self, timeout: Duration) -> bool {
        match self.engine_rx.recv_timeout(timeout) {
            Ok(msg) => self.handle(msg, Instant::now()),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {}
        }
        self.pump(Instant::now())
    }

    fn on_flash(&mut self, downbeat: bool, now: Instant) {
        // Flashes still queued from a stopped run are stale.
        if !self.scheduler.is_running() {
            return;
        }
        if downbeat {
            if self.beat_position > 0 {
                self.completed_measures += 1;
            }
            self.beat_position = 1;
        } else {
            self.beat_position += 1;
        }
        self.indicator.flash(downbeat, now);
    }

    fn on_measures_complete(&mut self, measures: u64) {
        if !self.scheduler.is_running() {
            return;
        }
        info!("Played {} measures", measures);
        self.completed_measures = measures;
        self.on_transport(TransportAction::Stop);
    }

    fn on_transport(&mut self, action: TransportAction) {
        let start = match action {
            TransportAction::Start => true,
            TransportAction::Stop => false,
            TransportAction::Toggle => !self.scheduler.is_running(),
        };
        if start {
            if !self.scheduler.is_running() {
                self.beat_position = 0;
                self.completed_measures = 0;
            }
            self.scheduler.start();
        } else {
            self.scheduler.stop();
            self.indicator.reset();
        }
    }

    fn set_tempo(&mut self, tempo: Tempo) {
        self.shared_state.set_tempo(tempo);
        debug!("Tempo set to {}", tempo);
    }

    fn set_time_signature(&mut self, sig: TimeSignature) {
        self.shared_state.set_time_signature(sig);
        debug!("Time signature set to {}", sig);
    }

    fn set_subdivision(&mut self, sub: Subdivision) {
        self.shared_state.set_subdivision(sub);
        debug!("Subdivision set to {}", sub);
    }
}
