extern crate tempokeeper;

use crossbeam::channel::unbounded;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempokeeper::audio::SilentToneSink;
use tempokeeper::display::IndicatorColor;
use tempokeeper::event_loop::{EngineMessage, EventLoop, TransportAction};
use tempokeeper::meter::{Subdivision, Tempo, TimeSignature};
use tempokeeper::{create_shared_state, BeatScheduler};

fn event_loop(bpm: u32, numerator: u32) -> (EventLoop, crossbeam::channel::Sender<EngineMessage>) {
    let shared_state = create_shared_state(
        Tempo::new(bpm),
        TimeSignature::new(numerator).unwrap(),
        Subdivision::Quarter,
    );
    let (engine_tx, engine_rx) = unbounded();
    let scheduler = BeatScheduler::new(
        shared_state.clone(),
        Arc::new(SilentToneSink),
        engine_tx.clone(),
    );
    (EventLoop::new(shared_state, scheduler, engine_rx), engine_tx)
}

#[test]
fn integration_test_start_flash_and_revert() {
    let (mut event_loop, engine_tx) = event_loop(120, 4);

    engine_tx
        .send(EngineMessage::TransportCommand(TransportAction::Start))
        .unwrap();
    // Start is handled; the first flash is posted immediately by the loop.
    assert!(event_loop.step(Duration::from_millis(10)));
    assert!(event_loop.is_running());

    let deadline = Instant::now() + Duration::from_secs(1);
    while event_loop.beat_position() == 0 && Instant::now() < deadline {
        event_loop.step(Duration::from_millis(5));
    }
    assert_eq!(event_loop.beat_position(), 1);

    // The flash reverts to neutral 70 ms later without blocking the loop.
    event_loop.pump(Instant::now() + Duration::from_millis(80));
    assert_eq!(event_loop.indicator().color(), IndicatorColor::Neutral);

    engine_tx.send(EngineMessage::Quit).unwrap();
    assert!(!event_loop.step(Duration::from_millis(10)));
    assert!(!event_loop.is_running());
}

#[test]
fn integration_test_downbeat_flash_color() {
    let (mut event_loop, _engine_tx) = event_loop(120, 4);
    let now = Instant::now();
    event_loop.handle(EngineMessage::TransportCommand(TransportAction::Start), now);

    event_loop.handle(EngineMessage::Flash { downbeat: true }, now);
    assert_eq!(event_loop.indicator().color(), IndicatorColor::Downbeat);
    event_loop.handle(EngineMessage::Flash { downbeat: false }, now);
    assert_eq!(event_loop.indicator().color(), IndicatorColor::Beat);

    event_loop.handle(EngineMessage::TransportCommand(TransportAction::Stop), now);
    assert_eq!(event_loop.indicator().color(), IndicatorColor::Neutral);
}

#[test]
fn integration_test_counts_measures() {
    // 2/4 at 220 bpm: one measure every ~545 ms.
    let (mut event_loop, engine_tx) = event_loop(220, 2);
    engine_tx
        .send(EngineMessage::TransportCommand(TransportAction::Toggle))
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(3);
    while event_loop.completed_measures() < 2 && Instant::now() < deadline {
        event_loop.step(Duration::from_millis(5));
    }
    assert!(event_loop.completed_measures() >= 2);
    assert_eq!(event_loop.beat_position(), 1);

    engine_tx
        .send(EngineMessage::TransportCommand(TransportAction::Toggle))
        .unwrap();
    event_loop.step(Duration::from_millis(10));
    assert!(!event_loop.is_running());
    assert!(!event_loop.shared_state().is_running());
}

#[test]
fn integration_test_live_tempo_change_reaches_running_loop() {
    let (mut event_loop, engine_tx) = event_loop(40, 4);
    engine_tx
        .send(EngineMessage::TransportCommand(TransportAction::Start))
        .unwrap();
    engine_tx.send(EngineMessage::AdjustTempo(180)).unwrap();
    event_loop.step(Duration::from_millis(10));
    assert_eq!(event_loop.shared_state().tempo().bpm(), 220);

    // At 40 bpm the second beat would come 1.5 s later. The new tempo is only
    // picked up after that first wait, so allow for it before counting fast beats.
    let deadline = Instant::now() + Duration::from_secs(3);
    while event_loop.beat_position() < 4 && Instant::now() < deadline {
        event_loop.step(Duration::from_millis(5));
    }
    assert_eq!(event_loop.beat_position(), 4);

    engine_tx.send(EngineMessage::Quit).unwrap();
    assert!(!event_loop.step(Duration::from_millis(10)));
    assert!(event_loop.quit_requested());
}
