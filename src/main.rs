use clap::Parser;
use crossbeam::channel::unbounded;
use std::sync::Arc;
use std::time::Instant;
use tempokeeper::{
    audio::{AudioOutput, RodioToneSink, SilentToneSink, ToneSink},
    config::Config,
    create_shared_state,
    event_loop::{EngineMessage, EventLoop, TransportAction},
    logging, tui, ui, Args, BeatScheduler,
};

fn main() {
    let args = parse_command_line_arguments();
    initialize_logging(args.headless);

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => exit_with_error(&e.to_string()),
    };

    // The stream must outlive the event loop or every tone goes silent.
    let (_audio_output, tones) = open_audio(config.mute);

    let shared_state = create_shared_state(config.tempo, config.time_signature, config.subdivision);
    let (message_tx, message_rx) = unbounded();
    let scheduler = BeatScheduler::new(shared_state.clone(), tones, message_tx.clone())
        .with_measure_limit(config.measures);
    let mut event_loop = EventLoop::new(shared_state, scheduler, message_rx);

    if config.autostart {
        event_loop.handle(
            EngineMessage::TransportCommand(TransportAction::Start),
            Instant::now(),
        );
    }

    if config.headless {
        ui::run_headless(&mut event_loop);
    } else if let Err(e) = tui::run_tui_event_loop(&mut event_loop, message_tx) {
        exit_with_error(&format!("Terminal UI error: {}", e));
    }

    log::info!("Application exiting");
}

fn parse_command_line_arguments() -> Args {
    Args::parse()
}

fn initialize_logging(headless: bool) {
    let result = if headless {
        logging::init_stderr_logger()
    } else {
        logging::init_file_logger()
    };
    if let Err(e) = result {
        eprintln!("Logging disabled: {}", e);
    }
    log::info!("Application starting");
}

fn open_audio(mute: bool) -> (Option<AudioOutput>, Arc<dyn ToneSink>) {
    if mute {
        log::info!("Audio muted");
        return (None, Arc::new(SilentToneSink));
    }
    match RodioToneSink::open_default() {
        Ok((output, sink)) => (Some(output), Arc::new(sink)),
        Err(e) => {
            log::warn!("{}, continuing without sound", e);
            (None, Arc::new(SilentToneSink))
        }
    }
}

fn exit_with_error(msg: &str) -> ! {
    log::error!("{}", msg);
    eprintln!("{}", msg);
    std::process::exit(1);
}
