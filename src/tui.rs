mod input;

pub use input::map_key_event;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use crossbeam::channel::Sender;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::error::Error;
use std::io;
use std::time::Instant;

use crate::config::UI_POLL_INTERVAL;
use crate::display::{tempo_label, IndicatorColor};
use crate::event_loop::{EngineMessage, EventLoop};
use crate::tempo::TempoMarking;

fn indicator_style(color: IndicatorColor) -> Style {
    let (r, g, b) = color.rgb();
    Style::default()
        .bg(Color::Rgb(r, g, b))
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

fn render_ui(f: &mut Frame, event_loop: &EventLoop) {
    let size = f.size();
    let state = event_loop.shared_state();
    let tempo = state.tempo();
    let time_signature = state.time_signature();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(5), // Tempo display
            Constraint::Length(7), // Settings
            Constraint::Min(1),    // Controls
        ])
        .split(size);

    let title_block = Block::default()
        .title("Tempokeeper")
        .borders(Borders::ALL);
    f.render_widget(title_block, chunks[0]);

    let tempo_text = vec![
        Line::from(""),
        Line::from(Span::raw(tempo_label(tempo))),
        Line::from(Span::raw(TempoMarking::from(tempo).name())),
    ];
    let tempo_display = Paragraph::new(tempo_text)
        .alignment(Alignment::Center)
        .style(indicator_style(event_loop.indicator().color()))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(tempo_display, chunks[1]);

    let status = if event_loop.is_running() {
        "Running"
    } else {
        "Stopped"
    };
    let beat = if event_loop.beat_position() == 0 {
        "-".to_string()
    } else {
        format!("{}/{}", event_loop.beat_position(), time_signature.numerator())
    };
    let settings = format!(
        "Time signature: {}\nSubdivision: {}\nStatus: {}\nBeat: {}\nMeasures: {}",
        time_signature,
        state.subdivision(),
        status,
        beat,
        event_loop.completed_measures()
    );
    let settings_block = Block::default().title("Metronome").borders(Borders::ALL);
    let settings_text = Paragraph::new(settings)
        .style(Style::default().fg(Color::Green))
        .block(settings_block);
    f.render_widget(settings_text, chunks[2]);

    let instructions = Paragraph::new(vec![
        Line::from("Space: Start/Stop | S: Stop | Q: Quit"),
        Line::from("Up/Down: ±1 bpm | PgUp/PgDn: ±10 bpm"),
        Line::from("T: Time signature | 1-4 or Tab: Subdivision"),
    ])
    .style(Style::default().fg(Color::Yellow));
    let instructions_block = Block::default().title("Controls").borders(Borders::ALL);
    f.render_widget(instructions.block(instructions_block), chunks[3]);
}

fn handle_terminal_event(
    message_tx: &Sender<EngineMessage>,
) -> Result<(), Box<dyn Error>> {
    if event::poll(UI_POLL_INTERVAL)? {
        if let Event::Key(key_event) = event::read()? {
            log::debug!("Key event received: {:?}", key_event);
            if let Some(message) = map_key_event(key_event) {
                message_tx.send(message)?;
            }
        }
    }
    Ok(())
}

fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    event_loop: &mut EventLoop,
    message_tx: &Sender<EngineMessage>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| render_ui(f, event_loop))?;
        handle_terminal_event(message_tx)?;
        if !event_loop.pump(Instant::now()) {
            return Ok(());
        }
    }
}

/// Runs the control panel until the user quits. The terminal is restored on
/// every exit path.
pub fn run_tui_event_loop(
    event_loop: &mut EventLoop,
    message_tx: Sender<EngineMessage>,
) -> Result<(), Box<dyn Error>> {
    log::info!("Starting TUI event loop");
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, event_loop, &message_tx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    log::info!("Terminal cleaned up, exiting TUI event loop");
    result
}
