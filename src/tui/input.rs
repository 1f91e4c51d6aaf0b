use crate::event_loop::{EngineMessage, TransportAction};
use crate::meter::Subdivision;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

pub fn map_key_event(key: KeyEvent) -> Option<EngineMessage> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Char(' ') => Some(EngineMessage::TransportCommand(TransportAction::Toggle)),
        KeyCode::Enter => Some(EngineMessage::TransportCommand(TransportAction::Start)),
        KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(EngineMessage::TransportCommand(TransportAction::Stop))
        }
        KeyCode::Up | KeyCode::Right => Some(EngineMessage::AdjustTempo(1)),
        KeyCode::Down | KeyCode::Left => Some(EngineMessage::AdjustTempo(-1)),
        KeyCode::PageUp => Some(EngineMessage::AdjustTempo(10)),
        KeyCode::PageDown => Some(EngineMessage::AdjustTempo(-10)),
        KeyCode::Char('t') | KeyCode::Char('T') => Some(EngineMessage::CycleTimeSignature),
        KeyCode::Tab => Some(EngineMessage::CycleSubdivision),
        KeyCode::Char(c @ '1'..='4') => c
            .to_digit(10)
            .and_then(Subdivision::from_count)
            .map(EngineMessage::SetSubdivision),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(EngineMessage::Quit),
        _ => None,
    }
}
