//! Display-side state for the flashing beat indicator.
//!
//! Owned by the UI thread. The beat loop never touches it; it posts
//! `EngineMessage::Flash` and the event loop applies it here.

use crate::config::FLASH_HOLD;
use crate::meter::Tempo;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorColor {
    Neutral,
    Downbeat,
    Beat,
}

impl IndicatorColor {
    /// Neutral `#D3D3D3`, downbeat gold `#FFD700`, beat pale gold `#EEE8AA`.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            IndicatorColor::Neutral => (0xD3, 0xD3, 0xD3),
            IndicatorColor::Downbeat => (0xFF, 0xD7, 0x00),
            IndicatorColor::Beat => (0xEE, 0xE8, 0xAA),
        }
    }
}

/// Background colour of the tempo display with a pending reversion deadline
#[derive(Debug)]
pub struct FlashIndicator {
    color: IndicatorColor,
    revert_at: Option<Instant>,
    hold: Duration,
}

impl Default for FlashIndicator {
    fn default() -> Self {
        Self::new(FLASH_HOLD)
    }
}

impl FlashIndicator {
    pub fn new(hold: Duration) -> Self {
        FlashIndicator {
            color: IndicatorColor::Neutral,
            revert_at: None,
            hold,
        }
    }

    pub fn color(&self) -> IndicatorColor {
        self.color
    }

    /// Sets the accent colour and schedules the return to neutral.
    pub fn flash(&mut self, downbeat: bool, now: Instant) {
        self.color = if downbeat {
            IndicatorColor::Downbeat
        } else {
            IndicatorColor::Beat
        };
        self.revert_at = Some(now + self.hold);
    }

    /// Applies a due reversion. Returns true if the colour changed.
    pub fn refresh(&mut self, now: Instant) -> bool {
        match self.revert_at {
            Some(deadline) if now >= deadline => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.color = IndicatorColor::Neutral;
        self.revert_at = None;
    }
}

pub fn tempo_label(tempo: Tempo) -> String {
    format!("{} bpm", tempo.bpm())
}
