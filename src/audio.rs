//! Tone emission for the beat loop.
//!
//! The loop only sees the [`ToneSink`] trait. [`RodioToneSink`] renders a
//! short sine burst onto the default output device, [`SilentToneSink`] is used
//! when sound is muted or no device is available.

use crate::tempo::Tone;
use log::{debug, info};
use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamHandle};
use std::error::Error;
use std::fmt;

/// Errors raised while producing a tone
#[derive(Debug)]
pub enum AudioError {
    /// No output device could be opened
    NoDevice(String),
    /// The device refused or dropped the tone
    Playback(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::NoDevice(msg) => write!(f, "audio device unavailable: {}", msg),
            AudioError::Playback(msg) => write!(f, "audio playback error: {}", msg),
        }
    }
}

impl Error for AudioError {}

/// Something that can sound a tone without blocking the caller
pub trait ToneSink: Send + Sync {
    fn play(&self, tone: &Tone) -> Result<(), AudioError>;
}

/// Keeps the output stream alive. Must stay on the thread that opened it.
pub struct AudioOutput {
    _stream: OutputStream,
}

/// Plays tones on the default output device through rodio's mixer
#[derive(Clone)]
pub struct RodioToneSink {
    handle: OutputStreamHandle,
}

impl RodioToneSink {
    /// Opens the default output device.
    ///
    /// The returned [`AudioOutput`] owns the stream; tones stop sounding once
    /// it is dropped.
    pub fn open_default() -> Result<(AudioOutput, Self), AudioError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| AudioError::NoDevice(e.to_string()))?;
        info!("Opened default audio output device");
        Ok((AudioOutput { _stream: stream }, RodioToneSink { handle }))
    }
}

impl ToneSink for RodioToneSink {
    fn play(&self, tone: &Tone) -> Result<(), AudioError> {
        let source = SineWave::new(tone.frequency_hz)
            .take_duration(tone.duration)
            .amplify(tone.gain);
        self.handle
            .play_raw(source)
            .map_err(|e| AudioError::Playback(e.to_string()))
    }
}

/// Discards every tone
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentToneSink;

impl ToneSink for SilentToneSink {
    fn play(&self, tone: &Tone) -> Result<(), AudioError> {
        debug!("Muted tone: {:?}", tone.kind);
        Ok(())
    }
}
