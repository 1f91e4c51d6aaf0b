//! Musical value types shared by the scheduler and the control panel.
//!
//! Every type here is range-constrained by construction: a tempo outside
//! [`Tempo::MIN`]..=[`Tempo::MAX`], a numerator outside 2..=6 or a subdivision
//! other than 1..=4 cannot be represented.

use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Error returned when a meter value cannot be parsed or is out of range
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A time signature that is not one of 2/4 .. 6/4
    TimeSignature(String),
    /// A subdivision name or count that is not recognised
    Subdivision(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::TimeSignature(raw) => write!(
                f,
                "invalid time signature '{}': expected one of 2/4, 3/4, 4/4, 5/4, 6/4",
                raw
            ),
            ParseError::Subdivision(raw) => write!(
                f,
                "invalid subdivision '{}': expected quarter, eighth, triplet or sixteenth",
                raw
            ),
        }
    }
}

impl Error for ParseError {}

/// Beats per minute, clamped to the playable range
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tempo(u32);

impl Tempo {
    pub const MIN: u32 = 40;
    pub const MAX: u32 = 220;
    pub const DEFAULT: u32 = 80;

    pub fn new(bpm: u32) -> Self {
        Tempo(bpm.clamp(Self::MIN, Self::MAX))
    }

    pub fn bpm(self) -> u32 {
        self.0
    }

    /// Returns a tempo moved by `delta` bpm, saturating at the bounds.
    pub fn adjust(self, delta: i32) -> Self {
        let bpm = (self.0 as i64 + delta as i64).clamp(Self::MIN as i64, Self::MAX as i64);
        Tempo(bpm as u32)
    }

    /// Length of one main beat: `60 / bpm` seconds.
    pub fn beat_interval(self) -> Duration {
        Duration::from_secs_f64(60.0 / f64::from(self.0))
    }

    /// Length of one sub-tick for the given subdivision.
    pub fn sub_interval(self, subdivision: Subdivision) -> Duration {
        self.beat_interval() / subdivision.count()
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Tempo(Self::DEFAULT)
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bpm", self.0)
    }
}

/// A time signature over a fixed quarter-note denominator.
///
/// Only the numerator matters to the scheduler: it bounds the beat counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSignature {
    numerator: u32,
}

impl TimeSignature {
    pub fn new(numerator: u32) -> Result<Self, ParseError> {
        if (2..=6).contains(&numerator) {
            Ok(TimeSignature { numerator })
        } else {
            Err(ParseError::TimeSignature(numerator.to_string()))
        }
    }

    pub fn numerator(self) -> u32 {
        self.numerator
    }

    pub fn next(self) -> Self {
        let numerator = if self.numerator >= 6 {
            2
        } else {
            self.numerator + 1
        };
        TimeSignature { numerator }
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        TimeSignature { numerator: 4 }
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/4", self.numerator)
    }
}

impl FromStr for TimeSignature {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let numerator = match trimmed.split_once('/') {
            Some((num, "4")) => num.trim(),
            Some(_) => return Err(ParseError::TimeSignature(s.to_string())),
            None => trimmed,
        };
        numerator
            .parse::<u32>()
            .ok()
            .and_then(|n| TimeSignature::new(n).ok())
            .ok_or_else(|| ParseError::TimeSignature(s.to_string()))
    }
}

/// How many equal sub-ticks occur per main beat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Subdivision {
    #[default]
    Quarter,
    Eighth,
    Triplet,
    Sixteenth,
}

impl Subdivision {
    pub const ALL: [Subdivision; 4] = [
        Subdivision::Quarter,
        Subdivision::Eighth,
        Subdivision::Triplet,
        Subdivision::Sixteenth,
    ];

    pub fn from_count(count: u32) -> Option<Self> {
        match count {
            1 => Some(Subdivision::Quarter),
            2 => Some(Subdivision::Eighth),
            3 => Some(Subdivision::Triplet),
            4 => Some(Subdivision::Sixteenth),
            _ => None,
        }
    }

    pub fn count(self) -> u32 {
        match self {
            Subdivision::Quarter => 1,
            Subdivision::Eighth => 2,
            Subdivision::Triplet => 3,
            Subdivision::Sixteenth => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Subdivision::Quarter => "Quarter",
            Subdivision::Eighth => "Eighth",
            Subdivision::Triplet => "Triplet",
            Subdivision::Sixteenth => "Sixteenth",
        }
    }

    pub fn next(self) -> Self {
        Subdivision::from_count(self.count() % 4 + 1).unwrap_or_default()
    }
}

impl fmt::Display for Subdivision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Subdivision {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let found = Subdivision::ALL
            .into_iter()
            .find(|sub| sub.name().eq_ignore_ascii_case(trimmed))
            .or_else(|| trimmed.parse::<u32>().ok().and_then(Subdivision::from_count));
        found.ok_or_else(|| ParseError::Subdivision(s.to_string()))
    }
}

/// Position of the current main beat within the measure, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatCounter(u32);

impl BeatCounter {
    pub fn new() -> Self {
        BeatCounter(1)
    }

    pub fn current(self) -> u32 {
        self.0
    }

    pub fn is_downbeat(self, sub_index: u32) -> bool {
        self.0 == 1 && sub_index == 0
    }

    /// Moves to the next main beat, wrapping to 1 past `numerator`.
    /// Returns `true` when the wrap completed a measure.
    pub fn advance(&mut self, numerator: u32) -> bool {
        self.0 += 1;
        if self.0 > numerator {
            self.0 = 1;
            return true;
        }
        false
    }
}

impl Default for BeatCounter {
    fn default() -> Self {
        Self::new()
    }
}
