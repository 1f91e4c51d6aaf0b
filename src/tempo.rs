//! Pure helpers derived from the tempo: the Italian tempo marking shown next
//! to the bpm display and the parameters of each emitted tone.

use crate::meter::Tempo;
use std::fmt;
use std::time::Duration;

/// Tempi at or above this bpm use the short tone.
pub const FAST_TEMPO_BPM: u32 = 180;
pub const LONG_TONE: Duration = Duration::from_millis(50);
pub const SHORT_TONE: Duration = Duration::from_millis(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempoMarking {
    Largo,
    Adagio,
    Andante,
    Allegretto,
    Allegro,
    Presto,
    Prestissimo,
}

impl TempoMarking {
    pub fn from_bpm(bpm: u32) -> Self {
        match bpm {
            0..=60 => TempoMarking::Largo,
            61..=76 => TempoMarking::Adagio,
            77..=108 => TempoMarking::Andante,
            109..=120 => TempoMarking::Allegretto,
            121..=156 => TempoMarking::Allegro,
            157..=200 => TempoMarking::Presto,
            _ => TempoMarking::Prestissimo,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TempoMarking::Largo => "Largo",
            TempoMarking::Adagio => "Adagio",
            TempoMarking::Andante => "Andante",
            TempoMarking::Allegretto => "Allegretto",
            TempoMarking::Allegro => "Allegro",
            TempoMarking::Presto => "Presto",
            TempoMarking::Prestissimo => "Prestissimo",
        }
    }
}

impl From<Tempo> for TempoMarking {
    fn from(tempo: Tempo) -> Self {
        TempoMarking::from_bpm(tempo.bpm())
    }
}

impl fmt::Display for TempoMarking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which of the three accents a sub-tick sounds with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneKind {
    /// First sub-tick of the first beat of the measure
    Downbeat,
    /// First sub-tick of any other beat
    Beat,
    /// Any later sub-tick within a beat
    Subdivision,
}

impl ToneKind {
    pub fn for_tick(is_downbeat: bool, is_main_tick: bool) -> Self {
        if is_downbeat {
            ToneKind::Downbeat
        } else if is_main_tick {
            ToneKind::Beat
        } else {
            ToneKind::Subdivision
        }
    }

    pub fn frequency_hz(self) -> f32 {
        match self {
            ToneKind::Downbeat => 880.0,
            ToneKind::Beat => 660.0,
            ToneKind::Subdivision => 440.0,
        }
    }

    pub fn gain(self) -> f32 {
        match self {
            ToneKind::Downbeat => 0.5,
            ToneKind::Beat => 0.35,
            ToneKind::Subdivision => 0.2,
        }
    }
}

/// Two-tier tone length: shorter once the tempo reaches [`FAST_TEMPO_BPM`].
pub fn tone_duration(bpm: u32) -> Duration {
    if bpm < FAST_TEMPO_BPM {
        LONG_TONE
    } else {
        SHORT_TONE
    }
}

/// Everything an audio sink needs to render one click
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub kind: ToneKind,
    pub frequency_hz: f32,
    pub duration: Duration,
    pub gain: f32,
}

impl Tone {
    pub fn new(kind: ToneKind, tempo: Tempo) -> Self {
        Tone {
            kind,
            frequency_hz: kind.frequency_hz(),
            duration: tone_duration(tempo.bpm()),
            gain: kind.gain(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marking_examples() {
        assert_eq!(TempoMarking::from_bpm(60), TempoMarking::Largo);
        assert_eq!(TempoMarking::from_bpm(77), TempoMarking::Andante);
        assert_eq!(TempoMarking::from_bpm(157), TempoMarking::Presto);
        assert_eq!(TempoMarking::from_bpm(201), TempoMarking::Prestissimo);
    }

    #[test]
    fn test_marking_boundaries_belong_to_lower_bracket() {
        let cases = [
            (60, "Largo", "Adagio"),
            (76, "Adagio", "Andante"),
            (108, "Andante", "Allegretto"),
            (120, "Allegretto", "Allegro"),
            (156, "Allegro", "Presto"),
            (200, "Presto", "Prestissimo"),
        ];
        for (bpm, at, above) in cases {
            assert_eq!(TempoMarking::from_bpm(bpm).name(), at, "bpm {}", bpm);
            assert_eq!(TempoMarking::from_bpm(bpm + 1).name(), above, "bpm {}", bpm + 1);
        }
    }

    #[test]
    fn test_marking_covers_full_range() {
        assert_eq!(TempoMarking::from(Tempo::new(Tempo::MIN)), TempoMarking::Largo);
        assert_eq!(
            TempoMarking::from(Tempo::new(Tempo::MAX)),
            TempoMarking::Prestissimo
        );
    }

    #[test]
    fn test_tone_duration_switches_at_180() {
        assert_eq!(tone_duration(179), LONG_TONE);
        assert_eq!(tone_duration(180), SHORT_TONE);
        assert!(SHORT_TONE < LONG_TONE);
    }

    #[test]
    fn test_tone_kinds_are_ordered_by_accent() {
        let down = ToneKind::for_tick(true, true);
        let main = ToneKind::for_tick(false, true);
        let sub = ToneKind::for_tick(false, false);
        assert_eq!(
            (down, main, sub),
            (ToneKind::Downbeat, ToneKind::Beat, ToneKind::Subdivision)
        );
        assert!(down.frequency_hz() > main.frequency_hz());
        assert!(main.frequency_hz() > sub.frequency_hz());
        assert!(down.gain() > main.gain() && main.gain() > sub.gain());
    }

    #[test]
    fn test_tone_new_uses_tempo_duration() {
        let tone = Tone::new(ToneKind::Beat, Tempo::new(200));
        assert_eq!(tone.duration, SHORT_TONE);
        assert_eq!(tone.frequency_hz, 660.0);
    }
}
