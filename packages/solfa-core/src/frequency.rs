//! # Frequency Mapping
//!
//! Converts a syllable, an octave and a key root into a playback frequency.
//!
//! ## Degree Mapping
//! Syllables are movable-do scale degrees. Each degree sits a fixed number of
//! semitones above the key root (major scale: 0 2 4 5 7 9 11). In the default
//! key of C that gives `d r m f s l t` = `C D E F G A B`.
//!
//! ## Octave Numbering
//! Octaves follow scientific pitch notation, so they roll over at C rather
//! than at the tonic. In G major at octave 4, `d` is G4 and `f` is C5.
//!
//! ## Pitch Table
//! Frequencies come from a fixed 12-TET table for octave 4 (A4 = 440 Hz),
//! doubled or halved per octave. Pitches outside octaves 0-8 fall back to a
//! configurable default frequency.

use crate::model::{Note, Syllable};
use serde::Serialize;
use std::fmt;

pub const A4_FREQUENCY: f64 = 440.0;

/// Frequency used when a pitch falls outside the table.
pub const DEFAULT_FREQUENCY: f64 = A4_FREQUENCY;

/// Octave the unmarked syllables are sung in.
pub const REFERENCE_OCTAVE: i32 = 4;

pub const MIN_OCTAVE: i32 = 0;
pub const MAX_OCTAVE: i32 = 8;

/// Semitone offsets of the major scale degrees from the tonic.
const MAJOR_SCALE_STEPS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Octave 4, C4 through B4, equal temperament with A4 = 440 Hz.
const OCTAVE_4_TABLE: [f64; 12] = [
    261.625_565_300_598_6,
    277.182_630_976_872_1,
    293.664_767_917_407_6,
    311.126_983_722_080_87,
    329.627_556_912_869_9,
    349.228_231_433_003_9,
    369.994_422_711_634_46,
    391.995_435_981_749_27,
    415.304_697_579_945_1,
    440.0,
    466.163_761_518_089_9,
    493.883_301_256_124_1,
];

const PITCH_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Output of the mapper: silence for rests, otherwise a frequency in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Silent,
    Hz(f64),
}

impl Frequency {
    pub fn hz(self) -> Option<f64> {
        match self {
            Frequency::Silent => None,
            Frequency::Hz(hz) => Some(hz),
        }
    }

    pub fn is_silent(self) -> bool {
        self == Frequency::Silent
    }
}

/// Tonic of the key, as a pitch class (C = 0 ... B = 11).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyRoot {
    semitone: u8,
}

impl KeyRoot {
    pub const C: KeyRoot = KeyRoot { semitone: 0 };

    /// Parse a key label such as `G`, `Bb`, `F#`, `Ef`, `C major` or `Am`.
    ///
    /// Only the tonic matters here. A mode suffix is accepted and ignored.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        let tonic = label.split_whitespace().next()?;
        let mut chars = tonic.chars();
        let letter = chars.next()?.to_ascii_uppercase();
        let natural: i32 = match letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };
        let accidental: i32 = match chars.as_str() {
            "" | "m" | "min" | "maj" => 0,
            "#" | "s" | "#m" | "sm" => 1,
            "b" | "f" | "bm" | "fm" => -1,
            _ => return None,
        };
        Some(Self {
            semitone: (natural + accidental).rem_euclid(12) as u8,
        })
    }

    /// Parse a key label, falling back to C for anything unrecognized.
    pub fn parse_or_default(label: Option<&str>) -> Self {
        label.and_then(Self::parse).unwrap_or_default()
    }

    pub fn semitone(&self) -> u8 {
        self.semitone
    }
}

impl fmt::Display for KeyRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(PITCH_NAMES[self.semitone as usize])
    }
}

/// A concrete pitch: pitch class plus scientific octave number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    pub pitch_class: u8,
    pub octave: i32,
}

impl Pitch {
    /// Table lookup, `None` outside the supported octaves.
    pub fn frequency(&self) -> Option<f64> {
        if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&self.octave) {
            return None;
        }
        let base = OCTAVE_4_TABLE[self.pitch_class as usize % 12];
        Some(base * 2f64.powi(self.octave - REFERENCE_OCTAVE))
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PITCH_NAMES[self.pitch_class as usize % 12], self.octave)
    }
}

/// Pitch of a sung degree; `None` for rests and for octaves that overflow.
pub fn pitch(syllable: Syllable, octave: i32, key_root: KeyRoot) -> Option<Pitch> {
    let degree = syllable.degree()?;
    let absolute = key_root.semitone + MAJOR_SCALE_STEPS[degree];
    Some(Pitch {
        pitch_class: absolute % 12,
        octave: octave.checked_add((absolute / 12) as i32)?,
    })
}

/// Frequency of `syllable` sung in `octave` of the key on `key_root`.
///
/// # Example
/// ```
/// use solfa::{frequency, Frequency, KeyRoot, Syllable};
///
/// assert_eq!(frequency(Syllable::La, 4, KeyRoot::C), Frequency::Hz(440.0));
/// assert_eq!(frequency(Syllable::Rest, 4, KeyRoot::C), Frequency::Silent);
/// ```
pub fn frequency(syllable: Syllable, octave: i32, key_root: KeyRoot) -> Frequency {
    FrequencyMapper::new(key_root).frequency_at(syllable, octave)
}

/// Frequency lookup with a fixed key, reference octave and fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyMapper {
    key_root: KeyRoot,
    reference_octave: i32,
    fallback: f64,
}

impl Default for FrequencyMapper {
    fn default() -> Self {
        Self::new(KeyRoot::C)
    }
}

impl FrequencyMapper {
    pub fn new(key_root: KeyRoot) -> Self {
        Self {
            key_root,
            reference_octave: REFERENCE_OCTAVE,
            fallback: DEFAULT_FREQUENCY,
        }
    }

    pub fn with_reference_octave(self, reference_octave: i32) -> Self {
        Self {
            reference_octave,
            ..self
        }
    }

    pub fn with_fallback(self, fallback: f64) -> Self {
        Self { fallback, ..self }
    }

    pub fn key_root(&self) -> KeyRoot {
        self.key_root
    }

    /// Frequency of a syllable in an absolute octave.
    pub fn frequency_at(&self, syllable: Syllable, octave: i32) -> Frequency {
        if syllable.is_rest() {
            return Frequency::Silent;
        }
        let hz = pitch(syllable, octave, self.key_root).and_then(|p| p.frequency());
        Frequency::Hz(hz.unwrap_or(self.fallback))
    }

    /// Frequency of a note sung relative to the reference octave.
    pub fn note_frequency(&self, note: &Note) -> Frequency {
        if note.is_rest {
            return Frequency::Silent;
        }
        match self.reference_octave.checked_add(note.octave_modifier) {
            Some(octave) => self.frequency_at(note.syllable, octave),
            None => Frequency::Hz(self.fallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hz(f: Frequency) -> f64 {
        f.hz().expect("expected a sounding frequency")
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_c_major_degrees() {
        let expected = [261.625565, 293.664768, 329.627557, 349.228231, 391.995436, 440.0, 493.883301];
        for (syllable, want) in Syllable::ALL[..7].iter().zip(expected) {
            let got = hz(frequency(*syllable, 4, KeyRoot::C));
            assert!((got - want).abs() < 1e-5, "{:?}: {} != {}", syllable, got, want);
        }
    }

    #[test]
    fn test_rest_is_silent() {
        assert_eq!(frequency(Syllable::Rest, 4, KeyRoot::C), Frequency::Silent);
        let mapper = FrequencyMapper::default();
        assert_eq!(mapper.note_frequency(&Note::rest(1.0)), Frequency::Silent);
    }

    #[test]
    fn test_octave_modifier_doubles() {
        let mapper = FrequencyMapper::default();
        let la = hz(mapper.note_frequency(&Note::new(Syllable::La, 0, 1.0)));
        let la_high = hz(mapper.note_frequency(&Note::new(Syllable::La, 1, 1.0)));
        let la_low = hz(mapper.note_frequency(&Note::new(Syllable::La, -1, 1.0)));
        assert!(close(la, 440.0));
        assert!(close(la_high, 880.0));
        assert!(close(la_low, 220.0));
    }

    #[test]
    fn test_key_of_g_rolls_octave_at_c() {
        let key = KeyRoot::parse("G").unwrap();
        assert_eq!(
            pitch(Syllable::Do, 4, key),
            Some(Pitch { pitch_class: 7, octave: 4 })
        );
        assert_eq!(
            pitch(Syllable::Fa, 4, key),
            Some(Pitch { pitch_class: 0, octave: 5 })
        );
        assert_eq!(pitch(Syllable::Ti, 4, key).unwrap().to_string(), "F#5");
        assert!(close(hz(frequency(Syllable::Re, 4, key)), 440.0));
    }

    #[test]
    fn test_key_parsing() {
        assert_eq!(KeyRoot::parse("C major"), Some(KeyRoot::C));
        assert_eq!(KeyRoot::parse("Bb").unwrap().semitone(), 10);
        assert_eq!(KeyRoot::parse("Ef").unwrap().semitone(), 3);
        assert_eq!(KeyRoot::parse("F#").unwrap().semitone(), 6);
        assert_eq!(KeyRoot::parse("Cb").unwrap().semitone(), 11);
        assert_eq!(KeyRoot::parse("Am").unwrap().semitone(), 9);
        assert_eq!(KeyRoot::parse("a minor").unwrap().semitone(), 9);
        assert_eq!(KeyRoot::parse("H"), None);
        assert_eq!(KeyRoot::parse(""), None);
        assert_eq!(KeyRoot::parse_or_default(Some("??")), KeyRoot::C);
        assert_eq!(KeyRoot::parse("Bb").unwrap().to_string(), "A#");
    }

    #[test]
    fn test_out_of_range_falls_back() {
        let mapper = FrequencyMapper::default().with_fallback(123.0);
        assert_eq!(mapper.frequency_at(Syllable::Do, 9), Frequency::Hz(123.0));
        assert_eq!(mapper.frequency_at(Syllable::Do, -1), Frequency::Hz(123.0));
        assert_eq!(
            FrequencyMapper::default().frequency_at(Syllable::Do, 12),
            Frequency::Hz(DEFAULT_FREQUENCY)
        );
    }

    #[test]
    fn test_table_edges() {
        assert!(close(hz(frequency(Syllable::Do, 0, KeyRoot::C)), 16.351597831287414));
        assert!(hz(frequency(Syllable::Ti, 8, KeyRoot::C)) > 7900.0);
        // B major: ti is A#, which stays inside octave 8 only when d is B7
        let b = KeyRoot::parse("B").unwrap();
        assert_eq!(pitch(Syllable::Ti, 8, b).unwrap().octave, 9);
        assert_eq!(frequency(Syllable::Ti, 8, b), Frequency::Hz(DEFAULT_FREQUENCY));
    }

    #[test]
    fn test_deterministic() {
        let mapper = FrequencyMapper::new(KeyRoot::parse("Eb").unwrap());
        let note = Note::new(Syllable::Sol, -1, 1.0);
        assert_eq!(mapper.note_frequency(&note), mapper.note_frequency(&note));
    }

    #[test]
    fn test_extreme_octaves_fall_back() {
        let mapper = FrequencyMapper::default().with_fallback(123.0);
        for modifier in [i32::MAX, i32::MAX - 1, i32::MIN] {
            let note = Note::new(Syllable::Ti, modifier, 1.0);
            assert_eq!(mapper.note_frequency(&note), Frequency::Hz(123.0));
        }
        let b = KeyRoot::parse("B").unwrap();
        assert_eq!(pitch(Syllable::Ti, i32::MAX, b), None);
        assert_eq!(frequency(Syllable::Ti, i32::MAX, b), Frequency::Hz(DEFAULT_FREQUENCY));
        assert_eq!(frequency(Syllable::Rest, i32::MAX, b), Frequency::Silent);
    }

    #[test]
    fn test_reference_octave() {
        let mapper = FrequencyMapper::default().with_reference_octave(3);
        let la = hz(mapper.note_frequency(&Note::new(Syllable::La, 0, 1.0)));
        assert!(close(la, 220.0));
    }
}
