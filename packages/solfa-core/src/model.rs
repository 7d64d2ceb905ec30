//! # Note Model
//!
//! Canonical measure/note types shared by the parser, the renderer and the
//! playback scheduler.
//!
//! ## Type Hierarchy
//! ```text
//! NotationDocument
//!   ├── DocumentMetadata (title, key label, time signature, measure count)
//!   └── Vec<Measure>
//!         ├── number (1-based, document order)
//!         ├── beats_per_measure (time signature numerator)
//!         └── Vec<Note>
//!               ├── syllable: Syllable (d r m f s l t, or rest)
//!               ├── octave_modifier: i32 (' = +1, , = -1)
//!               ├── duration_beats: f64
//!               ├── is_rest: bool
//!               ├── display_text: Option<String>
//!               └── original_pitch: Option<String>
//! ```
//!
//! ## Key Concepts
//!
//! ### Immutability
//! A parse produces a fresh model. Nothing downstream mutates it; when the
//! transcript changes the whole model is rebuilt.
//!
//! ### Measure fill
//! A measure's note durations are not required to add up to
//! `beats_per_measure`. Under- and over-filled measures are rendered as they
//! are; the linter reports them as warnings.
//!
//! ### Metadata
//! Title, key and time signature travel with the document but are never
//! inferred from the notes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker appended once per octave above the reference octave.
pub const HIGHER_OCTAVE: char = '\'';
/// Marker appended once per octave below the reference octave.
pub const LOWER_OCTAVE: char = ',';

/// One of the seven sung scale degrees, or a rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Syllable {
    #[serde(rename = "d")]
    Do,
    #[serde(rename = "r")]
    Re,
    #[serde(rename = "m")]
    Mi,
    #[serde(rename = "f")]
    Fa,
    #[serde(rename = "s")]
    Sol,
    #[serde(rename = "l")]
    La,
    #[serde(rename = "t")]
    Ti,
    #[default]
    #[serde(rename = "0")]
    Rest,
}

impl Syllable {
    /// All eight values, scale degrees first.
    pub const ALL: [Syllable; 8] = [
        Syllable::Do,
        Syllable::Re,
        Syllable::Mi,
        Syllable::Fa,
        Syllable::Sol,
        Syllable::La,
        Syllable::Ti,
        Syllable::Rest,
    ];

    /// Look up a case-folded syllable name.
    ///
    /// Accepts the one-letter forms used in transcripts (`d`, `r`, ... `0`)
    /// and the sung names (`do`, `re`, `mi`, `fa`, `so`/`sol`, `la`, `ti`).
    /// `me`, `te` and friends are chromatic syllables, not aliases, so they
    /// are not recognized.
    pub fn from_name(name: &str) -> Option<Self> {
        let syllable = match name {
            "d" | "do" | "doh" => Syllable::Do,
            "r" | "re" | "ray" => Syllable::Re,
            "m" | "mi" => Syllable::Mi,
            "f" | "fa" | "fah" => Syllable::Fa,
            "s" | "so" | "sol" | "soh" => Syllable::Sol,
            "l" | "la" | "lah" => Syllable::La,
            "t" | "ti" => Syllable::Ti,
            "0" => Syllable::Rest,
            _ => return None,
        };
        Some(syllable)
    }

    /// Transcript spelling of the syllable.
    pub fn as_str(&self) -> &'static str {
        match self {
            Syllable::Do => "d",
            Syllable::Re => "r",
            Syllable::Mi => "m",
            Syllable::Fa => "f",
            Syllable::Sol => "s",
            Syllable::La => "l",
            Syllable::Ti => "t",
            Syllable::Rest => "0",
        }
    }

    /// Zero-based scale degree (do = 0 ... ti = 6); `None` for rests.
    pub fn degree(&self) -> Option<usize> {
        match self {
            Syllable::Do => Some(0),
            Syllable::Re => Some(1),
            Syllable::Mi => Some(2),
            Syllable::Fa => Some(3),
            Syllable::Sol => Some(4),
            Syllable::La => Some(5),
            Syllable::Ti => Some(6),
            Syllable::Rest => None,
        }
    }

    pub fn is_rest(&self) -> bool {
        *self == Syllable::Rest
    }
}

impl fmt::Display for Syllable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Longest run of octave markers written for one note.
pub const MAX_OCTAVE_MARKERS: u32 = 9;

/// Render a signed octave count as marker characters (`''` or `,`), at most
/// [`MAX_OCTAVE_MARKERS`] of them.
pub fn octave_markers(octave_modifier: i32) -> String {
    let marker = if octave_modifier >= 0 {
        HIGHER_OCTAVE
    } else {
        LOWER_OCTAVE
    };
    std::iter::repeat(marker)
        .take(octave_modifier.unsigned_abs().min(MAX_OCTAVE_MARKERS) as usize)
        .collect()
}

/// A single note or rest.
///
/// `duration_beats` is always positive. A rest always carries
/// `Syllable::Rest` and sounds as silence for its duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub syllable: Syllable,
    pub octave_modifier: i32,
    pub duration_beats: f64,
    pub is_rest: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_pitch: Option<String>,
}

impl Note {
    /// A note of the given syllable. Passing `Syllable::Rest` yields a rest.
    pub fn new(syllable: Syllable, octave_modifier: i32, duration_beats: f64) -> Self {
        if syllable.is_rest() {
            return Self::rest(duration_beats);
        }
        Self {
            syllable,
            octave_modifier,
            duration_beats,
            is_rest: false,
            display_text: None,
            original_pitch: None,
        }
    }

    pub fn rest(duration_beats: f64) -> Self {
        Self {
            syllable: Syllable::Rest,
            octave_modifier: 0,
            duration_beats,
            is_rest: true,
            display_text: None,
            original_pitch: None,
        }
    }

    pub fn with_display_text(self, display_text: impl Into<String>) -> Self {
        Self {
            display_text: Some(display_text.into()),
            ..self
        }
    }

    /// A copy of this note held for `extra_beats` longer.
    pub fn extended(&self, extra_beats: f64) -> Self {
        Self {
            duration_beats: self.duration_beats + extra_beats,
            ..self.clone()
        }
    }

    /// Text shown for this note: the stored display text, otherwise the
    /// syllable followed by its octave markers (`0` for rests).
    pub fn display(&self) -> String {
        if let Some(text) = &self.display_text {
            return text.clone();
        }
        if self.is_rest {
            return Syllable::Rest.as_str().to_string();
        }
        format!("{}{}", self.syllable, octave_markers(self.octave_modifier))
    }
}

/// Time signature (e.g., 4/4, 3/4, 6/8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub beats: u32,
    pub beat_type: u32,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            beats: 4,
            beat_type: 4,
        }
    }
}

impl TimeSignature {
    /// Parse `"N/D"`. Both parts must be positive integers.
    pub fn parse(s: &str) -> Option<Self> {
        let (beats, beat_type) = s.trim().split_once('/')?;
        let beats: u32 = beats.trim().parse().ok()?;
        let beat_type: u32 = beat_type.trim().parse().ok()?;
        if beats == 0 || beat_type == 0 {
            return None;
        }
        Some(Self { beats, beat_type })
    }

    /// Beats per measure for an optional label, defaulting to 4/4.
    pub fn beats_for_label(label: Option<&str>) -> u32 {
        label
            .and_then(Self::parse)
            .unwrap_or_default()
            .beats
    }

    /// Beats per measure for an optional label, `default_beats` when the
    /// label is missing or malformed.
    pub fn beats_or(label: Option<&str>, default_beats: u32) -> u32 {
        label
            .and_then(Self::parse)
            .map_or(default_beats, |signature| signature.beats)
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.beats, self.beat_type)
    }
}

/// An ordered group of notes between bar separators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    pub number: u32,
    pub notes: Vec<Note>,
    pub beats_per_measure: u32,
}

impl Measure {
    /// Sum of the note durations, in beats.
    pub fn total_beats(&self) -> f64 {
        self.notes.iter().map(|n| n.duration_beats).sum()
    }

    pub fn is_filled(&self) -> bool {
        (self.total_beats() - self.beats_per_measure as f64).abs() < 1e-9
    }
}

/// Descriptive metadata carried alongside the measures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure_count: Option<usize>,
}

/// Parsed measures plus pass-through metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotationDocument {
    pub measures: Vec<Measure>,
    pub metadata: DocumentMetadata,
}

impl NotationDocument {
    pub fn note_count(&self) -> usize {
        self.measures.iter().map(|m| m.notes.len()).sum()
    }

    pub fn total_beats(&self) -> f64 {
        self.measures.iter().map(Measure::total_beats).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syllable_names() {
        assert_eq!(Syllable::from_name("d"), Some(Syllable::Do));
        assert_eq!(Syllable::from_name("sol"), Some(Syllable::Sol));
        assert_eq!(Syllable::from_name("so"), Some(Syllable::Sol));
        assert_eq!(Syllable::from_name("0"), Some(Syllable::Rest));
        assert_eq!(Syllable::from_name("te"), None);
        assert_eq!(Syllable::from_name("x"), None);
    }

    #[test]
    fn test_syllable_round_trip_spelling() {
        for syllable in Syllable::ALL {
            assert_eq!(Syllable::from_name(syllable.as_str()), Some(syllable));
        }
    }

    #[test]
    fn test_octave_markers() {
        assert_eq!(octave_markers(0), "");
        assert_eq!(octave_markers(2), "''");
        assert_eq!(octave_markers(-3), ",,,");
        assert_eq!(octave_markers(i32::MAX).len(), MAX_OCTAVE_MARKERS as usize);
        assert_eq!(octave_markers(i32::MIN), ",".repeat(MAX_OCTAVE_MARKERS as usize));
    }

    #[test]
    fn test_note_display() {
        assert_eq!(Note::new(Syllable::Mi, 1, 1.0).display(), "m'");
        assert_eq!(Note::new(Syllable::Sol, -1, 1.0).display(), "s,");
        assert_eq!(Note::rest(1.0).display(), "0");
        assert_eq!(
            Note::new(Syllable::Do, 0, 1.0).with_display_text("do").display(),
            "do"
        );
    }

    #[test]
    fn test_new_with_rest_syllable_is_rest() {
        let note = Note::new(Syllable::Rest, 2, 1.0);
        assert!(note.is_rest);
        assert_eq!(note.octave_modifier, 0);
    }

    #[test]
    fn test_extended_leaves_original() {
        let note = Note::new(Syllable::Do, 0, 1.0);
        let held = note.extended(1.0);
        assert_eq!(note.duration_beats, 1.0);
        assert_eq!(held.duration_beats, 2.0);
    }

    #[test]
    fn test_time_signature_parse() {
        assert_eq!(
            TimeSignature::parse("3/4"),
            Some(TimeSignature { beats: 3, beat_type: 4 })
        );
        assert_eq!(
            TimeSignature::parse(" 6 / 8 "),
            Some(TimeSignature { beats: 6, beat_type: 8 })
        );
        assert_eq!(TimeSignature::parse("0/4"), None);
        assert_eq!(TimeSignature::parse("common"), None);
        assert_eq!(TimeSignature::beats_for_label(None), 4);
        assert_eq!(TimeSignature::beats_for_label(Some("3/4")), 3);
        assert_eq!(TimeSignature::beats_or(None, 6), 6);
        assert_eq!(TimeSignature::beats_or(Some("waltz"), 6), 6);
        assert_eq!(TimeSignature::beats_or(Some("2/4"), 6), 2);
    }

    #[test]
    fn test_measure_fill() {
        let measure = Measure {
            number: 1,
            notes: vec![Note::new(Syllable::Do, 0, 2.0), Note::rest(1.0)],
            beats_per_measure: 4,
        };
        assert_eq!(measure.total_beats(), 3.0);
        assert!(!measure.is_filled());
    }

    #[test]
    fn test_note_serializes_camel_case() {
        let json = serde_json::to_string(&Note::new(Syllable::Re, -1, 0.5)).unwrap();
        assert_eq!(
            json,
            r#"{"syllable":"r","octaveModifier":-1,"durationBeats":0.5,"isRest":false}"#
        );
    }
}
