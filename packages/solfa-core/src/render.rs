//! Render-ready note list.
//!
//! The page renderer lives outside this crate. What it needs from us is a flat
//! list of notes with the two classifications it styles by: a duration class
//! (eighth, single beat, held) and a color per syllable.

use crate::model::{Measure, Note, Syllable};
use serde::Serialize;

/// How long a note is, in rendering terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DurationClass {
    /// Shorter than one beat (written in parentheses).
    Eighth,
    /// Exactly one beat.
    Beat,
    /// Longer than one beat (followed by sustain dashes).
    Held { beats: f64 },
}

impl DurationClass {
    pub fn of(duration_beats: f64) -> Self {
        if duration_beats < 1.0 {
            DurationClass::Eighth
        } else if duration_beats == 1.0 {
            DurationClass::Beat
        } else {
            DurationClass::Held {
                beats: duration_beats,
            }
        }
    }
}

/// Display color of a syllable, low degrees warm, high degrees cool.
pub fn syllable_color(syllable: Syllable) -> &'static str {
    match syllable {
        Syllable::Do => "#e53935",
        Syllable::Re => "#fb8c00",
        Syllable::Mi => "#fdd835",
        Syllable::Fa => "#43a047",
        Syllable::Sol => "#1e88e5",
        Syllable::La => "#3949ab",
        Syllable::Ti => "#8e24aa",
        Syllable::Rest => "#9e9e9e",
    }
}

/// One note as the renderer consumes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNote {
    pub measure_number: u32,
    pub position_in_measure: usize,
    pub text: String,
    pub syllable: Syllable,
    pub octave_modifier: i32,
    pub color: &'static str,
    pub duration: DurationClass,
    pub duration_beats: f64,
    pub is_rest: bool,
}

impl RenderNote {
    pub fn new(measure_number: u32, position_in_measure: usize, note: &Note) -> Self {
        Self {
            measure_number,
            position_in_measure,
            text: note.display(),
            syllable: note.syllable,
            octave_modifier: note.octave_modifier,
            color: syllable_color(note.syllable),
            duration: DurationClass::of(note.duration_beats),
            duration_beats: note.duration_beats,
            is_rest: note.is_rest,
        }
    }
}

/// Flatten measures into render notes, in document order.
pub fn render_notes(measures: &[Measure]) -> Vec<RenderNote> {
    measures
        .iter()
        .flat_map(|measure| {
            measure
                .notes
                .iter()
                .enumerate()
                .map(move |(i, note)| RenderNote::new(measure.number, i, note))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_transcript;

    #[test]
    fn test_duration_classes() {
        assert_eq!(DurationClass::of(0.5), DurationClass::Eighth);
        assert_eq!(DurationClass::of(1.0), DurationClass::Beat);
        assert_eq!(DurationClass::of(3.0), DurationClass::Held { beats: 3.0 });
        assert_eq!(DurationClass::of(1.5), DurationClass::Held { beats: 1.5 });
    }

    #[test]
    fn test_every_syllable_has_distinct_color() {
        let mut colors: Vec<&str> = Syllable::ALL.iter().map(|s| syllable_color(*s)).collect();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), 8);
    }

    #[test]
    fn test_render_notes() {
        let measures = parse_transcript("| d - (r) | s, 0 |");
        let notes = render_notes(&measures);
        assert_eq!(notes.len(), 4);

        assert_eq!(notes[0].text, "d");
        assert_eq!(notes[0].color, "#e53935");
        assert_eq!(notes[0].duration, DurationClass::Held { beats: 2.0 });
        assert_eq!(notes[1].duration, DurationClass::Eighth);
        assert_eq!(notes[1].position_in_measure, 1);

        assert_eq!(notes[2].measure_number, 2);
        assert_eq!(notes[2].text, "s,");
        assert_eq!(notes[2].position_in_measure, 0);
        assert!(notes[3].is_rest);
        assert_eq!(notes[3].color, "#9e9e9e");
    }

    #[test]
    fn test_render_note_json() {
        let measures = parse_transcript("| (m') |");
        let json = serde_json::to_string(&render_notes(&measures)[0]).unwrap();
        assert!(json.contains(r#""duration":{"kind":"eighth"}"#));
        assert!(json.contains(r#""text":"m'""#));
        assert!(json.contains(r#""syllable":"m""#));
    }
}
