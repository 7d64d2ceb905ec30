//! Transcript generation.
//!
//! Writes a [`NotationDocument`] back out in the plain-text transcript format
//! the parser reads:
//!
//! ```text
//! # Title
//!
//! Key: C major
//! Time: 4/4
//!
//! | d r m f | s - - - |
//! ```
//!
//! Durations are written the way the grammar can read them back, in half-beat
//! steps: a length with a half-beat part opens with the token in parentheses,
//! a whole length opens with the bare token, and each further whole beat adds
//! a `-`. So 1.5 beats is `(d) -` and 2 beats is `d -`. Lengths between half
//! beats are rounded to the nearest half beat.

use crate::classifier::SUSTAIN_MARKER;
use crate::model::{Measure, NotationDocument, Note};

/// Measures per line used by the exporter.
pub const DEFAULT_MEASURES_PER_LINE: usize = 4;

/// Transcript text for one note, including its sustain dashes.
pub fn format_note(note: &Note) -> String {
    let base = note.display_text.clone().unwrap_or_else(|| note.display());
    // display text may already carry sustain dashes from an upstream export
    let base = base
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string();

    let half_beats = ((note.duration_beats * 2.0).round() as usize).max(1);
    let (mut text, sustains) = if half_beats % 2 == 1 {
        (format!("({})", base), half_beats / 2)
    } else {
        (base, half_beats / 2 - 1)
    };
    for _ in 0..sustains {
        text.push(' ');
        text.push_str(SUSTAIN_MARKER);
    }
    text
}

/// Notes of one measure separated by spaces.
pub fn format_measure(measure: &Measure) -> String {
    measure
        .notes
        .iter()
        .map(format_note)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Full transcript: headers, a blank line, then measure lines.
pub fn to_transcript(document: &NotationDocument, measures_per_line: usize) -> String {
    let mut lines = Vec::new();
    let metadata = &document.metadata;

    if let Some(title) = &metadata.title {
        lines.push(format!("# {}", title));
        lines.push(String::new());
    }
    if let Some(key) = &metadata.key {
        lines.push(format!("Key: {}", key));
    }
    if let Some(time_signature) = &metadata.time_signature {
        lines.push(format!("Time: {}", time_signature));
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }

    for chunk in document.measures.chunks(measures_per_line.max(1)) {
        let measures: Vec<String> = chunk.iter().map(format_measure).collect();
        lines.push(format!("| {} |", measures.join(" | ")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentMetadata, Syllable};
    use crate::parser::metadata::parse_transcript_document;
    use crate::parser::structured::parse_document_json;

    #[test]
    fn test_format_note_durations() {
        assert_eq!(format_note(&Note::new(Syllable::Do, 0, 1.0)), "d");
        assert_eq!(format_note(&Note::new(Syllable::Do, 1, 3.0)), "d' - -");
        assert_eq!(format_note(&Note::new(Syllable::Re, -1, 0.5)), "(r,)");
        assert_eq!(format_note(&Note::rest(2.0)), "0 -");
        assert_eq!(format_note(&Note::new(Syllable::Do, 0, 1.5)), "(d) -");
        assert_eq!(format_note(&Note::new(Syllable::Fa, 0, 2.5)), "(f) - -");
        assert_eq!(format_note(&Note::new(Syllable::Mi, 0, 0.2)), "(m)");
    }

    #[test]
    fn test_format_strips_exported_dashes() {
        let note = Note::new(Syllable::Sol, 0, 2.0).with_display_text("s -");
        assert_eq!(format_note(&note), "s -");
    }

    #[test]
    fn test_round_trip() {
        let source = "# Song\n\nKey: D\nTime: 3/4\n\n| d - r | (m) (f) s 0 | l, |\n| t' - - | (d) - r |";
        let document = parse_transcript_document(source);
        let text = to_transcript(&document, 2);
        let reparsed = parse_transcript_document(&text);

        assert_eq!(reparsed.measures, document.measures);
        assert_eq!(reparsed.metadata.title.as_deref(), Some("Song"));
        assert_eq!(reparsed.metadata.key.as_deref(), Some("D"));
        assert_eq!(reparsed.metadata.time_signature.as_deref(), Some("3/4"));
    }

    #[test]
    fn test_lines_per_chunk() {
        let document = parse_transcript_document("| d | r | m | f | s |");
        let text = to_transcript(&document, 4);
        assert_eq!(text, "| d | r | m | f |\n| s |");
    }

    #[test]
    fn test_structured_document_to_transcript() {
        let document = parse_document_json(
            r#"{"key":"G major","measures":[{"notes":[{"syllable":"d","duration":2},{"syllable":"m","octave_modifier":1}]}]}"#,
        )
        .unwrap();
        let text = to_transcript(&document, 4);
        assert_eq!(text, "Key: G major\n\n| d - m' |");
    }

    #[test]
    fn test_empty_document() {
        let document = NotationDocument {
            measures: Vec::new(),
            metadata: DocumentMetadata::default(),
        };
        assert_eq!(to_transcript(&document, 4), "");
    }
}
