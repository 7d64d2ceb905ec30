//! Structured measure documents.
//!
//! The recognition service can export measures that already carry explicit
//! note lists:
//!
//! ```json
//! {
//!   "title": "Ode",
//!   "key": "C major",
//!   "time_signature": "4/4",
//!   "measure_count": 1,
//!   "measures": [
//!     { "number": 1, "notes": [
//!       { "syllable": "m", "octave_modifier": "'", "duration": 2.0 },
//!       { "syllable": "0", "is_rest": true }
//!     ] }
//!   ]
//! }
//! ```
//!
//! No grammar is involved: each source note becomes one [`Note`]. Missing
//! durations default to one beat and missing display strings default to the
//! syllable followed by its octave modifier. Decoding the text is the only
//! step that can fail.

use crate::classifier::classify;
use crate::error::SolfaError;
use crate::model::{
    octave_markers, DocumentMetadata, Measure, NotationDocument, Note, Syllable, TimeSignature,
    HIGHER_OCTAVE, LOWER_OCTAVE,
};
use log::debug;
use serde::{Deserialize, Serialize};

/// Measure document as exported upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasureDocument {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub time_signature: Option<String>,
    #[serde(default)]
    pub measure_count: Option<usize>,
    pub measures: Vec<SourceMeasure>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMeasure {
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub notes: Vec<SourceNote>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceNote {
    pub syllable: String,
    #[serde(default)]
    pub octave_modifier: Option<OctaveModifier>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub is_rest: Option<bool>,
    #[serde(default)]
    pub display: Option<String>,
}

/// Octave modifier as either a signed step count or marker characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OctaveModifier {
    Steps(i32),
    Markers(String),
}

impl OctaveModifier {
    /// Signed octave count. Unknown marker characters count as zero.
    pub fn steps(&self) -> i32 {
        match self {
            OctaveModifier::Steps(n) => *n,
            OctaveModifier::Markers(markers) => markers
                .chars()
                .map(|c| match c {
                    HIGHER_OCTAVE => 1,
                    LOWER_OCTAVE => -1,
                    _ => 0,
                })
                .sum(),
        }
    }

    /// Text appended to the syllable in the default display string.
    fn display_suffix(&self) -> String {
        match self {
            OctaveModifier::Steps(n) => octave_markers(*n),
            OctaveModifier::Markers(markers) => markers.clone(),
        }
    }
}

/// Decode a JSON measure document and map it into the note model.
pub fn parse_document_json(source: &str) -> Result<NotationDocument, SolfaError> {
    let document: MeasureDocument =
        serde_json::from_str(source).map_err(|e| SolfaError::Document(e.to_string()))?;
    Ok(parse_document(&document))
}

/// Decode a YAML measure document and map it into the note model.
pub fn parse_document_yaml(source: &str) -> Result<NotationDocument, SolfaError> {
    let document: MeasureDocument =
        serde_yaml::from_str(source).map_err(|e| SolfaError::Document(e.to_string()))?;
    Ok(parse_document(&document))
}

/// Map an already-decoded measure document into the note model.
pub fn parse_document(document: &MeasureDocument) -> NotationDocument {
    let beats_per_measure = TimeSignature::beats_for_label(document.time_signature.as_deref());

    let measures: Vec<Measure> = document
        .measures
        .iter()
        .enumerate()
        .map(|(i, source)| Measure {
            number: source
                .number
                .filter(|&n| n > 0)
                .unwrap_or(i as u32 + 1),
            notes: source.notes.iter().map(map_note).collect(),
            beats_per_measure,
        })
        .collect();

    debug!("mapped {} measures from structured document", measures.len());

    NotationDocument {
        measures,
        metadata: DocumentMetadata {
            title: document.title.clone(),
            key: document.key.clone(),
            time_signature: document.time_signature.clone(),
            measure_count: document.measure_count,
        },
    }
}

fn map_note(source: &SourceNote) -> Note {
    let classified = classify(&source.syllable);
    let octave_modifier = source
        .octave_modifier
        .as_ref()
        .map(OctaveModifier::steps)
        .unwrap_or(classified.octave_modifier);
    let duration = source
        .duration
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(1.0);
    let is_rest = source.is_rest.unwrap_or(false) || classified.syllable == Syllable::Rest;

    let display = source.display.clone().unwrap_or_else(|| {
        let suffix = source
            .octave_modifier
            .as_ref()
            .map(OctaveModifier::display_suffix)
            .unwrap_or_default();
        format!("{}{}", source.syllable, suffix)
    });

    let note = if is_rest {
        Note::rest(duration)
    } else {
        Note::new(classified.syllable, octave_modifier, duration)
    };
    note.with_display_text(display)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_document() {
        let source = r#"{
            "title": "Ode",
            "key": "C major",
            "time_signature": "3/4",
            "measure_count": 2,
            "generated_at": "2024-01-01T00:00:00",
            "measures": [
                { "number": 1, "text": "m' - 0", "notes": [
                    { "syllable": "m", "octave_modifier": "'", "duration": 2.0, "is_rest": false, "display": "m' -" },
                    { "syllable": "0", "octave_modifier": "", "duration": 1.0, "is_rest": true }
                ] },
                { "number": 2, "notes": [ { "syllable": "s", "octave_modifier": -1 } ] }
            ]
        }"#;
        let doc = parse_document_json(source).unwrap();

        assert_eq!(doc.metadata.title.as_deref(), Some("Ode"));
        assert_eq!(doc.metadata.measure_count, Some(2));
        assert_eq!(doc.measures.len(), 2);
        assert_eq!(doc.measures[0].beats_per_measure, 3);

        let first = &doc.measures[0].notes[0];
        assert_eq!(first.syllable, Syllable::Mi);
        assert_eq!(first.octave_modifier, 1);
        assert_eq!(first.duration_beats, 2.0);
        assert_eq!(first.display(), "m' -");

        let rest = &doc.measures[0].notes[1];
        assert!(rest.is_rest);
        assert_eq!(rest.display(), "0");

        let low = &doc.measures[1].notes[0];
        assert_eq!(low.octave_modifier, -1);
        assert_eq!(low.duration_beats, 1.0);
        assert_eq!(low.display(), "s,");
    }

    #[test]
    fn test_default_display_is_syllable_plus_modifier() {
        let document = MeasureDocument {
            measures: vec![SourceMeasure {
                number: Some(1),
                notes: vec![
                    SourceNote {
                        syllable: "d".into(),
                        octave_modifier: Some(OctaveModifier::Markers("''".into())),
                        ..Default::default()
                    },
                    SourceNote {
                        syllable: "t".into(),
                        ..Default::default()
                    },
                ],
            }],
            ..Default::default()
        };
        let doc = parse_document(&document);
        let notes = &doc.measures[0].notes;
        assert_eq!(notes[0].display(), "d''");
        assert_eq!(notes[0].octave_modifier, 2);
        assert_eq!(notes[1].display(), "t");
    }

    #[test]
    fn test_rest_flag_forces_rest_syllable() {
        let document = MeasureDocument {
            measures: vec![SourceMeasure {
                number: None,
                notes: vec![SourceNote {
                    syllable: "d".into(),
                    is_rest: Some(true),
                    ..Default::default()
                }],
            }],
            ..Default::default()
        };
        let doc = parse_document(&document);
        let note = &doc.measures[0].notes[0];
        assert!(note.is_rest);
        assert_eq!(note.syllable, Syllable::Rest);
        assert_eq!(doc.measures[0].number, 1);
    }

    #[test]
    fn test_unknown_syllable_is_rest() {
        let doc = parse_document_json(r#"{"measures":[{"notes":[{"syllable":"fi"}]}]}"#).unwrap();
        let note = &doc.measures[0].notes[0];
        assert!(note.is_rest);
        assert_eq!(note.display(), "fi");
    }

    #[test]
    fn test_non_positive_duration_defaults() {
        let doc = parse_document_json(
            r#"{"measures":[{"notes":[{"syllable":"d","duration":0},{"syllable":"r","duration":-2}]}]}"#,
        )
        .unwrap();
        assert!(doc.measures[0].notes.iter().all(|n| n.duration_beats == 1.0));
    }

    #[test]
    fn test_extreme_octave_modifier_plays_fallback() {
        let doc = parse_document_json(
            r#"{"measures":[{"notes":[{"syllable":"d","octave_modifier":2147483647},{"syllable":"s","octave_modifier":-2147483648}]}]}"#,
        )
        .unwrap();
        let notes = &doc.measures[0].notes;
        assert_eq!(notes[0].octave_modifier, i32::MAX);
        assert_eq!(notes[0].display(), format!("d{}", "'".repeat(9)));
        assert_eq!(notes[1].display(), format!("s{}", ",".repeat(9)));

        let plan =
            crate::build_plan(&doc.measures, 120.0, &crate::FrequencyMapper::default()).unwrap();
        assert_eq!(plan.notes.len(), 2);
        assert!(plan.notes.iter().all(|n| n.frequency == crate::frequency::DEFAULT_FREQUENCY));
    }

    #[test]
    fn test_yaml_document() {
        let source = "time_signature: 2/4\nmeasures:\n  - number: 7\n    notes:\n      - syllable: l\n        duration: 0.5\n";
        let doc = parse_document_yaml(source).unwrap();
        assert_eq!(doc.measures[0].number, 7);
        assert_eq!(doc.measures[0].beats_per_measure, 2);
        assert_eq!(doc.measures[0].notes[0].duration_beats, 0.5);
    }

    #[test]
    fn test_malformed_json_is_document_error() {
        let result = parse_document_json("{ \"measures\": [");
        assert!(matches!(result, Err(SolfaError::Document(_))));
    }
}
