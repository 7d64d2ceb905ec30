//! # Public API
//!
//! One-call entry points that chain the modules together for hosts that only
//! have a transcript string in hand (the browser bindings and the CLI).
//!
//! - [`render_transcript()`] - transcript to render-ready notes
//! - [`plan_transcript()`] - transcript to a playback timeline
//! - [`lint_transcript()`] - transcript to warnings, using its own time signature
//! - [`lint_transcript_with_options()`] - the same, with a fallback measure length
//! - [`format_document_json()`] - structured JSON document to transcript text
//!
//! ## Typical Usage
//!
//! ```rust
//! use solfa::plan_transcript;
//!
//! let source = "# Scale\nKey: G\n\n| d r m f | s l t d' |";
//! let plan = plan_transcript(source, 60.0, None)?;
//!
//! assert_eq!(plan.notes.len(), 8);
//! assert_eq!(plan.total_seconds, 8.0);
//! // the Key header picked G, so d sounds G4
//! assert!((plan.notes[0].frequency - 391.99543598174927).abs() < 1e-9);
//! # Ok::<(), solfa::SolfaError>(())
//! ```

use crate::{
    build_plan, parse_document_json, parse_transcript_document, read_header_metadata,
    render_notes, to_transcript, FrequencyMapper, KeyRoot, ParseOptions, PlaybackPlan, RenderNote,
    SolfaError, Warning,
};
use crate::parser::metadata::header_options;

/// Parse a transcript (headers included) and flatten it for rendering.
pub fn render_transcript(source: &str) -> Vec<RenderNote> {
    let document = parse_transcript_document(source);
    render_notes(&document.measures)
}

/// Parse a transcript and lay out its playback timeline.
///
/// `key` overrides the transcript's `Key:` header; with neither, the key is C.
///
/// # Errors
/// Returns [`SolfaError::InvalidTempo`] when `tempo` is not a positive number.
pub fn plan_transcript(
    source: &str,
    tempo: f64,
    key: Option<&str>,
) -> Result<PlaybackPlan, SolfaError> {
    let document = parse_transcript_document(source);
    let key_label = key.or(document.metadata.key.as_deref());
    let mapper = FrequencyMapper::new(KeyRoot::parse_or_default(key_label));
    build_plan(&document.measures, tempo, &mapper)
}

/// Lint a transcript against the time signature in its own header.
pub fn lint_transcript(source: &str) -> Vec<Warning> {
    lint_transcript_with_options(source, &ParseOptions::default())
}

/// Lint a transcript against its header time signature, or against
/// `defaults.beats_per_measure` when the header is missing or malformed.
pub fn lint_transcript_with_options(source: &str, defaults: &ParseOptions) -> Vec<Warning> {
    let options = header_options(&read_header_metadata(source), defaults);
    crate::lint(source, &options)
}

/// Convert a structured JSON document into transcript text.
///
/// # Errors
/// Returns [`SolfaError::Document`] if the JSON does not decode.
pub fn format_document_json(source: &str, measures_per_line: usize) -> Result<String, SolfaError> {
    let document = parse_document_json(source)?;
    Ok(to_transcript(&document, measures_per_line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_transcript_skips_headers() {
        let notes = render_transcript("# T\nKey: D\n| d - r |");
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].duration_beats, 2.0);
    }

    #[test]
    fn test_plan_key_override() {
        let source = "Key: G\n| d |";
        let from_header = plan_transcript(source, 120.0, None).unwrap();
        let overridden = plan_transcript(source, 120.0, Some("C")).unwrap();
        assert!((from_header.notes[0].frequency - 391.99543598174927).abs() < 1e-9);
        assert!((overridden.notes[0].frequency - 261.6255653005986).abs() < 1e-9);
    }

    #[test]
    fn test_plan_rejects_bad_tempo() {
        assert!(matches!(
            plan_transcript("| d |", -1.0, None),
            Err(SolfaError::InvalidTempo(_))
        ));
    }

    #[test]
    fn test_lint_uses_header_time_signature() {
        assert!(lint_transcript("Time: 3/4\n| d r m |").is_empty());
        assert_eq!(lint_transcript("| d r m |").len(), 1);
    }

    #[test]
    fn test_lint_falls_back_to_configured_beats() {
        let waltz = ParseOptions {
            beats_per_measure: 3,
        };
        assert!(lint_transcript_with_options("| d r m |", &waltz).is_empty());
        assert_eq!(lint_transcript_with_options("Time: 4/4\n| d r m |", &waltz).len(), 1);
    }

    #[test]
    fn test_format_document_json() {
        let text = format_document_json(r#"{"measures":[{"notes":[{"syllable":"s"}]}]}"#, 4)
            .unwrap();
        assert_eq!(text, "| s |");
        assert!(matches!(
            format_document_json("not json", 4),
            Err(SolfaError::Document(_))
        ));
    }
}
