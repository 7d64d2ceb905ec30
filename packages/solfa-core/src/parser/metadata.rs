//! Header metadata carried by transcripts.
//!
//! The grammar skips header lines. This pass reads them back so glue code can
//! hand the key and time signature through to renderers without the note
//! parser ever looking at them.

use crate::model::{DocumentMetadata, NotationDocument, TimeSignature};
use crate::parser::{parse_transcript_with_options, ParseOptions};

/// Collect `# title`, `Key:`, `Time:`/`Time Signature:` and `Measures:`
/// headers. The first occurrence of each wins.
pub fn read_header_metadata(source: &str) -> DocumentMetadata {
    let mut metadata = DocumentMetadata::default();

    for line in source.lines() {
        let line = line.trim();
        if let Some(title) = line.strip_prefix('#') {
            let title = title.trim();
            if metadata.title.is_none() && !title.is_empty() {
                metadata.title = Some(title.to_string());
            }
        } else if let Some(key) = line.strip_prefix("Key:") {
            metadata.key.get_or_insert_with(|| key.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("Time") {
            if let Some((_, value)) = rest.split_once(':') {
                metadata
                    .time_signature
                    .get_or_insert_with(|| value.trim().to_string());
            }
        } else if let Some(count) = line.strip_prefix("Measures:") {
            if metadata.measure_count.is_none() {
                metadata.measure_count = count.trim().parse().ok();
            }
        }
    }

    metadata
}

/// Parse a transcript together with its header metadata.
///
/// The time signature header, when present and well formed, supplies
/// `beats_per_measure`; otherwise measures default to 4 beats.
pub fn parse_transcript_document(source: &str) -> NotationDocument {
    parse_transcript_document_with_options(source, &ParseOptions::default())
}

/// Like [`parse_transcript_document`], but measures without a usable time
/// signature header get `defaults.beats_per_measure`.
pub fn parse_transcript_document_with_options(
    source: &str,
    defaults: &ParseOptions,
) -> NotationDocument {
    let metadata = read_header_metadata(source);
    let options = header_options(&metadata, defaults);
    NotationDocument {
        measures: parse_transcript_with_options(source, &options),
        metadata,
    }
}

/// Parse options with the header's time signature applied over `defaults`.
pub fn header_options(metadata: &DocumentMetadata, defaults: &ParseOptions) -> ParseOptions {
    ParseOptions {
        beats_per_measure: TimeSignature::beats_or(
            metadata.time_signature.as_deref(),
            defaults.beats_per_measure,
        ),
    }
}
