//! # Parser Module
//!
//! Turns notation into the canonical [`Measure`]/[`Note`] model.
//!
//! ## Two Inputs, One Output
//! - **Plain-text transcripts** (this file): line-oriented solfa as exported by
//!   the recognition service.
//! - **Structured documents** ([`structured`]): measures that already carry an
//!   explicit note list. These are mapped 1:1.
//!
//! ## Transcript Grammar
//! ```text
//! # Title                      <- header, skipped
//! Key: C major                 <- header, skipped
//! Time: 4/4                    <- header, skipped
//!
//! | d r m f | s - - 0 |        <- two measures
//! | (d) (r) m f |              <- eighth notes in parentheses
//! ```
//!
//! Per line:
//! 1. Header lines (`#`, `Key:`, `Time`, `Measures:`, `Generated:`),
//!    separators (`-...`) and blank lines are skipped.
//! 2. Lines containing `|` are split on it. Every non-empty segment is one
//!    measure, numbered by a single counter across the whole document.
//! 3. Segments split on whitespace into tokens.
//! 4. `-` holds the previous note of the same measure one beat longer, or is
//!    dropped if the measure has no note yet. Every other token is classified
//!    and becomes a note of 1 beat (0.5 when parenthesized).
//!
//! Lines without a `|` are commentary and contribute nothing.
//!
//! ## Tolerance
//! Parsing never fails. Unknown tokens become rests, dangling sustains are
//! dropped and stray lines are ignored, so partially garbled recognizer output
//! still renders. Use [`crate::lint`] to find out what was tolerated.
//!
//! ## Example
//! ```rust
//! use solfa::parse_transcript;
//!
//! let measures = parse_transcript("Key: C\n| d - r | m f |");
//! assert_eq!(measures.len(), 2);
//! assert_eq!(measures[0].notes[0].duration_beats, 2.0);
//! assert_eq!(measures[1].number, 2);
//! ```

pub mod metadata;
pub mod structured;

use crate::classifier::{classify, strip_eighth_parens, SUSTAIN_MARKER};
use crate::model::{Measure, Note, Syllable};
use log::debug;

/// Line prefixes that mark metadata rather than notation.
pub const HEADER_PREFIXES: [&str; 5] = ["#", "Key:", "Time", "Measures:", "Generated:"];

/// Character separating measures on a line.
pub const BAR_SEPARATOR: char = '|';

/// Options for transcript parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Time signature numerator stamped on every measure.
    pub beats_per_measure: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            beats_per_measure: 4,
        }
    }
}

/// Parse a transcript assuming 4 beats per measure.
pub fn parse_transcript(source: &str) -> Vec<Measure> {
    parse_transcript_with_options(source, &ParseOptions::default())
}

/// Parse a transcript into measures.
pub fn parse_transcript_with_options(source: &str, options: &ParseOptions) -> Vec<Measure> {
    let mut measures = Vec::new();
    let mut next_number = 1u32;

    for line in source.lines() {
        if is_skipped_line(line) {
            continue;
        }
        for (_, segment) in measure_segments(line) {
            measures.push(Measure {
                number: next_number,
                notes: parse_segment(segment),
                beats_per_measure: options.beats_per_measure,
            });
            next_number += 1;
        }
    }

    debug!(
        "parsed {} measures from {} lines",
        measures.len(),
        source.lines().count()
    );
    measures
}

/// Whether a line is metadata, a separator or blank.
pub fn is_skipped_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty()
        || trimmed.starts_with(SUSTAIN_MARKER)
        || HEADER_PREFIXES.iter().any(|p| trimmed.starts_with(p))
}

/// Non-empty measure segments of a line with their byte offsets in the line.
///
/// Yields nothing for lines without a bar separator.
pub(crate) fn measure_segments(line: &str) -> Vec<(usize, &str)> {
    if !line.contains(BAR_SEPARATOR) {
        return Vec::new();
    }
    let mut segments = Vec::new();
    let mut offset = 0;
    for raw in line.split(BAR_SEPARATOR) {
        let leading = raw.len() - raw.trim_start().len();
        let segment = raw.trim();
        if !segment.is_empty() {
            segments.push((offset + leading, segment));
        }
        offset += raw.len() + BAR_SEPARATOR.len_utf8();
    }
    segments
}

/// Whitespace-separated tokens of a segment with their byte offsets.
pub(crate) fn segment_tokens(segment: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in segment.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                tokens.push((s, &segment[s..i]));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push((s, &segment[s..]));
    }
    tokens
}

/// Notes of one measure segment.
pub(crate) fn parse_segment(segment: &str) -> Vec<Note> {
    segment_tokens(segment)
        .into_iter()
        .fold(SegmentState::default(), |state, (_, token)| state.accept(token))
        .finish()
}

/// Build a note from a non-sustain token.
pub(crate) fn note_from_token(token: &str) -> Note {
    let c = classify(token);
    let duration = if c.is_eighth { 0.5 } else { 1.0 };
    let (cleaned, _) = strip_eighth_parens(token);
    if c.syllable == Syllable::Rest || cleaned == "0" {
        Note::rest(duration)
    } else {
        Note::new(c.syllable, c.octave_modifier, duration)
    }
}

/// Notes emitted so far in a measure plus the one a sustain would extend.
///
/// The last note is held back until the next note arrives, so a sustain
/// replaces it with a longer copy instead of editing the emitted list.
#[derive(Default)]
struct SegmentState {
    emitted: Vec<Note>,
    last: Option<Note>,
}

impl SegmentState {
    fn accept(self, token: &str) -> Self {
        if token == SUSTAIN_MARKER {
            return Self {
                emitted: self.emitted,
                last: self.last.map(|note| note.extended(1.0)),
            };
        }
        let mut emitted = self.emitted;
        emitted.extend(self.last);
        Self {
            emitted,
            last: Some(note_from_token(token)),
        }
    }

    fn finish(self) -> Vec<Note> {
        let mut notes = self.emitted;
        notes.extend(self.last);
        notes
    }
}
