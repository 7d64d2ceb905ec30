//! # Transcript Linter
//!
//! The parser never rejects input: garbled tokens turn into rests and stray
//! sustains disappear. This pass walks the same
//! lines and reports what the parser silently repaired.
//!
//! ## Checks
//! - **Unrecognized token**: a token that did not classify as a syllable or
//!   `0` and was read as a rest
//! - **Dangling sustain**: a `-` with no earlier note in its measure
//! - **Measure fill**: note durations that do not add up to the time
//!   signature numerator
//!
//! Warnings never change the parsed model.
//!
//! ## Example
//! ```rust
//! use solfa::lint::{lint, WarningKind};
//! use solfa::parser::ParseOptions;
//!
//! let warnings = lint("| d r m xq |", &ParseOptions::default());
//! assert_eq!(warnings.len(), 1);
//! assert_eq!(warnings[0].kind, WarningKind::UnrecognizedToken);
//! assert_eq!(warnings[0].column, 9);
//! ```

use crate::classifier::{classify, SUSTAIN_MARKER};
use crate::parser::{
    is_skipped_line, measure_segments, parse_segment, segment_tokens, ParseOptions,
};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    UnrecognizedToken,
    DanglingSustain,
    MeasureFill,
}

/// One advisory finding. `line` and `column` are 1-based; the column counts
/// characters, not bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    pub kind: WarningKind,
    pub line: usize,
    pub column: usize,
    pub measure: u32,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: measure {}: {}",
            self.line, self.column, self.measure, self.message
        )
    }
}

/// Report everything the tolerant parser would repair in `source`.
pub fn lint(source: &str, options: &ParseOptions) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let mut measure_number = 0u32;

    for (line_index, line) in source.lines().enumerate() {
        if is_skipped_line(line) {
            continue;
        }
        for (segment_offset, segment) in measure_segments(line) {
            measure_number += 1;
            let location = |byte_offset: usize| (line_index + 1, char_column(line, byte_offset));

            check_tokens(
                segment,
                segment_offset,
                measure_number,
                &location,
                &mut warnings,
            );
            check_fill(
                segment,
                segment_offset,
                measure_number,
                options.beats_per_measure,
                &location,
                &mut warnings,
            );
        }
    }

    warnings
}

fn check_tokens(
    segment: &str,
    segment_offset: usize,
    measure: u32,
    location: &dyn Fn(usize) -> (usize, usize),
    warnings: &mut Vec<Warning>,
) {
    let mut has_note = false;

    for (token_offset, token) in segment_tokens(segment) {
        let (line, column) = location(segment_offset + token_offset);

        if token == SUSTAIN_MARKER {
            if !has_note {
                warnings.push(Warning {
                    kind: WarningKind::DanglingSustain,
                    line,
                    column,
                    measure,
                    message: "sustain '-' has no note to extend and was dropped".to_string(),
                });
            }
            continue;
        }

        has_note = true;
        if !classify(token).recognized {
            warnings.push(Warning {
                kind: WarningKind::UnrecognizedToken,
                line,
                column,
                measure,
                message: format!("unrecognized token '{}' was read as a rest", token),
            });
        }
    }
}

fn check_fill(
    segment: &str,
    segment_offset: usize,
    measure: u32,
    beats_per_measure: u32,
    location: &dyn Fn(usize) -> (usize, usize),
    warnings: &mut Vec<Warning>,
) {
    let total: f64 = parse_segment(segment).iter().map(|n| n.duration_beats).sum();
    if (total - beats_per_measure as f64).abs() < 1e-9 {
        return;
    }
    let (line, column) = location(segment_offset);
    warnings.push(Warning {
        kind: WarningKind::MeasureFill,
        line,
        column,
        measure,
        message: format!(
            "measure has {} beats, expected {}",
            total, beats_per_measure
        ),
    });
}

fn char_column(line: &str, byte_offset: usize) -> usize {
    line[..byte_offset].chars().count() + 1
}
