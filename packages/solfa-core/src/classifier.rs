//! Syllable classification for single transcript tokens.
//!
//! A token is an optional pair of enclosing parentheses (half-beat note), a
//! syllable name, and a trailing run of octave markers:
//!
//! ```text
//! (d')   -> Do, +1, eighth
//! s,,    -> Sol, -2
//! xyz    -> Rest (unrecognized)
//! ```
//!
//! Classification never fails. Anything that is not one of the eight
//! syllables, including the sustain marker on its own, becomes a rest.

use crate::model::{Syllable, HIGHER_OCTAVE, LOWER_OCTAVE};

/// Token that holds the previous note for one more beat.
pub const SUSTAIN_MARKER: &str = "-";

/// Result of classifying one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub syllable: Syllable,
    pub octave_modifier: i32,
    pub is_eighth: bool,
    /// False when the token fell back to a rest because its name was unknown.
    pub recognized: bool,
}

/// Classify a raw token.
///
/// # Example
/// ```
/// use solfa::{classify, Syllable};
///
/// let c = classify("(m'')");
/// assert_eq!(c.syllable, Syllable::Mi);
/// assert_eq!(c.octave_modifier, 2);
/// assert!(c.is_eighth);
///
/// assert_eq!(classify("q").syllable, Syllable::Rest);
/// ```
pub fn classify(token: &str) -> Classification {
    let (inner, is_eighth) = strip_eighth_parens(token.trim());
    let (stem, octave_modifier) = split_octave_markers(inner);
    let candidate = stem.to_lowercase();

    let syllable = if candidate == SUSTAIN_MARKER {
        None
    } else {
        Syllable::from_name(&candidate)
    };

    match syllable {
        Some(syllable) if !syllable.is_rest() => Classification {
            syllable,
            octave_modifier,
            is_eighth,
            recognized: true,
        },
        Some(_) => Classification {
            syllable: Syllable::Rest,
            octave_modifier: 0,
            is_eighth,
            recognized: true,
        },
        None => Classification {
            syllable: Syllable::Rest,
            octave_modifier: 0,
            is_eighth,
            recognized: false,
        },
    }
}

/// Remove one matched pair of enclosing parentheses.
pub(crate) fn strip_eighth_parens(token: &str) -> (&str, bool) {
    match token.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        Some(inner) => (inner, true),
        None => (token, false),
    }
}

/// Split a trailing run of one kind of octave marker off `token`.
///
/// Only the last marker kind counts; `d',` keeps `d'` as its stem, which
/// then fails to classify.
fn split_octave_markers(token: &str) -> (&str, i32) {
    let marker = match token.chars().last() {
        Some(c) if c == HIGHER_OCTAVE || c == LOWER_OCTAVE => c,
        _ => return (token, 0),
    };
    let stem = token.trim_end_matches(marker);
    let count = (token.len() - stem.len()) as i32;
    let modifier = if marker == HIGHER_OCTAVE { count } else { -count };
    (stem, modifier)
}
