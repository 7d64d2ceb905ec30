//! Playback type definitions
//!
//! Scheduler states, step outcomes and the serialized playback plan.

use crate::error::SolfaError;
use serde::Serialize;

/// Scheduler state.
///
/// Only two states exist. Per-session data (cursor, clock, cancellation
/// flag) lives inside the scheduler while `Playing` and is dropped on the
/// way back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PlaybackState {
    Idle,
    #[serde(rename_all = "camelCase")]
    Playing {
        /// Measure currently sounding, `None` before the first one is reached.
        measure_number: Option<u32>,
        /// Logical time consumed so far, in seconds.
        elapsed_seconds: f64,
    },
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing { .. })
    }
}

/// What a single scheduler step did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// A tone was sent to the sink.
    Sounded {
        measure_number: u32,
        frequency: f64,
        duration_seconds: f64,
    },
    /// A rest advanced the clock without a tone.
    Rested {
        measure_number: u32,
        duration_seconds: f64,
    },
    /// The walk reached the end and returned to idle.
    Finished,
    /// The cancellation flag was seen and the walk returned to idle.
    Cancelled,
    /// Nothing to do: the scheduler was already idle.
    Idle,
}

impl Step {
    /// How long the host should wait before the next step, if the walk
    /// continues.
    pub fn wait_seconds(&self) -> Option<f64> {
        match self {
            Step::Sounded {
                duration_seconds, ..
            }
            | Step::Rested {
                duration_seconds, ..
            } => Some(*duration_seconds),
            Step::Finished | Step::Cancelled | Step::Idle => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.wait_seconds().is_none()
    }
}

/// Wall-clock length of `beats` at `tempo` beats per minute.
pub fn beats_to_seconds(beats: f64, tempo: f64) -> f64 {
    beats * 60.0 / tempo
}

/// Reject tempos that would make note durations meaningless.
pub fn check_tempo(tempo: f64) -> Result<f64, SolfaError> {
    if tempo.is_finite() && tempo > 0.0 {
        Ok(tempo)
    } else {
        Err(SolfaError::InvalidTempo(tempo))
    }
}

/// One sounding note of a playback plan.
///
/// # Fields
/// - `note_index`: sequential index over sounding notes (0, 1, 2, ...)
/// - `measure_number`: measure the note belongs to (1-indexed)
/// - `position_in_measure`: index of the note inside its measure, rests included
/// - `start_seconds` / `duration_seconds`: wall-clock timing at the plan tempo
/// - `frequency`: Hz, already resolved through the frequency mapper
/// - `display`: text the renderer shows for the note
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedNote {
    pub note_index: usize,
    pub measure_number: u32,
    pub position_in_measure: usize,
    pub start_seconds: f64,
    pub duration_seconds: f64,
    pub frequency: f64,
    pub display: String,
}

/// Start time of a measure inside a plan, for highlighting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMeasure {
    pub measure_number: u32,
    pub start_seconds: f64,
}

/// The full walk of a score expressed as data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackPlan {
    pub tempo: f64,
    pub total_seconds: f64,
    pub measures: Vec<PlannedMeasure>,
    pub notes: Vec<PlannedNote>,
}
