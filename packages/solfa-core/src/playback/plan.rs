//! Playback plan generation
//!
//! The same walk the scheduler performs, laid out ahead of time as data. The
//! browser client uses the plan to highlight measures and notes while its own
//! audio clock runs.

use super::types::{beats_to_seconds, check_tempo, PlannedMeasure, PlannedNote, PlaybackPlan};
use crate::error::SolfaError;
use crate::frequency::{Frequency, FrequencyMapper};
use crate::model::Measure;

/// Build the timeline for `measures` at `tempo` beats per minute.
///
/// Notes are sequential and never overlap: each starts where the previous
/// one (or rest) ended. Rests advance time but do not appear in `notes`.
///
/// # Example
/// ```rust
/// use solfa::{build_plan, parse_transcript, FrequencyMapper};
///
/// let measures = parse_transcript("| d - r 0 |");
/// let plan = build_plan(&measures, 120.0, &FrequencyMapper::default()).unwrap();
///
/// assert_eq!(plan.notes.len(), 2);
/// assert_eq!(plan.notes[0].duration_seconds, 1.0);
/// assert_eq!(plan.notes[1].start_seconds, 1.0);
/// assert_eq!(plan.total_seconds, 2.0);
/// ```
pub fn build_plan(
    measures: &[Measure],
    tempo: f64,
    mapper: &FrequencyMapper,
) -> Result<PlaybackPlan, SolfaError> {
    let tempo = check_tempo(tempo)?;

    let mut clock = 0.0;
    let mut notes = Vec::new();
    let mut planned_measures = Vec::with_capacity(measures.len());

    for measure in measures {
        planned_measures.push(PlannedMeasure {
            measure_number: measure.number,
            start_seconds: clock,
        });

        for (position, note) in measure.notes.iter().enumerate() {
            let duration_seconds = beats_to_seconds(note.duration_beats, tempo);
            if let Frequency::Hz(frequency) = mapper.note_frequency(note) {
                notes.push(PlannedNote {
                    note_index: notes.len(),
                    measure_number: measure.number,
                    position_in_measure: position,
                    start_seconds: clock,
                    duration_seconds,
                    frequency,
                    display: note.display(),
                });
            }
            clock += duration_seconds;
        }
    }

    Ok(PlaybackPlan {
        tempo,
        total_seconds: clock,
        measures: planned_measures,
        notes,
    })
}
