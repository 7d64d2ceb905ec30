//! # Playback Module
//!
//! Turns parsed measures into sound and into highlight timing.
//!
//! ## Sub-modules
//! - `types` - Scheduler state, step outcomes, playback plan types
//! - `audio` - `ToneSink` capability and the `AudioOutput` lifecycle handle
//! - `scheduler` - Note-by-note walk with start/step/stop and cancellation
//! - `plan` - The same walk laid out as a timeline
//! - `synth` - Native oscillator + envelope rendering into a sample buffer
//!
//! ## State Machine
//! ```text
//!          start()              last note done
//!   Idle ───────────▶ Playing ─────────────────▶ Idle
//!                        │
//!                        └── stop() / cancel ───▶ Idle
//! ```
//!
//! ## Timing
//! A note of `b` beats at `T` BPM lasts `b * 60 / T` seconds. Notes are
//! strictly sequential; a rest only advances the clock. Hosts wait the
//! duration reported by each step, so a full walk takes the sum of all note
//! durations.
//!
//! ## Example
//! ```rust
//! use solfa::parse_transcript;
//! use solfa::playback::{AudioOutput, BufferSink, Scheduler, VirtualPacer, Step};
//! use solfa::{EngineConfig, SolfaError};
//!
//! let config = EngineConfig::default();
//! let measures = parse_transcript("| d r m f |");
//!
//! let synth = config.synth.clone();
//! let mut output = AudioOutput::new(move || Ok::<_, SolfaError>(BufferSink::new(&synth)));
//! let mut scheduler = Scheduler::new(config.mapper(), config.tempo);
//!
//! scheduler.start(measures, 120.0, &mut output).unwrap();
//! let mut pacer = VirtualPacer::new();
//! assert_eq!(scheduler.run(&mut output, &mut pacer), Step::Finished);
//! assert_eq!(pacer.elapsed(), 2.0);
//! ```

mod audio;
mod plan;
mod scheduler;
mod synth;
mod types;


pub use audio::{AudioBackend, AudioOutput, OutputState, ToneSink};
pub use plan::build_plan;
pub use scheduler::{CancelHandle, Pacer, RealTimePacer, Scheduler, VirtualPacer};
pub use synth::{BufferSink, Envelope};
pub use types::{
    beats_to_seconds, PlannedMeasure, PlannedNote, PlaybackPlan, PlaybackState, Step,
};
