//! # Solfa
//!
//! Tonic sol-fa notation engine: parses sol-fa transcripts and structured
//! measure documents into a measure/note model, maps syllables to pitches in a
//! movable-do key, and plays the result note by note through a pluggable tone
//! sink.
//!
//! ## Pipeline
//! ```text
//! transcript / document ─▶ parser ─▶ Vec<Measure> ─┬─▶ render_notes (display)
//!                                                  ├─▶ build_plan (timeline)
//!                                                  └─▶ Scheduler ─▶ ToneSink
//! ```
//!
//! ## Example
//! ```rust
//! use solfa::{frequency, parse_transcript, Frequency, KeyRoot, Syllable};
//!
//! let measures = parse_transcript("| d' - s, 0 |");
//! assert_eq!(measures[0].notes.len(), 3);
//!
//! let la = frequency(Syllable::La, 4, KeyRoot::C);
//! assert_eq!(la, Frequency::Hz(440.0));
//! ```

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod format;
pub mod frequency;
pub mod lint;
pub mod model;
pub mod parser;
pub mod playback;
pub mod render;

pub use api::{
    format_document_json, lint_transcript, lint_transcript_with_options, plan_transcript,
    render_transcript,
};
pub use classifier::{classify, Classification};
pub use config::{EngineConfig, SynthConfig, DEFAULT_TEMPO};
pub use error::SolfaError;
pub use format::to_transcript;
pub use frequency::{frequency, Frequency, FrequencyMapper, KeyRoot, Pitch};
pub use lint::{lint, Warning, WarningKind};
pub use model::*;
pub use parser::metadata::{
    parse_transcript_document, parse_transcript_document_with_options, read_header_metadata,
};
pub use parser::structured::{parse_document, parse_document_json, parse_document_yaml};
pub use parser::{parse_transcript, parse_transcript_with_options, ParseOptions};
pub use playback::{build_plan, PlaybackPlan, Scheduler, ToneSink};
pub use render::{render_notes, DurationClass, RenderNote};
