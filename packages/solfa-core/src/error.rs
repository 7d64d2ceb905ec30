//! # Error Types
//!
//! This module defines the error type for the solfa engine.
//!
//! Parsing and classification are total: malformed notation degrades to rests,
//! dropped sustains or skipped lines instead of failing. The variants below only
//! cover the edges of the engine where a caller hands us something we cannot
//! decode or use.
//!
//! ## Error Types
//! - `Document` - A structured measure document could not be decoded
//! - `Config` - Engine configuration YAML could not be decoded or is invalid
//! - `AudioUnavailable` - No synthesis backend could be created
//! - `InvalidTempo` - Playback was requested with a non-positive tempo
//!
//! ## Usage
//! ```rust
//! use solfa::{parse_document_json, SolfaError};
//!
//! match parse_document_json("{ not json") {
//!     Ok(doc) => println!("{} measures", doc.measures.len()),
//!     Err(SolfaError::Document(message)) => eprintln!("bad document: {}", message),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolfaError {
    /// A structured document failed to decode.
    ///
    /// # Example
    /// ```
    /// # use solfa::SolfaError;
    /// let err = SolfaError::Document("missing field `measures`".to_string());
    /// assert_eq!(err.to_string(), "Invalid measure document: missing field `measures`");
    /// ```
    #[error("Invalid measure document: {0}")]
    Document(String),

    /// Configuration could not be decoded or holds an unusable value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The host has no audio backend. Parsing and rendering still work.
    #[error("Audio output unavailable: {0}")]
    AudioUnavailable(String),

    /// Tempo must be a positive, finite number of beats per minute.
    ///
    /// # Example
    /// ```
    /// # use solfa::SolfaError;
    /// let err = SolfaError::InvalidTempo(0.0);
    /// assert_eq!(err.to_string(), "Invalid tempo: 0 BPM");
    /// ```
    #[error("Invalid tempo: {0} BPM")]
    InvalidTempo(f64),
}
