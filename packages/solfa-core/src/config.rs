//! Engine configuration.
//!
//! Read from YAML in the same kebab-case style as score frontmatter:
//!
//! ```yaml
//! tempo: 96
//! key: G
//! reference-octave: 4
//! fallback-frequency: 440
//! beats-per-measure: 3
//! synth:
//!   sample-rate: 44100
//!   attack: 0.01
//!   release: 0.08
//!   gain: 0.3
//! ```
//!
//! Every field is optional.

use crate::error::SolfaError;
use crate::frequency::{FrequencyMapper, KeyRoot, DEFAULT_FREQUENCY, REFERENCE_OCTAVE};
use crate::parser::ParseOptions;
use serde::{Deserialize, Serialize};

/// Default tempo in quarter-note beats per minute.
pub const DEFAULT_TEMPO: f64 = 120.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    pub tempo: f64,
    pub key: String,
    pub reference_octave: i32,
    pub fallback_frequency: f64,
    pub beats_per_measure: u32,
    pub synth: SynthConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tempo: DEFAULT_TEMPO,
            key: "C".to_string(),
            reference_octave: REFERENCE_OCTAVE,
            fallback_frequency: DEFAULT_FREQUENCY,
            beats_per_measure: 4,
            synth: SynthConfig::default(),
        }
    }
}

/// Oscillator and envelope settings for the native synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SynthConfig {
    pub sample_rate: u32,
    /// Attack time in seconds.
    pub attack: f64,
    /// Release time in seconds.
    pub release: f64,
    pub gain: f32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            attack: 0.01,
            release: 0.05,
            gain: 0.3,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a YAML configuration.
    pub fn from_yaml(source: &str) -> Result<Self, SolfaError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(source).map_err(|e| SolfaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SolfaError> {
        if !(self.tempo.is_finite() && self.tempo > 0.0) {
            return Err(SolfaError::InvalidTempo(self.tempo));
        }
        if KeyRoot::parse(&self.key).is_none() {
            return Err(SolfaError::Config(format!("unknown key '{}'", self.key)));
        }
        if !(self.fallback_frequency.is_finite() && self.fallback_frequency > 0.0) {
            return Err(SolfaError::Config(format!(
                "fallback-frequency must be positive, got {}",
                self.fallback_frequency
            )));
        }
        if self.beats_per_measure == 0 {
            return Err(SolfaError::Config(
                "beats-per-measure must be at least 1".to_string(),
            ));
        }
        if self.synth.sample_rate == 0 {
            return Err(SolfaError::Config("sample-rate must be positive".to_string()));
        }
        if self.synth.attack < 0.0 || self.synth.release < 0.0 {
            return Err(SolfaError::Config(
                "attack and release must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn key_root(&self) -> KeyRoot {
        KeyRoot::parse_or_default(Some(&self.key))
    }

    pub fn mapper(&self) -> FrequencyMapper {
        FrequencyMapper::new(self.key_root())
            .with_reference_octave(self.reference_octave)
            .with_fallback(self.fallback_frequency)
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            beats_per_measure: self.beats_per_measure,
        }
    }
}
