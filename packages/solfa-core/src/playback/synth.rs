//! Native tone synthesis.
//!
//! A sine oscillator shaped by a linear attack/release envelope, rendered
//! into an in-memory sample buffer. Tones are appended one after another, so
//! the buffer's length always equals the scheduler's logical clock.

use super::audio::{AudioBackend, OutputState, ToneSink};
use crate::config::SynthConfig;
use crate::error::SolfaError;
use std::f64::consts::TAU;

/// Attack/release envelope.
///
/// Both ramps are shortened to half the tone when the tone is shorter than
/// attack + release, so short notes still start and end at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub attack: f64,
    pub release: f64,
}

impl Envelope {
    pub fn new(attack: f64, release: f64) -> Self {
        Self {
            attack: attack.max(0.0),
            release: release.max(0.0),
        }
    }

    /// Amplitude in 0.0..=1.0 at `t` seconds into a tone of `duration` seconds.
    pub fn amplitude(&self, t: f64, duration: f64) -> f64 {
        if t < 0.0 || t >= duration {
            return 0.0;
        }
        let attack = self.attack.min(duration / 2.0);
        let release = self.release.min(duration / 2.0);
        let remaining = duration - t;

        let rise = if attack > 0.0 { (t / attack).min(1.0) } else { 1.0 };
        let fall = if release > 0.0 {
            (remaining / release).min(1.0)
        } else {
            1.0
        };
        rise.min(fall)
    }
}

/// Offline synthesizer collecting mono `f32` samples.
#[derive(Debug, Clone)]
pub struct BufferSink {
    sample_rate: u32,
    gain: f32,
    envelope: Envelope,
    samples: Vec<f32>,
    state: OutputState,
}

impl BufferSink {
    /// A suspended synthesizer; the scheduler resumes it on first use.
    pub fn new(config: &SynthConfig) -> Self {
        Self {
            sample_rate: config.sample_rate.max(1),
            gain: config.gain.clamp(0.0, 1.0),
            envelope: Envelope::new(config.attack, config.release),
            samples: Vec::new(),
            state: OutputState::Suspended,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    fn sample_count(&self, duration_seconds: f64) -> usize {
        (duration_seconds.max(0.0) * self.sample_rate as f64).round() as usize
    }
}

impl ToneSink for BufferSink {
    fn sound_tone(&mut self, frequency: f64, duration_seconds: f64) {
        let count = self.sample_count(duration_seconds);
        let rate = self.sample_rate as f64;
        let envelope = self.envelope;
        let gain = self.gain as f64;

        self.samples.extend((0..count).map(|i| {
            let t = i as f64 / rate;
            let amplitude = envelope.amplitude(t, duration_seconds);
            ((TAU * frequency * t).sin() * amplitude * gain) as f32
        }));
    }

    fn silence(&mut self, duration_seconds: f64) {
        let count = self.sample_count(duration_seconds);
        self.samples.resize(self.samples.len() + count, 0.0);
    }
}

impl AudioBackend for BufferSink {
    fn state(&self) -> OutputState {
        self.state
    }

    fn resume(&mut self) -> Result<(), SolfaError> {
        self.state = OutputState::Running;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> BufferSink {
        BufferSink::new(&SynthConfig {
            sample_rate: 1000,
            attack: 0.01,
            release: 0.01,
            gain: 0.5,
        })
    }

    #[test]
    fn test_envelope_shape() {
        let env = Envelope::new(0.1, 0.2);
        assert_eq!(env.amplitude(0.0, 1.0), 0.0);
        assert!((env.amplitude(0.05, 1.0) - 0.5).abs() < 1e-9);
        assert_eq!(env.amplitude(0.5, 1.0), 1.0);
        assert!((env.amplitude(0.9, 1.0) - 0.5).abs() < 1e-9);
        assert_eq!(env.amplitude(1.0, 1.0), 0.0);
    }

    #[test]
    fn test_envelope_short_tone() {
        let env = Envelope::new(1.0, 1.0);
        assert!((env.amplitude(0.05, 0.2) - 0.5).abs() < 1e-9);
        assert!(env.amplitude(0.1, 0.2) <= 1.0);
    }

    #[test]
    fn test_tone_length_and_gain() {
        let mut sink = sink();
        sink.sound_tone(100.0, 0.5);
        assert_eq!(sink.samples().len(), 500);
        assert!(sink.samples().iter().all(|s| s.abs() <= 0.5 + 1e-6));
        assert!(sink.samples().iter().any(|s| s.abs() > 0.4));
    }

    #[test]
    fn test_silence_keeps_timeline() {
        let mut sink = sink();
        sink.sound_tone(100.0, 0.25);
        sink.silence(0.25);
        assert_eq!(sink.samples().len(), 500);
        assert!(sink.samples()[250..].iter().all(|s| *s == 0.0));
        assert!((sink.duration_seconds() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_starts_suspended() {
        let mut sink = sink();
        assert_eq!(sink.state(), OutputState::Suspended);
        sink.resume().unwrap();
        assert_eq!(sink.state(), OutputState::Running);
    }
}
