//! Audio output capability.
//!
//! The scheduler never talks to a sound API directly. It sends tones to a
//! [`ToneSink`], and acquires that sink through an [`AudioOutput`] handle that
//! owns the backend's lifecycle:
//!
//! 1. **create-if-absent** - the backend is built by a factory on first use
//! 2. **resume** - a suspended backend is resumed before the first tone
//! 3. **reuse** - the same backend serves every later playback session
//!
//! Browsers only allow resuming audio from a user gesture, which is why the
//! suspended state exists at all.

use crate::error::SolfaError;
use log::{debug, warn};

/// Anything that can sound a frequency for a duration.
pub trait ToneSink {
    fn sound_tone(&mut self, frequency: f64, duration_seconds: f64);

    /// Called for rests. Real-time sinks ignore it; offline renderers use it
    /// to keep their timeline in step.
    fn silence(&mut self, _duration_seconds: f64) {}
}

/// Lifecycle state of an audio backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputState {
    Suspended,
    Running,
}

/// A tone sink with a suspend/resume lifecycle.
pub trait AudioBackend: ToneSink {
    fn state(&self) -> OutputState;

    fn resume(&mut self) -> Result<(), SolfaError>;
}

type Factory<B> = Box<dyn FnMut() -> Result<B, SolfaError>>;

/// Owned, lazily created audio backend.
pub struct AudioOutput<B> {
    factory: Factory<B>,
    backend: Option<B>,
}

impl<B: AudioBackend> AudioOutput<B> {
    /// Handle whose backend is built by `factory` on first use.
    pub fn new(factory: impl FnMut() -> Result<B, SolfaError> + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            backend: None,
        }
    }

    /// Handle for hosts without any synthesis backend.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::new(move || Err(SolfaError::AudioUnavailable(reason.clone())))
    }

    /// Backend, building it if this is the first use.
    pub fn acquire(&mut self) -> Result<&mut B, SolfaError> {
        let backend = match self.backend.take() {
            Some(backend) => backend,
            None => {
                debug!("creating audio backend");
                (self.factory)()?
            }
        };
        Ok(self.backend.insert(backend))
    }

    /// Whether a backend exists or can be created.
    pub fn is_available(&mut self) -> bool {
        self.acquire().is_ok()
    }

    /// State of the backend, `None` if it has not been created yet.
    pub fn state(&self) -> Option<OutputState> {
        self.backend.as_ref().map(AudioBackend::state)
    }

    /// Create the backend if needed and make sure it is running.
    pub fn ensure_running(&mut self) -> Result<(), SolfaError> {
        let backend = self.acquire()?;
        if backend.state() == OutputState::Suspended {
            debug!("resuming suspended audio backend");
            backend.resume()?;
        }
        Ok(())
    }

    pub fn into_backend(self) -> Option<B> {
        self.backend
    }
}

impl<B: AudioBackend> ToneSink for AudioOutput<B> {
    fn sound_tone(&mut self, frequency: f64, duration_seconds: f64) {
        match self.backend.as_mut() {
            Some(backend) => backend.sound_tone(frequency, duration_seconds),
            None => warn!("dropping {:.2} Hz tone: audio output not created", frequency),
        }
    }

    fn silence(&mut self, duration_seconds: f64) {
        if let Some(backend) = self.backend.as_mut() {
            backend.silence(duration_seconds);
        }
    }
}
