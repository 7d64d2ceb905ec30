//! Playback scheduler
//!
//! Walks measures note by note and drives a tone sink at a given tempo.
//!
//! The walk is a resumable step function rather than a blocking loop: each
//! call to [`Scheduler::step`] handles exactly one note boundary and reports
//! how long the host should wait before calling again. This lets the same
//! scheduler run under a browser timer, a native sleep loop, or a test with a
//! virtual clock.
//!
//! Cancellation is checked before every tone. A tone already handed to the
//! sink plays to completion.

use super::audio::{AudioBackend, AudioOutput, ToneSink};
use super::types::{beats_to_seconds, check_tempo, PlaybackState, Step};
use crate::error::SolfaError;
use crate::frequency::{Frequency, FrequencyMapper};
use crate::model::{Measure, Note, Syllable};
use log::debug;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Shared cancellation flag for one playback session.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Rc<Cell<bool>>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Waits between scheduler steps.
pub trait Pacer {
    fn wait(&mut self, seconds: f64);
}

/// Sleeps in real time, measured from the first wait.
///
/// Sleep targets are computed from the accumulated schedule rather than from
/// the previous wake-up, so small oversleeps do not add up. When the host
/// falls behind, waits return immediately: notes run late but none is skipped.
#[derive(Debug, Default)]
pub struct RealTimePacer {
    started: Option<Instant>,
    scheduled: f64,
}

impl RealTimePacer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Pacer for RealTimePacer {
    fn wait(&mut self, seconds: f64) {
        let started = *self.started.get_or_insert_with(Instant::now);
        self.scheduled += seconds.max(0.0);
        let remaining = time_until(self.scheduled, started.elapsed());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
    }
}

/// Time left until `offset_seconds` after the start, given `elapsed` so far.
/// Offsets too large for a `Duration` saturate instead of panicking.
fn time_until(offset_seconds: f64, elapsed: Duration) -> Duration {
    Duration::try_from_secs_f64(offset_seconds)
        .unwrap_or(Duration::MAX)
        .saturating_sub(elapsed)
}

/// Advances a logical clock without sleeping.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VirtualPacer {
    elapsed: f64,
}

impl VirtualPacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl Pacer for VirtualPacer {
    fn wait(&mut self, seconds: f64) {
        self.elapsed += seconds;
    }
}

/// State of the walk in progress.
struct Session {
    measures: Rc<[Measure]>,
    tempo: f64,
    measure_index: usize,
    note_index: usize,
    announced: bool,
    current_measure: Option<u32>,
    clock: f64,
    cancel: CancelHandle,
}

enum Phase {
    Idle,
    Playing(Session),
}

type MeasureObserver = Box<dyn FnMut(Option<u32>)>;

/// Note-by-note playback driver.
pub struct Scheduler {
    mapper: FrequencyMapper,
    default_tempo: f64,
    phase: Phase,
    observer: Option<MeasureObserver>,
}

impl Scheduler {
    pub fn new(mapper: FrequencyMapper, default_tempo: f64) -> Self {
        Self {
            mapper,
            default_tempo,
            phase: Phase::Idle,
            observer: None,
        }
    }

    /// Register a callback for "now playing measure N" (`Some(N)`) and
    /// "nothing playing" (`None`) notifications.
    pub fn on_measure_change(&mut self, observer: impl FnMut(Option<u32>) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn mapper(&self) -> &FrequencyMapper {
        &self.mapper
    }

    pub fn state(&self) -> PlaybackState {
        match &self.phase {
            Phase::Idle => PlaybackState::Idle,
            Phase::Playing(session) => PlaybackState::Playing {
                measure_number: session.current_measure,
                elapsed_seconds: session.clock,
            },
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.phase, Phase::Playing(_))
    }

    /// Measure currently sounding, if any.
    pub fn current_measure(&self) -> Option<u32> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Playing(session) => session.current_measure,
        }
    }

    /// Begin a new walk over `measures` at `tempo` beats per minute.
    ///
    /// The audio output is created and resumed first. A walk that is
    /// already playing is cancelled; requests are not queued.
    pub fn start<B: AudioBackend>(
        &mut self,
        measures: impl Into<Rc<[Measure]>>,
        tempo: f64,
        output: &mut AudioOutput<B>,
    ) -> Result<CancelHandle, SolfaError> {
        if let Phase::Playing(previous) = &self.phase {
            debug!("cancelling previous playback session");
            previous.cancel.cancel();
            self.enter_idle();
        }

        let tempo = check_tempo(tempo)?;
        output.ensure_running()?;

        let cancel = CancelHandle::default();
        let measures = measures.into();
        debug!(
            "starting playback of {} measures at {} BPM",
            measures.len(),
            tempo
        );
        self.phase = Phase::Playing(Session {
            measures,
            tempo,
            measure_index: 0,
            note_index: 0,
            announced: false,
            current_measure: None,
            clock: 0.0,
            cancel: cancel.clone(),
        });
        Ok(cancel)
    }

    /// Stop the walk now. Does nothing when idle.
    pub fn stop(&mut self) {
        if let Phase::Playing(session) = &self.phase {
            debug!("stopping playback at {:.3}s", session.clock);
            session.cancel.cancel();
            self.enter_idle();
        }
    }

    /// Handle the next note boundary.
    pub fn step(&mut self, sink: &mut impl ToneSink) -> Step {
        let outcome = match &mut self.phase {
            Phase::Idle => return Step::Idle,
            Phase::Playing(session) => {
                advance(session, &self.mapper, &mut self.observer, sink)
            }
        };
        if outcome.is_terminal() {
            debug!("playback ended: {:?}", outcome);
            self.enter_idle();
        }
        outcome
    }

    /// Step until the walk ends, waiting on `pacer` between notes.
    pub fn run(&mut self, sink: &mut impl ToneSink, pacer: &mut impl Pacer) -> Step {
        loop {
            let step = self.step(sink);
            match step.wait_seconds() {
                Some(seconds) => pacer.wait(seconds),
                None => return step,
            }
        }
    }

    /// Sound one note outside any walk, at the default tempo.
    ///
    /// Returns the frequency that was played (`Silent` for rests).
    pub fn play_single_note<B: AudioBackend>(
        &self,
        note: &Note,
        output: &mut AudioOutput<B>,
    ) -> Result<Frequency, SolfaError> {
        let tempo = check_tempo(self.default_tempo)?;
        output.ensure_running()?;
        let seconds = beats_to_seconds(note.duration_beats, tempo);
        let frequency = self.mapper.note_frequency(note);
        match frequency {
            Frequency::Hz(hz) => output.sound_tone(hz, seconds),
            Frequency::Silent => output.silence(seconds),
        }
        Ok(frequency)
    }

    /// Sound a one-beat syllable, e.g. when a syllable is clicked.
    pub fn play_syllable<B: AudioBackend>(
        &self,
        syllable: Syllable,
        octave_modifier: i32,
        output: &mut AudioOutput<B>,
    ) -> Result<Frequency, SolfaError> {
        self.play_single_note(&Note::new(syllable, octave_modifier, 1.0), output)
    }

    fn enter_idle(&mut self) {
        self.phase = Phase::Idle;
        if let Some(observer) = self.observer.as_mut() {
            observer(None);
        }
    }
}

/// Move `session` forward by one note, sounding it through `sink`.
fn advance(
    session: &mut Session,
    mapper: &FrequencyMapper,
    observer: &mut Option<MeasureObserver>,
    sink: &mut impl ToneSink,
) -> Step {
    loop {
        if session.cancel.is_cancelled() {
            return Step::Cancelled;
        }

        let Some(measure) = session.measures.get(session.measure_index) else {
            return Step::Finished;
        };

        if !session.announced {
            session.announced = true;
            session.current_measure = Some(measure.number);
            if let Some(observer) = observer.as_mut() {
                observer(Some(measure.number));
            }
            continue;
        }

        let Some(note) = measure.notes.get(session.note_index) else {
            session.measure_index += 1;
            session.note_index = 0;
            session.announced = false;
            continue;
        };
        session.note_index += 1;

        let duration_seconds = beats_to_seconds(note.duration_beats, session.tempo);
        session.clock += duration_seconds;

        return match mapper.note_frequency(note) {
            Frequency::Hz(frequency) => {
                sink.sound_tone(frequency, duration_seconds);
                Step::Sounded {
                    measure_number: measure.number,
                    frequency,
                    duration_seconds,
                }
            }
            Frequency::Silent => {
                sink.silence(duration_seconds);
                Step::Rested {
                    measure_number: measure.number,
                    duration_seconds,
                }
            }
        };
    }
}
