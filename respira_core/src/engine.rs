//! Breathing cycle engine.
//!
//! The engine is a tick-driven state machine. It owns no timer: the caller
//! invokes `tick()` once per elapsed second while the engine is running and
//! forwards the returned notifications to whatever renders them.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped --start/resume--> Running --pause--> Stopped
//!    ^                         |
//!    +-------reset/select------+
//! ```
//!
//! While running, each tick counts the current phase down by one second. When
//! the countdown reaches zero the engine moves to the next step of the
//! exercise's sequence in the same tick, wrapping back to the first step and
//! counting a completed cycle after the last one.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = BreathingEngine::new();
//! engine.select_exercise(ExerciseKind::Square);
//! engine.start();
//! // Once per second:
//! for notification in engine.tick() { /* render */ }
//! ```

use crate::{
    catalog::get_default_catalog, Config, EngineSnapshot, Error, ExerciseKind, Notification,
    Offset, Phase, PhaseDurations, Result,
};

/// Mutable runtime record of the engine
///
/// The current phase is stored as an index into the exercise's sequence so it
/// can never name a phase outside that sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineState {
    pub exercise: ExerciseKind,
    pub step_index: usize,
    pub remaining_secs: u8,
    pub running: bool,
    pub cycles_completed: u32,
    pub sound_enabled: bool,
    pub durations: PhaseDurations,
}

impl Default for EngineState {
    fn default() -> Self {
        let durations = PhaseDurations::default();
        let exercise = ExerciseKind::default();
        Self {
            exercise,
            step_index: 0,
            remaining_secs: first_phase_secs(exercise, &durations),
            running: false,
            cycles_completed: 0,
            sound_enabled: true,
            durations,
        }
    }
}

fn first_phase_secs(exercise: ExerciseKind, durations: &PhaseDurations) -> u8 {
    exercise
        .phases()
        .first()
        .map(|p| durations.get(*p))
        .unwrap_or(0)
}

/// Breathing cycle engine
#[derive(Clone, Debug, Default)]
pub struct BreathingEngine {
    state: EngineState,
}

impl BreathingEngine {
    /// Create an engine with the default exercise and durations
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stopped engine from configured defaults
    pub fn with_config(config: &Config) -> Result<Self> {
        config.durations.validate()?;

        let mut engine = Self::new();
        engine.state.exercise = config.exercise.default;
        engine.state.durations = config.durations;
        engine.state.sound_enabled = config.sound.enabled;
        engine.rewind();
        Ok(engine)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.state.exercise
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn remaining_secs(&self) -> u8 {
        self.state.remaining_secs
    }

    pub fn cycles_completed(&self) -> u32 {
        self.state.cycles_completed
    }

    pub fn sound_enabled(&self) -> bool {
        self.state.sound_enabled
    }

    pub fn durations(&self) -> &PhaseDurations {
        &self.state.durations
    }

    pub fn step_index(&self) -> usize {
        self.state.step_index
    }

    pub fn current_phase(&self) -> Phase {
        self.phases()
            .get(self.state.step_index)
            .copied()
            .unwrap_or(Phase::Inspire)
    }

    pub fn current_phase_label(&self) -> &'static str {
        self.current_phase().label()
    }

    pub fn current_phase_style_class(&self) -> &'static str {
        self.current_phase().style_class()
    }

    /// Offset of the guide ball for the current step
    pub fn ball_position(&self) -> Offset {
        get_default_catalog()
            .definition(self.state.exercise)
            .position(self.state.step_index)
            .unwrap_or(Offset::new(0, 0))
    }

    /// Build a full state snapshot for renderers
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            exercise: self.state.exercise,
            phase: self.current_phase(),
            step_index: self.state.step_index,
            label: self.current_phase_label().to_string(),
            style_class: self.current_phase_style_class().to_string(),
            ball: self.ball_position(),
            remaining_secs: self.state.remaining_secs,
            running: self.state.running,
            cycles_completed: self.state.cycles_completed,
            sound_enabled: self.state.sound_enabled,
            durations: self.state.durations,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Switch exercise; implies a reset
    pub fn select_exercise(&mut self, kind: ExerciseKind) {
        tracing::debug!("Selecting exercise {}", kind);
        self.state.exercise = kind;
        self.reset();
    }

    /// Change one phase duration
    ///
    /// Rejected while running or when `seconds` falls outside 1..=10; the
    /// stored durations are left untouched on rejection. The countdown in
    /// progress is not affected; the new value applies from the next time the
    /// phase is entered.
    pub fn set_duration(&mut self, phase: Phase, seconds: u8) -> Result<()> {
        if self.state.running {
            tracing::debug!("Ignoring duration change for {} while running", phase);
            return Err(Error::InvalidStateTransition(format!(
                "cannot change {} duration while the exercise is running",
                phase
            )));
        }

        self.state.durations.set(phase, seconds)?;
        tracing::debug!("Set {} duration to {}s", phase, seconds);
        Ok(())
    }

    /// Start (or restart) from the first phase of the sequence
    pub fn start(&mut self) {
        self.state.running = true;
        self.state.step_index = 0;
        self.state.remaining_secs = self.phase_secs(0);
        tracing::debug!(
            "Started {} with {}s of {}",
            self.state.exercise,
            self.state.remaining_secs,
            self.current_phase()
        );
    }

    /// Stop ticking; phase and countdown are kept
    pub fn pause(&mut self) {
        self.state.running = false;
        tracing::debug!(
            "Paused in {} with {}s left",
            self.current_phase(),
            self.state.remaining_secs
        );
    }

    /// Continue from where `pause` left off
    pub fn resume(&mut self) {
        if self.state.running {
            return;
        }
        self.state.running = true;
        tracing::debug!(
            "Resumed in {} with {}s left",
            self.current_phase(),
            self.state.remaining_secs
        );
    }

    /// Stop and rewind to the first phase, clearing the cycle count
    pub fn reset(&mut self) {
        self.state.running = false;
        self.rewind();
        tracing::debug!("Reset {}", self.state.exercise);
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.state.sound_enabled = !self.state.sound_enabled;
        self.state.sound_enabled
    }

    /// Advance the countdown by one second
    ///
    /// Does nothing while stopped. Reaching zero moves to the next phase in
    /// the same tick.
    pub fn tick(&mut self) -> Vec<Notification> {
        if !self.state.running {
            return Vec::new();
        }

        if self.state.remaining_secs > 0 {
            self.state.remaining_secs -= 1;
            if self.state.remaining_secs > 0 {
                return vec![Notification::Tick {
                    remaining_secs: self.state.remaining_secs,
                }];
            }
        }

        self.next_phase()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn phases(&self) -> &'static [Phase] {
        self.state.exercise.phases()
    }

    fn phase_secs(&self, step_index: usize) -> u8 {
        self.phases()
            .get(step_index)
            .map(|p| self.state.durations.get(*p))
            .unwrap_or(0)
    }

    fn rewind(&mut self) {
        self.state.step_index = 0;
        self.state.remaining_secs = self.phase_secs(0);
        self.state.cycles_completed = 0;
    }

    fn next_phase(&mut self) -> Vec<Notification> {
        let len = self.phases().len().max(1);
        let idx = self.state.step_index;

        if idx + 1 >= len {
            self.state.cycles_completed += 1;
            tracing::debug!("Completed cycle {}", self.state.cycles_completed);
        }

        let next = (idx + 1) % len;
        self.state.step_index = next;
        self.state.remaining_secs = self.phase_secs(next);

        let phase = self.current_phase();
        tracing::debug!("Entering {} for {}s", phase, self.state.remaining_secs);

        let mut notifications = vec![Notification::PhaseChanged {
            phase,
            step_index: next,
            remaining_secs: self.state.remaining_secs,
            cycles_completed: self.state.cycles_completed,
        }];
        if self.state.sound_enabled {
            notifications.push(Notification::PlayCue);
        }
        notifications
    }
}
