//! Session driver: the one-second timer source around the engine.
//!
//! The driver starts the engine, waits one tick period between calls to
//! `tick()`, hands every notification to an observer and sounds cues through a
//! [`CuePlayer`]. Waiting is delegated to a [`Pacer`] so tests and fast runs can
//! skip the real sleep.

use crate::{
    BreathingEngine, CuePlayer, Error, ExerciseKind, Notification, PhaseDurations, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Interval between engine ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Waits between ticks
pub trait Pacer {
    fn wait(&mut self, period: Duration);
}

/// Sleeps the current thread for the full period
#[derive(Debug, Default)]
pub struct SleepPacer;

impl Pacer for SleepPacer {
    fn wait(&mut self, period: Duration) {
        std::thread::sleep(period);
    }
}

/// Returns immediately; runs a session as fast as the engine can tick
#[derive(Debug, Default)]
pub struct InstantPacer;

impl Pacer for InstantPacer {
    fn wait(&mut self, _period: Duration) {}
}

/// When a session ends
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopCondition {
    /// After this many completed cycles
    Cycles(u32),
    /// After this many ticks
    Seconds(u32),
}

impl StopCondition {
    fn reached(&self, cycles_completed: u32, elapsed_secs: u32) -> bool {
        match *self {
            StopCondition::Cycles(n) => cycles_completed >= n,
            StopCondition::Seconds(n) => elapsed_secs >= n,
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, StopCondition::Cycles(0) | StopCondition::Seconds(0))
    }
}

/// Outcome of one driven session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSummary {
    pub exercise: ExerciseKind,
    pub durations: PhaseDurations,
    pub cycles_completed: u32,
    pub elapsed_secs: u32,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

/// Drives a [`BreathingEngine`] at a fixed cadence
pub struct SessionDriver<P: Pacer, C: CuePlayer> {
    pacer: P,
    cue: C,
}

impl<P: Pacer, C: CuePlayer> SessionDriver<P, C> {
    pub fn new(pacer: P, cue: C) -> Self {
        Self { pacer, cue }
    }

    /// Run a session until `stop` is reached
    ///
    /// The observer first sees the starting phase, then every notification the
    /// engine emits. The engine is left paused when the session ends.
    pub fn run<F>(
        &mut self,
        engine: &mut BreathingEngine,
        stop: StopCondition,
        mut observer: F,
    ) -> Result<SessionSummary>
    where
        F: FnMut(&BreathingEngine, &Notification),
    {
        if stop.is_empty() {
            return Err(Error::Other(format!(
                "Session would end before it starts: {:?}",
                stop
            )));
        }

        let started_at = Utc::now();
        engine.start();
        tracing::info!("Starting {} session ({:?})", engine.exercise(), stop);

        let opening = Notification::PhaseChanged {
            phase: engine.current_phase(),
            step_index: engine.step_index(),
            remaining_secs: engine.remaining_secs(),
            cycles_completed: engine.cycles_completed(),
        };
        observer(engine, &opening);

        let mut elapsed_secs = 0u32;
        while engine.is_running() && !stop.reached(engine.cycles_completed(), elapsed_secs) {
            self.pacer.wait(TICK_PERIOD);
            elapsed_secs += 1;

            for notification in engine.tick() {
                if notification == Notification::PlayCue {
                    if let Err(e) = self.cue.play_cue() {
                        tracing::debug!("Cue playback failed: {}", e);
                    }
                }
                observer(engine, &notification);
            }
        }

        engine.pause();

        let summary = SessionSummary {
            exercise: engine.exercise(),
            durations: *engine.durations(),
            cycles_completed: engine.cycles_completed(),
            elapsed_secs,
            started_at,
            ended_at: Utc::now(),
        };

        tracing::info!(
            "Finished {} session: {} cycles in {}s",
            summary.exercise,
            summary.cycles_completed,
            summary.elapsed_secs
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Phase, SilentCue};

    /// Counts waits instead of sleeping
    #[derive(Default)]
    struct CountingPacer {
        waits: u32,
    }

    impl Pacer for CountingPacer {
        fn wait(&mut self, period: Duration) {
            assert_eq!(period, TICK_PERIOD);
            self.waits += 1;
        }
    }

    /// Cue player that always fails
    #[derive(Default)]
    struct BrokenCue {
        attempts: u32,
    }

    impl CuePlayer for BrokenCue {
        fn play_cue(&mut self) -> Result<()> {
            self.attempts += 1;
            Err(Error::Other("no audio device".into()))
        }
    }

    #[test]
    fn test_runs_until_cycle_count() {
        crate::logging::init_test();

        let mut engine = BreathingEngine::new();
        engine.select_exercise(ExerciseKind::Square);
        let mut driver = SessionDriver::new(CountingPacer::default(), SilentCue);

        let summary = driver
            .run(&mut engine, StopCondition::Cycles(2), |_, _| {})
            .unwrap();

        assert_eq!(summary.exercise, ExerciseKind::Square);
        assert_eq!(summary.cycles_completed, 2);
        assert_eq!(summary.elapsed_secs, 32);
        assert_eq!(driver.pacer.waits, 32);
        assert!(!engine.is_running());
        assert!(summary.ended_at >= summary.started_at);
    }

    #[test]
    fn test_runs_for_fixed_seconds() {
        let mut engine = BreathingEngine::new();
        let mut driver = SessionDriver::new(InstantPacer, SilentCue);

        let summary = driver
            .run(&mut engine, StopCondition::Seconds(6), |_, _| {})
            .unwrap();

        assert_eq!(summary.elapsed_secs, 6);
        assert_eq!(summary.cycles_completed, 0);
        assert_eq!(engine.current_phase(), Phase::Expire);
        assert_eq!(engine.remaining_secs(), 2);
    }

    #[test]
    fn test_observer_sees_opening_phase_and_transitions() {
        let mut engine = BreathingEngine::new();
        let mut driver = SessionDriver::new(InstantPacer, SilentCue);
        let mut seen = Vec::new();

        driver
            .run(&mut engine, StopCondition::Cycles(1), |_, n| seen.push(n.clone()))
            .unwrap();

        assert_eq!(
            seen.first(),
            Some(&Notification::PhaseChanged {
                phase: Phase::Inspire,
                step_index: 0,
                remaining_secs: 4,
                cycles_completed: 0,
            })
        );
        let changes = seen
            .iter()
            .filter(|n| matches!(n, Notification::PhaseChanged { .. }))
            .count();
        assert_eq!(changes, 3);
        assert_eq!(seen.iter().filter(|n| **n == Notification::PlayCue).count(), 2);
    }

    #[test]
    fn test_cue_failures_are_swallowed() {
        let mut engine = BreathingEngine::new();
        let mut driver = SessionDriver::new(InstantPacer, BrokenCue::default());

        let summary = driver
            .run(&mut engine, StopCondition::Cycles(3), |_, _| {})
            .unwrap();

        assert_eq!(summary.cycles_completed, 3);
        assert_eq!(driver.cue.attempts, 6);
    }

    #[test]
    fn test_muted_engine_plays_no_cues() {
        let mut engine = BreathingEngine::new();
        engine.toggle_sound();
        let mut driver = SessionDriver::new(InstantPacer, BrokenCue::default());

        driver
            .run(&mut engine, StopCondition::Cycles(1), |_, _| {})
            .unwrap();

        assert_eq!(driver.cue.attempts, 0);
    }

    #[test]
    fn test_empty_stop_condition_rejected() {
        let mut engine = BreathingEngine::new();
        let mut driver = SessionDriver::new(InstantPacer, SilentCue);

        assert!(driver
            .run(&mut engine, StopCondition::Cycles(0), |_, _| {})
            .is_err());
        assert!(!engine.is_running());
    }
}
