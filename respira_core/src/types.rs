//! Core domain types for the Respira breathing engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise kinds and breathing phases
//! - Per-phase durations with their bounds
//! - Outbound notifications emitted by the engine
//! - Snapshots consumed by renderers

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shortest allowed phase, in seconds
pub const MIN_PHASE_SECONDS: u8 = 1;

/// Longest allowed phase, in seconds
pub const MAX_PHASE_SECONDS: u8 = 10;

/// Default length of every phase, in seconds
pub const DEFAULT_PHASE_SECONDS: u8 = 4;

// ============================================================================
// Exercise and Phase Types
// ============================================================================

/// Breathing pattern selected by the user
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    #[default]
    Coherence,
    Square,
    Triangle,
}

impl ExerciseKind {
    /// All exercise kinds, in display order
    pub const ALL: [ExerciseKind; 3] = [
        ExerciseKind::Coherence,
        ExerciseKind::Square,
        ExerciseKind::Triangle,
    ];

    pub(crate) fn index(&self) -> usize {
        match self {
            ExerciseKind::Coherence => 0,
            ExerciseKind::Square => 1,
            ExerciseKind::Triangle => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseKind::Coherence => "coherence",
            ExerciseKind::Square => "square",
            ExerciseKind::Triangle => "triangle",
        }
    }

    /// Ordered phase sequence for this exercise
    pub fn phases(&self) -> &'static [Phase] {
        crate::catalog::get_default_catalog().definition(*self).phases
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ExerciseKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "coherence" => Ok(ExerciseKind::Coherence),
            "square" => Ok(ExerciseKind::Square),
            "triangle" => Ok(ExerciseKind::Triangle),
            _ => Err(Error::UnknownExercise(s.to_string())),
        }
    }
}

/// One named segment of a breathing cycle
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Inspire,
    Hold,
    Expire,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Inspire => "inspire",
            Phase::Hold => "hold",
            Phase::Expire => "expire",
        }
    }

    /// Display label shown to the user (fixed French locale)
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Inspire => "Inspirez",
            Phase::Hold => "Retenez",
            Phase::Expire => "Expirez",
        }
    }

    /// Presentation classifier used by renderers to pick a style
    pub fn style_class(&self) -> &'static str {
        match self {
            Phase::Inspire => "phase-inspire",
            Phase::Hold => "phase-hold",
            Phase::Expire => "phase-expire",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "inspire" => Ok(Phase::Inspire),
            "hold" => Ok(Phase::Hold),
            "expire" => Ok(Phase::Expire),
            _ => Err(Error::UnknownPhase(s.to_string())),
        }
    }
}

// ============================================================================
// Durations
// ============================================================================

/// Seconds spent in each phase
///
/// A phase name maps to one duration regardless of how often it appears in a
/// sequence, so both `hold` steps of the square exercise share a value.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseDurations {
    #[serde(default = "default_phase_seconds")]
    pub inspire: u8,
    #[serde(default = "default_phase_seconds")]
    pub hold: u8,
    #[serde(default = "default_phase_seconds")]
    pub expire: u8,
}

fn default_phase_seconds() -> u8 {
    DEFAULT_PHASE_SECONDS
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            inspire: DEFAULT_PHASE_SECONDS,
            hold: DEFAULT_PHASE_SECONDS,
            expire: DEFAULT_PHASE_SECONDS,
        }
    }
}

impl PhaseDurations {
    pub fn get(&self, phase: Phase) -> u8 {
        match phase {
            Phase::Inspire => self.inspire,
            Phase::Hold => self.hold,
            Phase::Expire => self.expire,
        }
    }

    /// Update one phase, rejecting values outside the allowed range
    pub fn set(&mut self, phase: Phase, seconds: u8) -> Result<()> {
        check_phase_seconds(phase, seconds)?;
        match phase {
            Phase::Inspire => self.inspire = seconds,
            Phase::Hold => self.hold = seconds,
            Phase::Expire => self.expire = seconds,
        }
        Ok(())
    }

    /// Check every phase against the allowed range
    pub fn validate(&self) -> Result<()> {
        check_phase_seconds(Phase::Inspire, self.inspire)?;
        check_phase_seconds(Phase::Hold, self.hold)?;
        check_phase_seconds(Phase::Expire, self.expire)
    }

    /// Length of one full cycle of `kind`, in seconds
    pub fn cycle_seconds(&self, kind: ExerciseKind) -> u32 {
        kind.phases().iter().map(|p| u32::from(self.get(*p))).sum()
    }
}

fn check_phase_seconds(phase: Phase, seconds: u8) -> Result<()> {
    if (MIN_PHASE_SECONDS..=MAX_PHASE_SECONDS).contains(&seconds) {
        Ok(())
    } else {
        Err(Error::InvalidDuration { phase, seconds })
    }
}

// ============================================================================
// Presentation Types
// ============================================================================

/// 2D offset of the guide ball relative to the centre of the figure
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Outbound signal from the engine to the presentation layer
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// Countdown moved within the current phase
    Tick { remaining_secs: u8 },
    /// A new phase began
    PhaseChanged {
        phase: Phase,
        step_index: usize,
        remaining_secs: u8,
        cycles_completed: u32,
    },
    /// Fire-and-forget audio cue request
    PlayCue,
}

/// Everything a renderer needs to draw the current engine state
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EngineSnapshot {
    pub exercise: ExerciseKind,
    pub phase: Phase,
    pub step_index: usize,
    pub label: String,
    pub style_class: String,
    pub ball: Offset,
    pub remaining_secs: u8,
    pub running: bool,
    pub cycles_completed: u32,
    pub sound_enabled: bool,
    pub durations: PhaseDurations,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exercise_kind_parsing() {
        assert_eq!("square".parse::<ExerciseKind>().unwrap(), ExerciseKind::Square);
        assert_eq!(" Triangle ".parse::<ExerciseKind>().unwrap(), ExerciseKind::Triangle);
        assert!(matches!(
            "box".parse::<ExerciseKind>(),
            Err(Error::UnknownExercise(_))
        ));
    }

    #[test]
    fn test_phase_parsing() {
        assert_eq!("HOLD".parse::<Phase>().unwrap(), Phase::Hold);
        assert!(matches!("pause".parse::<Phase>(), Err(Error::UnknownPhase(_))));
    }

    #[test]
    fn test_durations_reject_out_of_range() {
        let mut durations = PhaseDurations::default();

        assert!(matches!(
            durations.set(Phase::Hold, 0),
            Err(Error::InvalidDuration { phase: Phase::Hold, seconds: 0 })
        ));
        assert!(durations.set(Phase::Hold, 11).is_err());
        assert_eq!(durations.hold, 4);

        durations.set(Phase::Hold, 10).unwrap();
        durations.set(Phase::Inspire, 1).unwrap();
        assert_eq!(durations.get(Phase::Hold), 10);
        assert_eq!(durations.get(Phase::Inspire), 1);
    }

    #[test]
    fn test_cycle_seconds_counts_repeated_phases() {
        let durations = PhaseDurations {
            inspire: 5,
            hold: 2,
            expire: 6,
        };

        assert_eq!(durations.cycle_seconds(ExerciseKind::Coherence), 11);
        assert_eq!(durations.cycle_seconds(ExerciseKind::Square), 15);
        assert_eq!(durations.cycle_seconds(ExerciseKind::Triangle), 13);
    }

    #[test]
    fn test_notification_wire_format() {
        let json = serde_json::to_string(&Notification::Tick { remaining_secs: 3 }).unwrap();
        assert_eq!(json, r#"{"type":"tick","remaining_secs":3}"#);

        let json = serde_json::to_string(&Notification::PlayCue).unwrap();
        assert_eq!(json, r#"{"type":"play_cue"}"#);
    }
}
