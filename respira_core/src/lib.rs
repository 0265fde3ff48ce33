#![forbid(unsafe_code)]

//! Core domain model and state machine for the Respira breathing trainer.
//!
//! This crate provides:
//! - Domain types (exercise kinds, phases, durations, notifications)
//! - The built-in exercise catalog and guide-ball offsets
//! - The breathing cycle engine
//! - A session driver with pluggable pacing and audio cues
//! - The session journal and configuration

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod engine;
pub mod cue;
pub mod driver;
pub mod journal;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{get_default_catalog, Catalog, ExerciseDefinition};
pub use config::Config;
pub use engine::{BreathingEngine, EngineState};
pub use cue::{CuePlayer, SilentCue, TerminalBell};
pub use driver::{InstantPacer, Pacer, SessionDriver, SessionSummary, SleepPacer, StopCondition};
pub use journal::{read_records, summarize, JsonlJournal, SessionRecord, SessionSink};
