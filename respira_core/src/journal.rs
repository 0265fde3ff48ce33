//! Journal of completed breathing sessions.
//!
//! Sessions are appended to a JSONL (JSON Lines) file with file locking
//! to ensure safe concurrent access. Only finished sessions are recorded;
//! the engine's in-progress state is never persisted.

use crate::{ExerciseKind, PhaseDurations, Result, SessionSummary};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File name of the journal inside the journal directory
pub const JOURNAL_FILE: &str = "sessions.jsonl";

/// One completed session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub exercise: ExerciseKind,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub cycles_completed: u32,
    pub elapsed_secs: u32,
    pub durations: PhaseDurations,
}

impl From<&SessionSummary> for SessionRecord {
    fn from(summary: &SessionSummary) -> Self {
        Self {
            id: Uuid::new_v4(),
            exercise: summary.exercise,
            started_at: summary.started_at,
            ended_at: summary.ended_at,
            cycles_completed: summary.cycles_completed,
            elapsed_secs: summary.elapsed_secs,
            durations: summary.durations,
        }
    }
}

/// Session sink trait for persisting finished sessions
pub trait SessionSink {
    fn append(&mut self, record: &SessionRecord) -> Result<()>;
}

/// JSONL-based session sink with file locking
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    /// Create a new journal writing to the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Journal stored in the standard file inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(JOURNAL_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl SessionSink for JsonlJournal {
    fn append(&mut self, record: &SessionRecord) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended session {} to journal", record.id);
        Ok(())
    }
}

/// Read all records from a journal file, oldest first
///
/// Malformed lines are skipped with a warning.
pub fn read_records(path: &Path) -> Result<Vec<SessionRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<SessionRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse journal line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} records from journal", records.len());
    Ok(records)
}

/// Totals for one exercise kind
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExerciseTotals {
    pub sessions: u32,
    pub cycles: u32,
    pub seconds: u64,
}

/// Aggregate records per exercise kind, in display order
pub fn summarize(records: &[SessionRecord]) -> Vec<(ExerciseKind, ExerciseTotals)> {
    let mut totals: BTreeMap<usize, ExerciseTotals> = BTreeMap::new();

    for record in records {
        let entry = totals.entry(record.exercise.index()).or_default();
        entry.sessions += 1;
        entry.cycles += record.cycles_completed;
        entry.seconds += u64::from(record.elapsed_secs);
    }

    ExerciseKind::ALL
        .iter()
        .filter_map(|kind| totals.remove(&kind.index()).map(|t| (*kind, t)))
        .collect()
}
