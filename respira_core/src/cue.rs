//! Audio cue players.
//!
//! Cues are best effort. A player may fail for any reason (no terminal, closed
//! pipe, muted device) and the caller drops the error without retrying.

use crate::Result;
use std::io::Write;

/// Something that can sound a phase-change cue
pub trait CuePlayer {
    fn play_cue(&mut self) -> Result<()>;
}

/// Rings the terminal bell by writing BEL to a writer
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl TerminalBell<std::io::Stderr> {
    /// Bell on stderr, leaving stdout free for the display
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> CuePlayer for TerminalBell<W> {
    fn play_cue(&mut self) -> Result<()> {
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Player that never makes a sound
#[derive(Debug, Default)]
pub struct SilentCue;

impl CuePlayer for SilentCue {
    fn play_cue(&mut self) -> Result<()> {
        Ok(())
    }
}
