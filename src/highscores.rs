//! Session high score record
//!
//! Loaded once at startup from the score store, raised live as the score
//! climbs, and written back only when a run ends with a better score than the
//! one on disk.

use serde::{Deserialize, Serialize};

/// High score bookkeeping for one process lifetime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HighScores {
    /// Best score seen this session (shown in the HUD)
    pub best: u32,
    /// Value most recently read from or written to the store
    pub recorded: u32,
    /// Value loaded at startup, used for the "New High Score!" banner
    pub session_start: u32,
}

impl HighScores {
    /// Start a session from the stored value
    pub fn new(loaded: u32) -> Self {
        Self {
            best: loaded,
            recorded: loaded,
            session_start: loaded,
        }
    }

    /// Raise the live best if `score` beats it
    pub fn observe(&mut self, score: u32) {
        if score >= self.best {
            self.best = score;
        }
    }

    /// Whether a finished run should be written to the store
    pub fn should_persist(&self, score: u32) -> bool {
        score > self.recorded
    }

    /// The store accepted `score`
    pub fn record_written(&mut self, score: u32) {
        self.recorded = score;
        self.observe(score);
    }

    /// Whether `score` beats what was on disk when the session began
    pub fn is_new_high(&self, score: u32) -> bool {
        score > self.session_start
    }
}
