//! High score leaderboard
//!
//! Persisted as a JSON file, tracks the top 10 finished matches.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimResult;
use crate::sim::ScoreState;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: i64,
    /// Level reached
    pub level: u32,
    pub punches_landed: u32,
    /// Match length in seconds
    pub play_time: f64,
}

impl HighScoreEntry {
    /// Entry for a finished match
    pub fn from_match(score: &ScoreState, play_time: f64) -> Self {
        Self {
            score: score.display_score(),
            level: score.level,
            punches_landed: score.stats.punches_landed,
            play_time,
        }
    }
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: i64) -> bool {
        if score <= 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: i64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add an entry (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<i64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from a JSON file; a missing or unreadable file starts fresh
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(err) => {
                if path.exists() {
                    log::warn!("Ignoring high score file {}: {}", path.display(), err);
                } else {
                    log::info!("No high scores found, starting fresh");
                }
                Self::new()
            }
        }
    }

    fn try_load(path: &Path) -> SimResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> SimResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}
