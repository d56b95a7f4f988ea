//! High score leaderboard
//!
//! The simulation reports finished games through [`ScoreSink`]; it never
//! touches storage itself. [`HighScores`] is the in-memory top 10, keeping
//! each player's best score, with optional JSON file persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::settings::ConfigError;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Receives the final score when a game ends
pub trait ScoreSink {
    /// Record `final_score` for `user_id`, keeping only the player's best
    fn record_best(&mut self, user_id: &str, final_score: u64);
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub user_id: String,
    pub score: u64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
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
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Best recorded score for a player
    pub fn best_for(&self, user_id: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.user_id == user_id)
            .map(|e| e.score)
    }

    /// Add a score, replacing the player's previous entry if this beats it.
    /// Returns the rank achieved (1-indexed) or None if nothing changed.
    pub fn add_score(&mut self, user_id: &str, score: u64) -> Option<usize> {
        if self.best_for(user_id).is_some_and(|best| best >= score) {
            return None;
        }
        let previous = self.entries.iter().position(|e| e.user_id == user_id);
        if previous.is_none() && !self.qualifies(score) {
            return None;
        }
        if let Some(i) = previous {
            self.entries.remove(i);
        }

        let entry = HighScoreEntry {
            user_id: user_id.to_string(),
            score,
        };

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| score > e.score);
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

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load a leaderboard from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let scores: HighScores = serde_json::from_str(&json)?;
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    /// Write the leaderboard as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path.as_ref(), serde_json::to_string_pretty(self)?)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

impl ScoreSink for HighScores {
    fn record_best(&mut self, user_id: &str, final_score: u64) {
        match self.add_score(user_id, final_score) {
            Some(rank) => log::info!("{} placed #{} with {}", user_id, rank, final_score),
            None => log::debug!("{} scored {}, no leaderboard change", user_id, final_score),
        }
    }
}
