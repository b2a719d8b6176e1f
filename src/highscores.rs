//! High score leaderboard
//!
//! Persisted to LocalStorage, tracks the top 10 scores.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's score
    pub score: u64,
    /// Round reached
    pub round: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "brickwave_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Score a run must beat to get on the board
    ///
    /// Zero while there is still room; otherwise the lowest entry.
    fn cutoff(&self) -> u64 {
        if self.entries.len() < MAX_HIGH_SCORES {
            return 0;
        }
        self.entries.last().map(|e| e.score).unwrap_or(0)
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.cutoff()
    }

    /// Record a finished run
    ///
    /// Returns the rank achieved (1-indexed) or None if the score didn't
    /// qualify. Ties rank below the entries already on the board.
    pub fn add_score(&mut self, score: u64, round: u32, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let rank = self.entries.iter().take_while(|e| e.score >= score).count();
        self.entries.insert(
            rank,
            HighScoreEntry {
                score,
                round,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank + 1)
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High scores saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Short age label for a leaderboard line ("today", "3d ago", or a date)
#[cfg(target_arch = "wasm32")]
pub fn format_age(timestamp: f64) -> String {
    let days = ((js_sys::Date::now() - timestamp) / 86_400_000.0).floor();
    if days < 1.0 {
        "today".to_string()
    } else if days < 7.0 {
        format!("{}d ago", days as i32)
    } else {
        let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp));
        format!(
            "{}/{}/{}",
            date.get_month() + 1,
            date.get_date(),
            date.get_full_year() % 100
        )
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn format_age(_timestamp: f64) -> String {
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_score_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn scores_stay_sorted_descending() {
        let mut scores = HighScores::new();
        scores.add_score(500, 2, 0.0);
        scores.add_score(1500, 4, 1.0);
        scores.add_score(1000, 3, 2.0);
        let values: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![1500, 1000, 500]);
    }

    #[test]
    fn ties_rank_below_existing_entries() {
        let mut scores = HighScores::new();
        scores.add_score(1000, 2, 0.0);
        assert_eq!(scores.add_score(1000, 3, 1.0), Some(2));
        // The older run keeps the higher rank
        assert_eq!(scores.entries[0].timestamp, 0.0);
        assert_eq!(scores.entries[1].timestamp, 1.0);
    }

    #[test]
    fn leaderboard_truncates_at_capacity() {
        let mut scores = HighScores::new();
        for i in 1..=15u64 {
            scores.add_score(i * 100, 1, i as f64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(1500));
        // The lowest surviving entry is 600; 500 no longer qualifies
        assert!(!scores.qualifies(500));
        assert!(scores.qualifies(700));
        // A full board rejects a tie with its lowest entry
        assert_eq!(scores.add_score(600, 1, 99.0), None);
    }

    #[test]
    fn rank_is_one_indexed() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(1000, 1, 0.0), Some(1));
        assert_eq!(scores.add_score(2000, 2, 1.0), Some(1));
        assert_eq!(scores.add_score(500, 1, 2.0), Some(3));
    }
}
