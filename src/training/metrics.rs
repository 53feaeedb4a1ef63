use std::collections::VecDeque;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TrainingError;

/// Losses kept for the rolling average.
const LOSS_WINDOW: usize = 100;

/// Summary over all recorded games.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreStatistics {
    pub total_games: usize,
    pub mean: f64,
    pub max: u32,
    pub min: u32,
    pub last_10_mean: f64,
}

/// Per-game scores and running means, exported as JSON for plotting.
#[derive(Debug, Clone, Default)]
pub struct ScoreHistory {
    scores: Vec<u32>,
    mean_scores: Vec<f64>,
    total_score: u64,
    losses: VecDeque<f32>,
}

impl ScoreHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished game and return the mean over all games so far.
    pub fn record_game(&mut self, score: u32) -> f64 {
        self.scores.push(score);
        self.total_score += u64::from(score);
        let mean = self.total_score as f64 / self.scores.len() as f64;
        self.mean_scores.push(mean);
        mean
    }

    pub fn record_loss(&mut self, loss: f32) {
        self.losses.push_back(loss);
        if self.losses.len() > LOSS_WINDOW {
            self.losses.pop_front();
        }
    }

    /// Average loss over the last N updates.
    pub fn average_loss(&self, last_n: usize) -> f32 {
        let n = self.losses.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let sum: f32 = self.losses.iter().rev().take(n).sum();
        sum / n as f32
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn mean_scores(&self) -> &[f64] {
        &self.mean_scores
    }

    pub fn mean_score(&self) -> f64 {
        self.mean_scores.last().copied().unwrap_or_default()
    }

    pub fn total_games(&self) -> usize {
        self.scores.len()
    }

    pub fn statistics(&self) -> ScoreStatistics {
        if self.scores.is_empty() {
            return ScoreStatistics::default();
        }
        let recent = &self.scores[self.scores.len().saturating_sub(10)..];
        let recent_sum: u64 = recent.iter().map(|&s| u64::from(s)).sum();

        ScoreStatistics {
            total_games: self.scores.len(),
            mean: self.mean_score(),
            max: self.scores.iter().copied().max().unwrap_or_default(),
            min: self.scores.iter().copied().min().unwrap_or_default(),
            last_10_mean: recent_sum as f64 / recent.len() as f64,
        }
    }

    /// Write scores, running means, and statistics as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<(), TrainingError> {
        #[derive(Serialize)]
        struct Export<'a> {
            scores: &'a [u32],
            mean_scores: &'a [f64],
            statistics: ScoreStatistics,
        }

        let json = serde_json::to_string_pretty(&Export {
            scores: &self.scores,
            mean_scores: &self.mean_scores,
            statistics: self.statistics(),
        })?;

        let write = |path: &Path| -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, json.as_bytes())
        };
        write(path).map_err(|source| TrainingError::HistoryWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}
