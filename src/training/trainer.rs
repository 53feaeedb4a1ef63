use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, info};

use crate::ai::SnakeAgent;
use crate::error::TrainingError;
use crate::game::SnakeEnvironment;
use crate::training::episode::training_step;
use crate::training::metrics::{ScoreHistory, ScoreStatistics};

/// Trainer configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Games to play; 0 keeps going until interrupted.
    pub num_games: usize,
    pub log_interval: usize,
    /// Mean score must exceed the best mean by this factor to update metadata.
    pub mean_improvement_ratio: f64,
    pub history_path: PathBuf,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            num_games: 0,
            log_interval: 10,
            mean_improvement_ratio: 1.05,
            history_path: PathBuf::from("model/training_history.json"),
        }
    }
}

/// Final numbers of a training session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingSummary {
    pub games_played: usize,
    pub record: u32,
    pub best_mean_score: f64,
    pub statistics: ScoreStatistics,
    pub interrupted: bool,
}

/// Drives a [`SnakeAgent`] against a game until the game budget runs out or
/// `stop` is raised.
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Trainer { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Run the training loop. The score history is written on exit.
    pub fn train<G: SnakeEnvironment>(
        &self,
        agent: &mut SnakeAgent,
        game: &mut G,
        stop: &AtomicBool,
    ) -> Result<TrainingSummary, TrainingError> {
        let mut history = ScoreHistory::new();
        let mut record = agent.get_loaded_best_score();
        let mut best_mean = agent.get_loaded_mean_score();
        let mut interrupted = false;

        info!(
            record,
            best_mean,
            num_games = self.config.num_games,
            "starting training"
        );

        loop {
            if stop.load(Ordering::SeqCst) {
                interrupted = true;
                info!("training interrupted");
                break;
            }
            if self.config.num_games > 0 && history.total_games() >= self.config.num_games {
                break;
            }

            let step = training_step(agent, game);
            if !step.result.done {
                continue;
            }

            let score = step.result.score;
            game.reset();
            agent.finish_game();
            if let Some(metrics) = agent.train_long_memory() {
                history.record_loss(metrics.loss);
            }
            let mean = history.record_game(score);

            if score > record {
                record = score;
                best_mean = mean;
                if let Err(e) = agent.save_model_new_record(record, mean) {
                    error!("failed to save new record model: {e}");
                }
            } else if mean > best_mean * self.config.mean_improvement_ratio {
                best_mean = mean;
                match agent.update_model_mean_score(mean) {
                    Ok(_) => info!(mean, "mean score improved"),
                    Err(e) => error!("failed to update model mean score: {e}"),
                }
            }

            let games = history.total_games();
            debug!(game = games, score, record, mean, "game finished");
            if self.config.log_interval > 0 && games % self.config.log_interval == 0 {
                info!(
                    "Game {games} | score: {score} | record: {record} | mean: {mean:.2} | eps: {} | loss: {:.4}",
                    agent.epsilon(),
                    history.average_loss(self.config.log_interval),
                );
            }
        }

        history.save_json(&self.config.history_path)?;
        let statistics = history.statistics();
        info!(
            games = statistics.total_games,
            record,
            best_mean,
            last_10_mean = statistics.last_10_mean,
            path = %self.config.history_path.display(),
            "training session ended"
        );

        Ok(TrainingSummary {
            games_played: statistics.total_games,
            record,
            best_mean_score: best_mean,
            statistics,
            interrupted,
        })
    }
}
