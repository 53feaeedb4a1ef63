//! Training infrastructure: the per-step driver, replay memory, score
//! history, and the game loop that ties them to checkpointing.

pub mod episode;
pub mod metrics;
pub mod replay_buffer;
pub mod trainer;

pub use episode::{play_greedy_game, training_step, GreedyGame, StepRecord};
pub use metrics::{ScoreHistory, ScoreStatistics};
pub use replay_buffer::{ReplayMemory, Transition};
pub use trainer::{Trainer, TrainerConfig, TrainingSummary};
