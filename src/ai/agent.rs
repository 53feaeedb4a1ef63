use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::ai::algorithms::{DoubleDqnConfig, DoubleDqnTrainer, UpdateMetrics};
use crate::ai::networks::{argmax, QNetworkConfig};
use crate::ai::reward::{RewardConfig, RewardShaper};
use crate::ai::state_encoding::{encode_game, StateVector};
use crate::checkpoint::{ModelMetadata, ModelVersionStore};
use crate::error::CheckpointError;
use crate::game::{Action, EpisodeStatus, SnakeEnvironment, NUM_ACTIONS};
use crate::training::replay_buffer::{ReplayMemory, Transition};

/// Exploration draws are integers in `[0, EPSILON_RANGE)`.
const EPSILON_RANGE: i64 = 200;

/// Agent hyperparameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub max_memory: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub gamma: f32,
    /// Epsilon starts here and drops by one per finished game.
    pub epsilon_decay: i64,
    pub epsilon_min: i64,
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub dropout: f64,
    pub target_update_freq: usize,
    pub max_grad_norm: f32,
    pub food_reward: f32,
    pub collision_penalty: f32,
    pub closer_reward: f32,
    pub farther_penalty: f32,
    pub loop_penalty: f32,
    pub model_dir: PathBuf,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            max_memory: 100_000,
            batch_size: 1000,
            learning_rate: 0.001,
            gamma: 0.9,
            epsilon_decay: 80,
            epsilon_min: 0,
            input_size: 11,
            hidden_size: 256,
            output_size: 3,
            dropout: 0.2,
            target_update_freq: 100,
            max_grad_norm: 1.0,
            food_reward: 10.0,
            collision_penalty: -10.0,
            closer_reward: 1.0,
            farther_penalty: -1.0,
            loop_penalty: -11.0,
            model_dir: PathBuf::from("model"),
        }
    }
}

impl AgentConfig {
    pub fn network_config(&self) -> QNetworkConfig {
        QNetworkConfig::new()
            .with_input_size(self.input_size)
            .with_hidden_size(self.hidden_size)
            .with_output_size(self.output_size)
            .with_dropout(self.dropout)
    }

    pub fn dqn_config(&self) -> DoubleDqnConfig {
        DoubleDqnConfig {
            learning_rate: self.learning_rate,
            gamma: self.gamma,
            target_update_freq: self.target_update_freq,
            max_grad_norm: self.max_grad_norm,
        }
    }

    pub fn reward_config(&self) -> RewardConfig {
        RewardConfig {
            food_reward: self.food_reward,
            collision_penalty: self.collision_penalty,
            closer_reward: self.closer_reward,
            farther_penalty: self.farther_penalty,
            loop_penalty: self.loop_penalty,
        }
    }
}

/// Result of looking for a saved model.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Found(ModelMetadata),
    NotFound,
}

impl LoadOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, LoadOutcome::Found(_))
    }
}

/// Epsilon-greedy Double-DQN agent for Snake.
pub struct SnakeAgent {
    config: AgentConfig,
    n_games: usize,
    memory: ReplayMemory,
    trainer: DoubleDqnTrainer,
    rewards: RewardShaper,
    store: ModelVersionStore,
    /// Version this run writes to, assigned on the first new record.
    version: Option<u32>,
    loaded: Option<ModelMetadata>,
    rng: StdRng,
}

impl SnakeAgent {
    pub fn new(config: AgentConfig) -> Self {
        let memory = ReplayMemory::new(config.max_memory);
        Self::build(config, memory, StdRng::from_os_rng())
    }

    /// Deterministic exploration and sampling, for tests and reproducible runs.
    pub fn with_seed(config: AgentConfig, seed: u64) -> Self {
        let memory = ReplayMemory::with_seed(config.max_memory, seed);
        Self::build(config, memory, StdRng::seed_from_u64(seed.wrapping_add(1)))
    }

    fn build(config: AgentConfig, memory: ReplayMemory, rng: StdRng) -> Self {
        let trainer = DoubleDqnTrainer::new(config.network_config(), config.dqn_config());
        let rewards = RewardShaper::new(config.reward_config());
        let store = ModelVersionStore::new(config.model_dir.clone());

        SnakeAgent {
            config,
            n_games: 0,
            memory,
            trainer,
            rewards,
            store,
            version: None,
            loaded: None,
            rng,
        }
    }

    pub fn get_state<G: SnakeEnvironment + ?Sized>(&self, game: &G) -> StateVector {
        encode_game(game)
    }

    /// Current exploration threshold out of 200.
    pub fn epsilon(&self) -> i64 {
        let decayed = self.config.epsilon_decay - self.n_games as i64;
        decayed.max(self.config.epsilon_min)
    }

    /// Epsilon-greedy action for `state`.
    pub fn get_action(&mut self, state: &StateVector) -> Action {
        if self.rng.random_range(0..EPSILON_RANGE) < self.epsilon() {
            Action::ALL[self.rng.random_range(0..NUM_ACTIONS)]
        } else {
            self.greedy_action(state)
        }
    }

    /// Highest-valued action under the online network.
    pub fn greedy_action(&self, state: &StateVector) -> Action {
        let q_values = self.trainer.q_values(state);
        Action::from_index(argmax(&q_values)).unwrap_or(Action::Straight)
    }

    pub fn remember(&mut self, transition: Transition) {
        self.memory.push(transition);
    }

    /// Single gradient step on the transition just played.
    pub fn train_short_memory(&mut self, transition: &Transition) -> UpdateMetrics {
        self.trainer.train_step(std::slice::from_ref(transition))
    }

    /// Single gradient step on a sampled batch. `None` while memory is empty.
    pub fn train_long_memory(&mut self) -> Option<UpdateMetrics> {
        if self.memory.is_empty() {
            return None;
        }
        let batch = self.memory.sample(self.config.batch_size);
        Some(self.trainer.train_step(&batch))
    }

    pub fn calculate_reward(
        &mut self,
        status: EpisodeStatus,
        score: u32,
        old_score: u32,
        distance: i32,
    ) -> f32 {
        self.rewards.reward(status, score, old_score, distance)
    }

    /// Book-keeping after an episode ends.
    pub fn finish_game(&mut self) {
        self.n_games += 1;
        self.rewards.reset();
    }

    /// Save weights and metadata for a new high score.
    ///
    /// The first call in a run claims the next free version. Later calls
    /// overwrite that same version.
    pub fn save_model_new_record(
        &mut self,
        score: u32,
        mean_score: f64,
    ) -> Result<ModelMetadata, CheckpointError> {
        let version = match self.version {
            Some(version) => version,
            None => {
                let version = self.store.next_version()?;
                info!(version, dir = %self.store.dir().display(), "claimed model version");
                self.version = Some(version);
                version
            }
        };

        self.trainer.save_weights(&self.store.artifact_path(version))?;
        let metadata = self
            .store
            .save_metadata(version, score, self.n_games, mean_score)?;
        info!(version, score, mean_score, "saved new record model");
        Ok(metadata)
    }

    /// Rewrite the current version's metadata with a new mean score.
    ///
    /// Returns `Ok(None)` if no version has been saved in this run.
    pub fn update_model_mean_score(
        &mut self,
        mean_score: f64,
    ) -> Result<Option<ModelMetadata>, CheckpointError> {
        let Some(version) = self.version else {
            warn!("no model version saved yet, skipping mean score update");
            return Ok(None);
        };
        let best_score = self.store.load_metadata(version)?.best_score;
        let metadata = self
            .store
            .save_metadata(version, best_score, self.n_games, mean_score)?;
        info!(version, mean_score, "updated model mean score");
        Ok(Some(metadata))
    }

    pub fn load_best(&mut self) -> Result<LoadOutcome, CheckpointError> {
        match self.store.best()? {
            Some(metadata) => self.load_version(metadata),
            None => Ok(LoadOutcome::NotFound),
        }
    }

    pub fn load_latest(&mut self) -> Result<LoadOutcome, CheckpointError> {
        match self.store.latest()? {
            Some(metadata) => self.load_version(metadata),
            None => Ok(LoadOutcome::NotFound),
        }
    }

    fn load_version(&mut self, metadata: ModelMetadata) -> Result<LoadOutcome, CheckpointError> {
        let path = self.store.dir().join(&metadata.model_file);
        match self.trainer.load_weights(&path) {
            Ok(()) => {
                info!(
                    version = metadata.version,
                    best_score = metadata.best_score,
                    mean_score = metadata.mean_score,
                    "loaded model"
                );
                self.loaded = Some(metadata.clone());
                Ok(LoadOutcome::Found(metadata))
            }
            Err(CheckpointError::ArtifactNotFound(path)) => {
                warn!(path = %path.display(), "model metadata has no weights file");
                Ok(LoadOutcome::NotFound)
            }
            Err(e) => Err(e),
        }
    }

    /// Load the best saved model. Any failure is logged and reported as `false`.
    pub fn load_best_model(&mut self) -> bool {
        match self.load_best() {
            Ok(outcome) => outcome.is_found(),
            Err(e) => {
                warn!("could not load best model: {e}");
                false
            }
        }
    }

    /// Load the newest saved model. Any failure is logged and reported as `false`.
    pub fn load_latest_model(&mut self) -> bool {
        match self.load_latest() {
            Ok(outcome) => outcome.is_found(),
            Err(e) => {
                warn!("could not load latest model: {e}");
                false
            }
        }
    }

    pub fn get_loaded_best_score(&self) -> u32 {
        self.loaded.as_ref().map_or(0, |m| m.best_score)
    }

    pub fn get_loaded_mean_score(&self) -> f64 {
        self.loaded.as_ref().map_or(0.0, |m| m.mean_score)
    }

    pub fn n_games(&self) -> usize {
        self.n_games
    }

    pub fn version(&self) -> Option<u32> {
        self.version
    }

    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }

    pub fn trainer(&self) -> &DoubleDqnTrainer {
        &self.trainer
    }

    pub fn store(&self) -> &ModelVersionStore {
        &self.store
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}
