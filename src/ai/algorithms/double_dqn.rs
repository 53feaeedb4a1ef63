use std::path::Path;

use burn::grad_clipping::GradientClippingConfig;
use burn::module::AutodiffModule;
use burn::optim::adaptor::OptimizerAdaptor;
use burn::optim::{Adam, AdamConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use burn::tensor::TensorData;
use tracing::debug;

use crate::ai::backend::{default_device, InferBackend, TrainBackend};
use crate::ai::networks::{argmax, QNetwork, QNetworkConfig};
use crate::ai::state_encoding::{state_to_tensor, states_to_tensor, StateVector};
use crate::error::CheckpointError;
use crate::game::NUM_ACTIONS;
use crate::training::replay_buffer::Transition;

/// Double-DQN hyperparameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DoubleDqnConfig {
    pub learning_rate: f64,
    pub gamma: f32,
    /// Gradient steps between hard copies of the online network into the target.
    pub target_update_freq: usize,
    pub max_grad_norm: f32,
}

impl Default for DoubleDqnConfig {
    fn default() -> Self {
        DoubleDqnConfig {
            learning_rate: 0.001,
            gamma: 0.9,
            target_update_freq: 100,
            max_grad_norm: 1.0,
        }
    }
}

/// Metrics returned from a single gradient step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UpdateMetrics {
    pub loss: f32,
    /// True if this step copied the online weights into the target network.
    pub target_synced: bool,
}

/// Online + target Q-networks with an Adam optimizer.
///
/// The online network selects the next action and the target network
/// evaluates it, which damps the overestimation of plain DQN.
pub struct DoubleDqnTrainer {
    online: QNetwork<TrainBackend>,
    target: QNetwork<InferBackend>,
    optimizer: OptimizerAdaptor<Adam, QNetwork<TrainBackend>, TrainBackend>,
    network_config: QNetworkConfig,
    config: DoubleDqnConfig,
    device: <TrainBackend as Backend>::Device,
    step_count: usize,
}

impl DoubleDqnTrainer {
    pub fn new(network_config: QNetworkConfig, config: DoubleDqnConfig) -> Self {
        let device = default_device();
        let online: QNetwork<TrainBackend> = network_config.init(&device);
        let target = online.valid();
        let optimizer = Self::build_optimizer(&config);

        DoubleDqnTrainer {
            online,
            target,
            optimizer,
            network_config,
            config,
            device,
            step_count: 0,
        }
    }

    fn build_optimizer(
        config: &DoubleDqnConfig,
    ) -> OptimizerAdaptor<Adam, QNetwork<TrainBackend>, TrainBackend> {
        AdamConfig::new()
            .with_grad_clipping(Some(GradientClippingConfig::Norm(config.max_grad_norm)))
            .init()
    }

    /// One gradient step on `batch`. A single transition is a batch of one.
    ///
    /// # Panics
    ///
    /// Panics if `batch` is empty.
    pub fn train_step(&mut self, batch: &[Transition]) -> UpdateMetrics {
        assert!(!batch.is_empty(), "train_step called with an empty batch");
        let batch_size = batch.len();

        let states: Vec<StateVector> = batch.iter().map(|t| t.state).collect();
        let next_states: Vec<StateVector> = batch.iter().map(|t| t.next_state).collect();

        // Q(s, .) on the online network: [B, 3]
        let pred = self
            .online
            .forward(states_to_tensor::<TrainBackend>(&states, &self.device));
        let pred_data = tensor_to_vec(pred.clone().inner());

        // Next-state values without gradients
        let next_input = states_to_tensor::<InferBackend>(&next_states, &self.device);
        let next_online = tensor_to_vec(self.online.valid().forward(next_input.clone()));
        let next_target = tensor_to_vec(self.target.forward(next_input));

        let targets = td_targets(
            batch,
            &pred_data,
            &next_online,
            &next_target,
            self.config.gamma,
        );
        let targets = Tensor::<TrainBackend, 2>::from_data(
            TensorData::new(targets, [batch_size, NUM_ACTIONS]),
            &self.device,
        );

        // MSE loss
        let diff = pred - targets;
        let loss = (diff.clone() * diff).mean();
        let loss_val = tensor_to_vec(loss.clone().inner())
            .first()
            .copied()
            .unwrap_or_default();

        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &self.online);
        self.online = self
            .optimizer
            .step(self.config.learning_rate, self.online.clone(), grads);

        self.step_count += 1;
        let target_synced = self.step_count % self.config.target_update_freq.max(1) == 0;
        if target_synced {
            self.sync_target();
            debug!(step = self.step_count, "target network synced");
        }

        UpdateMetrics {
            loss: loss_val,
            target_synced,
        }
    }

    /// Copy the online weights into the target network.
    pub fn sync_target(&mut self) {
        self.target = self.online.valid();
    }

    /// Online Q-values for one state, without dropout.
    pub fn q_values(&self, state: &StateVector) -> Vec<f32> {
        let input = state_to_tensor::<InferBackend>(state, &self.device);
        tensor_to_vec(self.online.valid().forward(input))
    }

    /// Target-network Q-values for one state.
    pub fn target_q_values(&self, state: &StateVector) -> Vec<f32> {
        let input = state_to_tensor::<InferBackend>(state, &self.device);
        tensor_to_vec(self.target.forward(input))
    }

    pub fn save_weights(&self, path: &Path) -> Result<(), CheckpointError> {
        self.online.valid().save_weights(path)
    }

    /// Load online weights from `path` and copy them into the target.
    pub fn load_weights(&mut self, path: &Path) -> Result<(), CheckpointError> {
        let online = self
            .network_config
            .init::<TrainBackend>(&self.device)
            .load_weights(path, &self.device)?;
        self.online = online;
        self.optimizer = Self::build_optimizer(&self.config);
        self.sync_target();
        Ok(())
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn config(&self) -> &DoubleDqnConfig {
        &self.config
    }
}

/// Double-DQN regression targets for a batch, flattened as [B * 3].
///
/// Starts from the current predictions so only the taken action contributes
/// to the loss. Terminal transitions regress to the bare reward.
pub fn td_targets(
    batch: &[Transition],
    predicted: &[f32],
    next_online: &[f32],
    next_target: &[f32],
    gamma: f32,
) -> Vec<f32> {
    let mut targets = predicted.to_vec();
    for (i, t) in batch.iter().enumerate() {
        let row = i * NUM_ACTIONS;
        let value = if t.done {
            t.reward
        } else {
            let best = argmax(&next_online[row..row + NUM_ACTIONS]);
            t.reward + gamma * next_target[row + best]
        };
        targets[row + t.action.index()] = value;
    }
    targets
}

fn tensor_to_vec<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Vec<f32> {
    tensor.into_data().iter::<f32>().collect()
}
