use std::path::Path;

use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig, Relu};
use burn::prelude::*;
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder};

use crate::error::CheckpointError;

/// Q-value network for Snake.
///
/// ```text
/// Input:  [batch, 11]
/// FC1:    11 -> hidden, ReLU, dropout
/// FC2:    hidden -> hidden/2, ReLU, dropout
/// FC3:    hidden/2 -> 3  (Q-values: straight, right, left)
/// ```
///
/// Dropout is only active on autodiff backends, so the target network and
/// greedy play see the deterministic forward pass.
#[derive(Module, Debug)]
pub struct QNetwork<B: Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
    fc3: Linear<B>,
    dropout: Dropout,
    relu: Relu,
}

#[derive(Config, Debug)]
pub struct QNetworkConfig {
    #[config(default = 11)]
    pub input_size: usize,
    #[config(default = 256)]
    pub hidden_size: usize,
    #[config(default = 3)]
    pub output_size: usize,
    #[config(default = 0.2)]
    pub dropout: f64,
}

impl QNetworkConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> QNetwork<B> {
        let half = (self.hidden_size / 2).max(1);
        QNetwork {
            fc1: LinearConfig::new(self.input_size, self.hidden_size).init(device),
            fc2: LinearConfig::new(self.hidden_size, half).init(device),
            fc3: LinearConfig::new(half, self.output_size).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
            relu: Relu::new(),
        }
    }
}

impl<B: Backend> QNetwork<B> {
    /// Forward pass: input [batch, 11] -> output [batch, 3] Q-values.
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.dropout.forward(self.relu.forward(self.fc1.forward(input)));
        let x = self.dropout.forward(self.relu.forward(self.fc2.forward(x)));
        self.fc3.forward(x)
    }

    /// Write the weights to `path` (the `.mpk` extension is enforced).
    pub fn save_weights(&self, path: &Path) -> Result<(), CheckpointError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        self.clone()
            .save_file(path.to_path_buf(), &recorder)
            .map_err(|e| CheckpointError::ModelSave(e.to_string()))
    }

    /// Replace the weights with the ones stored at `path`.
    pub fn load_weights(self, path: &Path, device: &B::Device) -> Result<Self, CheckpointError> {
        let file = path.with_extension("mpk");
        if !file.is_file() {
            return Err(CheckpointError::ArtifactNotFound(file));
        }
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        self.load_file(file, &recorder, device)
            .map_err(|e| CheckpointError::ModelLoad(e.to_string()))
    }
}

/// Index of the largest value. The first index wins ties.
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
