//! Backend aliases shared by the network, the trainer, and the agent.
//!
//! Training runs on the autodiff-wrapped NdArray backend. The target network
//! and greedy play use the plain inner backend.

use burn::backend::{
    ndarray::{NdArray, NdArrayDevice},
    Autodiff,
};

/// Plain CPU backend used for the target network and inference.
pub type InferBackend = NdArray<f32>;

/// Autodiff backend used for the online network.
pub type TrainBackend = Autodiff<InferBackend>;

pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}
