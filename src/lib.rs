//! # Snake DQN
//!
//! A Snake agent trained with Double Deep Q-Learning on the Burn ML framework,
//! with experience replay, shaped rewards, and versioned model checkpoints.
//!
//! ## Modules
//!
//! - [`game`] — Headless Snake engine, heading-relative actions, text rendering
//! - [`ai`] — State encoding, reward shaping, Q-network, Double-DQN trainer, agent
//! - [`training`] — Replay memory, training step driver, score history, game loop
//! - [`checkpoint`] — Versioned model store and metadata
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types
//! - [`logging`] — Tracing subscriber setup for the binaries

#![recursion_limit = "256"]

pub mod ai;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod training;
