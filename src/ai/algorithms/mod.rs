mod double_dqn;

pub use double_dqn::{td_targets, DoubleDqnConfig, DoubleDqnTrainer, UpdateMetrics};
