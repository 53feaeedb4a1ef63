mod agent;
pub mod algorithms;
pub mod backend;
pub mod networks;
pub mod reward;
pub mod state_encoding;

pub use agent::{AgentConfig, LoadOutcome, SnakeAgent};
pub use algorithms::{DoubleDqnConfig, DoubleDqnTrainer, UpdateMetrics};
pub use networks::{QNetwork, QNetworkConfig};
pub use reward::{RewardConfig, RewardShaper};
pub use state_encoding::{StateVector, STATE_SIZE};
