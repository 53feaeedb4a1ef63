mod q_network;

pub use q_network::{argmax, QNetwork, QNetworkConfig};
