use serde::{Deserialize, Serialize};

/// Configuration for the Snake game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the grid in cells
    pub grid_width: usize,
    /// Height of the grid in cells
    pub grid_height: usize,
    /// Segments the snake starts with
    pub initial_snake_length: usize,
    /// An episode times out after `frame_timeout_multiplier * snake length` frames
    pub frame_timeout_multiplier: usize,
    /// Raw reward for eating food
    pub food_reward: f32,
    /// Raw reward when the episode ends
    pub collision_penalty: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 32,
            grid_height: 24,
            initial_snake_length: 3,
            frame_timeout_multiplier: 100,
            food_reward: 10.0,
            collision_penalty: -10.0,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom grid size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Small grid for tests.
    pub fn small() -> Self {
        Self::new(10, 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 32);
        assert_eq!(config.grid_height, 24);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.frame_timeout_multiplier, 100);
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 12);
        assert_eq!(config.initial_snake_length, 3);
    }
}
