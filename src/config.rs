use std::path::Path;

use tracing::warn;

use crate::ai::{AgentConfig, STATE_SIZE};
use crate::error::ConfigError;
use crate::game::{GameConfig, NUM_ACTIONS};
use crate::training::TrainerConfig;

/// Smallest grid the game accepts on either axis.
const MIN_GRID_SIDE: usize = 5;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub agent: AgentConfig,
    pub game: GameConfig,
    pub training: TrainerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let agent = &self.agent;
        if agent.input_size != STATE_SIZE {
            return Err(ConfigError::Validation(format!(
                "agent.input_size must be {STATE_SIZE}"
            )));
        }
        if agent.output_size != NUM_ACTIONS {
            return Err(ConfigError::Validation(format!(
                "agent.output_size must be {NUM_ACTIONS}"
            )));
        }
        if agent.hidden_size < 2 {
            return Err(ConfigError::Validation(
                "agent.hidden_size must be >= 2".into(),
            ));
        }
        if agent.learning_rate <= 0.0 {
            return Err(ConfigError::Validation(
                "agent.learning_rate must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&agent.gamma) {
            return Err(ConfigError::Validation(
                "agent.gamma must be in [0, 1]".into(),
            ));
        }
        if !(0.0..1.0).contains(&agent.dropout) {
            return Err(ConfigError::Validation(
                "agent.dropout must be in [0, 1)".into(),
            ));
        }
        if agent.batch_size == 0 {
            return Err(ConfigError::Validation(
                "agent.batch_size must be > 0".into(),
            ));
        }
        if agent.max_memory == 0 {
            return Err(ConfigError::Validation(
                "agent.max_memory must be > 0".into(),
            ));
        }
        if agent.target_update_freq == 0 {
            return Err(ConfigError::Validation(
                "agent.target_update_freq must be > 0".into(),
            ));
        }
        if agent.max_grad_norm <= 0.0 {
            return Err(ConfigError::Validation(
                "agent.max_grad_norm must be > 0".into(),
            ));
        }
        if agent.epsilon_min < 0 {
            return Err(ConfigError::Validation(
                "agent.epsilon_min must be >= 0".into(),
            ));
        }

        let game = &self.game;
        if game.grid_width < MIN_GRID_SIDE || game.grid_height < MIN_GRID_SIDE {
            return Err(ConfigError::Validation(format!(
                "game grid must be at least {MIN_GRID_SIDE}x{MIN_GRID_SIDE}"
            )));
        }
        if game.initial_snake_length == 0 || game.initial_snake_length > game.grid_width / 2 {
            return Err(ConfigError::Validation(
                "game.initial_snake_length must be in [1, grid_width / 2]".into(),
            ));
        }
        if game.frame_timeout_multiplier == 0 {
            return Err(ConfigError::Validation(
                "game.frame_timeout_multiplier must be > 0".into(),
            ));
        }

        if self.training.mean_improvement_ratio < 1.0 {
            return Err(ConfigError::Validation(
                "training.mean_improvement_ratio must be >= 1".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[agent]
learning_rate = 0.0005
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!((config.agent.learning_rate - 0.0005).abs() < 1e-12);
        // Other fields should be defaults
        assert!((config.agent.gamma - 0.9).abs() < 1e-6);
        assert_eq!(config.agent.batch_size, 1000);
        assert_eq!(config.game.grid_width, 32);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.agent.max_memory, 100_000);
        assert_eq!(config.agent.epsilon_decay, 80);
        assert_eq!(config.training.num_games, 0);
    }

    #[test]
    fn test_validation_rejects_wrong_input_size() {
        let mut config = AppConfig::default();
        config.agent.input_size = 12;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_wrong_output_size() {
        let mut config = AppConfig::default();
        config.agent.output_size = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_lr() {
        let mut config = AppConfig::default();
        config.agent.learning_rate = -0.001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_invalid_gamma() {
        let mut config = AppConfig::default();
        config.agent.gamma = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_full_dropout() {
        let mut config = AppConfig::default();
        config.agent.dropout = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_batch() {
        let mut config = AppConfig::default();
        config.agent.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_tiny_grid() {
        let mut config = AppConfig::default();
        config.game.grid_height = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_ratio_below_one() {
        let mut config = AppConfig::default();
        config.training.mean_improvement_ratio = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.agent.batch_size, 1000);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[training]
num_games = 500

[game]
grid_width = 20
grid_height = 20
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.training.num_games, 500);
        assert_eq!(config.game.grid_width, 20);
        // Others are defaults
        assert!((config.agent.learning_rate - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[agent]\ngamma = 2.0\n").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml().unwrap();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
    }
}
