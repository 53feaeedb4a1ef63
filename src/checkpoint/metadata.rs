use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Metadata written next to each model version as `model_vNNN.meta.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub version: u32,
    pub best_score: u32,
    pub games_played: usize,
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
    /// File name of the weights artifact, relative to the model directory.
    pub model_file: String,
    /// Running mean score when the metadata was last written.
    #[serde(default)]
    pub mean_score: f64,
}

impl ModelMetadata {
    pub fn new(
        version: u32,
        best_score: u32,
        games_played: usize,
        mean_score: f64,
        model_file: String,
    ) -> Self {
        ModelMetadata {
            version,
            best_score,
            games_played,
            timestamp: now_secs(),
            model_file,
            mean_score,
        }
    }
}

pub(crate) fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_serde() {
        let meta = ModelMetadata::new(2, 41, 180, 12.5, "model_v002.mpk".to_string());
        let json = serde_json::to_string_pretty(&meta).unwrap();
        let back: ModelMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
        assert!(back.timestamp > 0.0);
    }

    #[test]
    fn test_timestamp_survives_json_exactly() {
        let mut meta = ModelMetadata::new(3, 9, 40, 2.0, "model_v003.mpk".to_string());
        meta.timestamp = 1792037841.7004743;
        let json = serde_json::to_string_pretty(&meta).unwrap();
        let back: ModelMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back.timestamp.to_bits(), meta.timestamp.to_bits());
        assert_eq!(back, meta);
    }

    #[test]
    fn test_metadata_without_mean_score() {
        let json = r#"{
            "version": 1,
            "best_score": 7,
            "games_played": 30,
            "timestamp": 1700000000.5,
            "model_file": "model_v001.mpk"
        }"#;
        let meta: ModelMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.version, 1);
        assert_eq!(meta.mean_score, 0.0);
    }
}
