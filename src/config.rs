use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main pipeline configuration
///
/// Every run reads the compiled-in defaults first, then an optional config
/// file (`CONFIG_PATH`), then `TRIAGE_`-prefixed environment variables.
/// Command-line flags override the resolved paths and seed last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Dataset and artifact locations
    pub paths: PathsConfig,

    /// Fixed seed recorded for reproducibility
    #[serde(default)]
    pub seed: u64,

    /// Text featurization configuration
    #[serde(default)]
    pub features: FeatureConfig,

    /// Trainer hyperparameters
    #[serde(default)]
    pub trainer: TrainerConfig,
}

impl Config {
    /// Load configuration from defaults, file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/triage.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: TRIAGE_)
            .add_source(
                config::Environment::with_prefix("TRIAGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

/// Dataset and artifact locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Training dataset (TSV)
    pub train_data: PathBuf,

    /// Held-out evaluation dataset (TSV)
    pub test_data: PathBuf,

    /// Model artifact written after training
    pub model: PathBuf,
}

/// Text featurization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Maximum vocabulary size per text column
    pub max_vocab_size: usize,

    /// Minimum document frequency for terms
    pub min_doc_freq: usize,

    /// Tokens shorter than this are dropped
    pub min_token_len: usize,

    /// N-gram range (min, max)
    pub ngram_range: (usize, usize),

    /// Use TF-IDF weighting instead of raw term frequency
    pub use_tfidf: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            max_vocab_size: 20_000,
            min_doc_freq: 1,
            min_token_len: 3,
            ngram_range: (1, 2),
            use_tfidf: true,
        }
    }
}

/// Trainer hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// L2 regularization strength passed to the logistic regression solver
    pub alpha: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self { alpha: 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_config_default() {
        let config = FeatureConfig::default();
        assert_eq!(config.ngram_range, (1, 2));
        assert!(config.use_tfidf);
        assert_eq!(config.min_token_len, 3);
    }

    #[test]
    fn test_default_toml_parses() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.seed, 0);
        assert_eq!(config.paths.train_data, PathBuf::from("data/issues_train.tsv"));
        assert_eq!(config.features.max_vocab_size, 20_000);
    }
}
