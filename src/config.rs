use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::tui::Theme;

const APP_DIR: &str = "thai-summarizer";

pub const DEFAULT_MODEL_NAME: &str = "StelleX/mt5-base-thaisum-text-summarization";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default)]
    pub theme: Theme,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Where the summarization model is served from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_name")]
    pub name: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    pub api_token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Decoding parameters passed to the model on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub max_input_length: usize,
    pub max_output_length: usize,
    pub min_output_length: usize,
    pub num_beams: usize,
    pub temperature: f32,
    pub top_p: f32,
    pub no_repeat_ngram_size: usize,
    pub early_stopping: bool,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR);
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("summarizer.db").to_string_lossy().to_string()
}

fn default_model_name() -> String {
    DEFAULT_MODEL_NAME.to_string()
}

fn default_endpoint() -> String {
    format!("https://api-inference.huggingface.co/models/{DEFAULT_MODEL_NAME}")
}

fn default_timeout_secs() -> u64 {
    180
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            endpoint: default_endpoint(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_input_length: 1024,
            max_output_length: 300,
            min_output_length: 80,
            num_beams: 5,
            temperature: 0.8,
            top_p: 0.95,
            no_repeat_ngram_size: 3,
            early_stopping: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            theme: Theme::default(),
            model: ModelConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        let gen = &self.generation;
        if gen.max_input_length == 0 || gen.max_output_length == 0 || gen.num_beams == 0 {
            return Err(AppError::Config(
                "generation lengths and num_beams must be positive".to_string(),
            ));
        }
        if gen.min_output_length > gen.max_output_length {
            return Err(AppError::Config(format!(
                "min_output_length ({}) exceeds max_output_length ({})",
                gen.min_output_length, gen.max_output_length
            )));
        }
        if !(0.0..=1.0).contains(&gen.top_p) {
            return Err(AppError::Config(format!("top_p must be in [0, 1], got {}", gen.top_p)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_defaults_match_decoding_policy() {
        let gen = GenerationConfig::default();
        assert_eq!(gen.max_input_length, 1024);
        assert_eq!(gen.max_output_length, 300);
        assert_eq!(gen.min_output_length, 80);
        assert_eq!(gen.num_beams, 5);
        assert_eq!(gen.temperature, 0.8);
        assert_eq!(gen.top_p, 0.95);
        assert_eq!(gen.no_repeat_ngram_size, 3);
        assert!(gen.early_stopping);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            db_path = "/tmp/x.db"
            theme = "dark"

            [generation]
            num_beams = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.db_path, "/tmp/x.db");
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.generation.num_beams, 3);
        assert_eq!(config.generation.max_output_length, 300);
        assert_eq!(config.model.name, DEFAULT_MODEL_NAME);
        assert!(config.model.endpoint.ends_with(DEFAULT_MODEL_NAME));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_min_length_above_max() {
        let mut config = Config::default();
        config.generation.min_output_length = 400;
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.generation, config.generation);
        assert_eq!(back.model.endpoint, config.model.endpoint);
    }
}
