use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::error::ConfigError;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TOTAL_QUESTIONS: u32 = 3;

pub const ENV_SERVER_URL: &str = "CAREER_QUIZ_URL";
pub const ENV_TOTAL_QUESTIONS: &str = "CAREER_QUIZ_TOTAL_QUESTIONS";

/// On-disk configuration. Every field is optional; missing ones fall back
/// to the environment and then to defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub server_url: Option<String>,
    pub total_questions: Option<u32>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub total_questions: u32,
    pub log_file: PathBuf,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("career-quiz").join("config.json"))
    }

    /// Resolve settings using the process environment.
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        self.settings_with(|key| std::env::var(key).ok())
    }

    /// Resolve settings with `env` as the environment lookup.
    /// Environment values win over the file.
    pub fn settings_with<F>(&self, env: F) -> Result<Settings, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_url = env(ENV_SERVER_URL)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.server_url.clone())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let total_questions = match env(ENV_TOTAL_QUESTIONS).filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw.trim().parse::<u32>().map_err(|e| {
                ConfigError::InvalidValue(ENV_TOTAL_QUESTIONS.to_string(), e.to_string())
            })?,
            None => self.total_questions.unwrap_or(DEFAULT_TOTAL_QUESTIONS),
        };

        let settings = Settings {
            server_url,
            total_questions,
            log_file: default_log_file(),
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_questions == 0 {
            return Err(ConfigError::InvalidValue(
                "total_questions".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        reqwest::Url::parse(&self.server_url).map_err(|e| {
            ConfigError::InvalidValue("server_url".to_string(), e.to_string())
        })?;
        Ok(())
    }

    /// The file-config view of these settings, for `--save-config`.
    pub fn to_config(&self) -> Config {
        Config {
            server_url: Some(self.server_url.clone()),
            total_questions: Some(self.total_questions),
        }
    }
}

fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("career-quiz")
        .join("career-quiz.log")
}
