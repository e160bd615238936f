use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub youtube: YouTubeConfig,
    pub model: ModelConfig,
    pub database: DatabaseConfig,
    pub web: WebConfig,
}

#[derive(Debug, Deserialize)]
pub struct YouTubeConfig {
    pub base_url: String,
    pub page_size: usize,
    pub max_comments: usize,
    pub timeout_secs: u64,
    pub quota_retries: u32,
    pub retry_backoff_ms: u64,
    // Loaded from env; the service starts without it but every provider call fails
    #[serde(skip)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ModelConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_text =
            std::fs::read_to_string("config.toml").context("Failed to read config.toml")?;
        let mut config: AppConfig =
            toml::from_str(&config_text).context("Failed to parse config.toml")?;

        config.youtube.api_key = std::env::var("YOUTUBE_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        Ok(config)
    }
}
