use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    pub naver_client_id: Option<String>,
    pub naver_client_secret: Option<String>,

    #[serde(default = "default_search_query")]
    pub search_query: String,

    #[serde(default = "default_collect_total")]
    pub collect_total: usize,

    /// URLs requested within this many days are not collected again.
    #[serde(default = "default_recent_window_days")]
    pub recent_window_days: i64,

    #[serde(default = "default_request_interval_ms")]
    pub request_interval_ms: u64,

    #[serde(default)]
    pub url_filter_file: Option<PathBuf>,

    #[serde(default = "default_max_crawl_attempts")]
    pub max_crawl_attempts: u32,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("newsdesk");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("news.db").to_string_lossy().to_string()
}

fn default_search_query() -> String {
    "다".to_string()
}

fn default_collect_total() -> usize {
    1000
}

fn default_recent_window_days() -> i64 {
    3
}

fn default_request_interval_ms() -> u64 {
    110
}

fn default_max_crawl_attempts() -> u32 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            naver_client_id: None,
            naver_client_secret: None,
            search_query: default_search_query(),
            collect_total: default_collect_total(),
            recent_window_days: default_recent_window_days(),
            request_interval_ms: default_request_interval_ms(),
            url_filter_file: None,
            max_crawl_attempts: default_max_crawl_attempts(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)?
        } else {
            let config = Config::default();
            config.save()?;
            config
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
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
            .join("newsdesk")
            .join("config.toml")
    }

    /// API credentials from the environment win over the file.
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup("NAVER_CLIENT_ID").filter(|v| !v.is_empty()) {
            self.naver_client_id = Some(id);
        }
        if let Some(secret) = lookup("NAVER_CLIENT_SECRET").filter(|v| !v.is_empty()) {
            self.naver_client_secret = Some(secret);
        }
    }

    pub fn naver_credentials(&self) -> Result<(String, String)> {
        match (&self.naver_client_id, &self.naver_client_secret) {
            (Some(id), Some(secret)) => Ok((id.clone(), secret.clone())),
            _ => Err(AppError::Config(format!(
                "naver_client_id and naver_client_secret must be set in {} or via NAVER_CLIENT_ID / NAVER_CLIENT_SECRET",
                Self::config_path().display()
            ))),
        }
    }

    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }
}
