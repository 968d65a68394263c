use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::fs;
use std::time::Duration;

pub const PFR_BASE: &str = "https://www.pro-football-reference.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    /// Delay before every outbound request and between batch targets.
    /// PFR bans aggressive clients, so the default is deliberately high.
    #[serde(default = "default_delay_seconds")]
    pub delay_seconds: u64,
    #[serde(default = "default_timeout_seconds")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_job_db_path")]
    pub job_db_path: String,
    #[serde(default = "default_stat_db_path")]
    pub stat_db_path: String,
}

fn default_delay_seconds() -> u64 {
    60
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_base_url() -> String {
    PFR_BASE.to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_job_db_path() -> String {
    "data/jobs.db".to_string()
}

fn default_stat_db_path() -> String {
    "data/stats.db".to_string()
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            delay_seconds: default_delay_seconds(),
            request_timeout_seconds: default_timeout_seconds(),
            base_url: default_base_url(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            job_db_path: default_job_db_path(),
            stat_db_path: default_stat_db_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scrape: ScrapeConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Load config.toml if present, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        let mut config = if fs::metadata(config_path).is_ok() {
            let config_content = fs::read_to_string(config_path).map_err(|e| {
                ScraperError::Config(format!("Failed to read config file '{config_path}': {e}"))
            })?;
            toml::from_str(&config_content)?
        } else {
            Config::default()
        };

        if let Ok(delay) = std::env::var("SCRAPE_DELAY_SECONDS") {
            config.scrape.delay_seconds = delay.parse().map_err(|_| {
                ScraperError::Config(format!("Invalid SCRAPE_DELAY_SECONDS: '{delay}'"))
            })?;
        }
        if let Ok(timeout) = std::env::var("SCRAPE_REQUEST_TIMEOUT") {
            config.scrape.request_timeout_seconds = timeout.parse().map_err(|_| {
                ScraperError::Config(format!("Invalid SCRAPE_REQUEST_TIMEOUT: '{timeout}'"))
            })?;
        }
        if let Ok(path) = std::env::var("JOB_DB_PATH") {
            config.server.job_db_path = path;
        }
        if let Ok(path) = std::env::var("STAT_DB_PATH") {
            config.server.stat_db_path = path;
        }

        Ok(config)
    }
}

impl ScrapeConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_sections() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.scrape.delay_seconds, 60);
        assert_eq!(config.scrape.base_url, PFR_BASE);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.stat_db_path, "data/stats.db");
    }

    #[test]
    fn partial_toml_overrides_defaults() {
        let config: Config = toml::from_str(
            r#"
            [scrape]
            delay_seconds = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.scrape.delay_seconds, 1);
        assert_eq!(config.scrape.request_timeout_seconds, 30);
    }
}
