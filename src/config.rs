use std::time::Duration;

use crate::error::{AppError, Result};

const DEFAULT_STAGE_DELAY_MS: u64 = 1000;
const DEFAULT_BANNER_TTL_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the conversion backend, no trailing slash.
    pub api_url: String,
    /// Pause between staged progress messages.
    pub stage_delay: Duration,
    /// How long the login-success banner stays visible.
    pub banner_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_url = std::env::var("TUNEPORTER_API_URL")
            .map_err(|_| AppError::Config("TUNEPORTER_API_URL not set".into()))?;

        let stage_delay = parse_millis(
            std::env::var("TUNEPORTER_STAGE_DELAY_MS").ok().as_deref(),
            "TUNEPORTER_STAGE_DELAY_MS",
            DEFAULT_STAGE_DELAY_MS,
        )?;

        let banner_ttl = parse_secs(
            std::env::var("TUNEPORTER_BANNER_TTL_SECS").ok().as_deref(),
            "TUNEPORTER_BANNER_TTL_SECS",
            DEFAULT_BANNER_TTL_SECS,
        )?;

        Ok(Self {
            api_url: normalize_api_url(&api_url),
            stage_delay,
            banner_ttl,
        })
    }

    pub fn get_missing_config(&self) -> Vec<String> {
        let mut missing = Vec::new();

        if self.api_url.is_empty() {
            missing.push("TUNEPORTER_API_URL".to_string());
        }

        missing
    }
}

/// Strip trailing slashes so endpoint paths can be appended directly.
fn normalize_api_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn parse_millis(raw: Option<&str>, var: &str, default_ms: u64) -> Result<Duration> {
    match raw {
        Some(value) => {
            let ms: u64 = value
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("{} must be an integer", var)))?;
            Ok(Duration::from_millis(ms))
        }
        None => Ok(Duration::from_millis(default_ms)),
    }
}

fn parse_secs(raw: Option<&str>, var: &str, default_secs: u64) -> Result<Duration> {
    match raw {
        Some(value) => {
            let secs: u64 = value
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("{} must be an integer", var)))?;
            Ok(Duration::from_secs(secs))
        }
        None => Ok(Duration::from_secs(default_secs)),
    }
}
