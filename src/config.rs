use std::time::Duration;

use tracing::warn;

use crate::{
    endpoints::Endpoints,
    error::{KnowledgeError, Result},
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Connection settings for the knowledge store.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoints: Endpoints,
    pub token: String,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            endpoints: Endpoints::new(base_url)?,
            token: token.into(),
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reads `WEBUI_BASE_URL`, `WEBUI_TOKEN` and `WEBUI_TIMEOUT_SECS`, loading a
    /// `.env` file first if there is one.
    pub fn from_env() -> Result<Self> {
        if dotenv::dotenv().is_err() {
            warn!("didn't load a .env file")
        }

        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = var("WEBUI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let token = var("WEBUI_TOKEN").unwrap_or_default();

        let mut config = Self::new(&base_url, token)?;
        if let Some(secs) = var("WEBUI_TIMEOUT_SECS") {
            config = config.with_timeout(parse_timeout(&secs)?);
        }

        Ok(config)
    }
}

pub fn parse_timeout(secs: &str) -> Result<Duration> {
    match secs.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(KnowledgeError::Config(format!(
            "timeout must be a positive number of seconds, got {secs:?}"
        ))),
    }
}
