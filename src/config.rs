// src/config.rs

use std::{fmt, str::FromStr, time::Duration};

use super::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Settings injected into the handler at startup.
#[derive(Clone)]
pub struct Config {
    /// `None` is a valid state: generation requests then answer 500.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub proxy: Option<String>,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxy: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

// Keep the credential out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("proxy", &self.proxy)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl Config {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let mut base_url = non_empty("OPENAI_BASE_URL").unwrap_or(defaults.base_url);
        while base_url.ends_with('/') {
            base_url.pop();
        }

        let timeout_secs = parse_var("OPENAI_TIMEOUT_SECS", non_empty("OPENAI_TIMEOUT_SECS"))?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_key: non_empty("OPENAI_API_KEY"),
            base_url,
            model: non_empty("OPENAI_MODEL").unwrap_or(defaults.model),
            temperature: parse_var("OPENAI_TEMPERATURE", non_empty("OPENAI_TEMPERATURE"))?
                .unwrap_or(defaults.temperature),
            max_tokens: parse_var("OPENAI_MAX_TOKENS", non_empty("OPENAI_MAX_TOKENS"))?
                .unwrap_or(defaults.max_tokens),
            timeout: Duration::from_secs(timeout_secs),
            proxy: non_empty("OPENAI_PROXY"),
            bind_addr: non_empty("BIND_ADDR").unwrap_or(defaults.bind_addr),
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError> {
    raw.map(|value| {
        value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value })
    })
    .transpose()
}
