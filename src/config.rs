use crate::error::{Error, Result};
use crate::models::localized::Locale;
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub http_timeout_secs: u64,
    pub canonical_currency: String,
    pub default_locale: Locale,
    pub admin_mode: bool,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            api_base_url: get_env("API_BASE_URL")?,
            api_token: env::var("API_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            http_timeout_secs: get_env_parse_or("HTTP_TIMEOUT_SECS", 30)?,
            canonical_currency: env::var("CANONICAL_CURRENCY")
                .map(|c| c.trim().to_uppercase())
                .unwrap_or_else(|_| "USD".to_string()),
            default_locale: get_env_parse_or("DEFAULT_LOCALE", Locale::Fr)?,
            admin_mode: get_env_parse_or("ADMIN_MODE", false)?,
        })
    }

    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            api_token: None,
            http_timeout_secs: 30,
            canonical_currency: "USD".to_string(),
            default_locale: Locale::Fr,
            admin_mode: false,
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}
