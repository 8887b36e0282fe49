use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::generation::text_service::DEFAULT_GEMINI_MODEL;
use crate::images::service::DEFAULT_IMAGE_SERVICE_URL;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub text_timeout: Duration,
    pub image_service_url: String,
    pub image_timeout: Duration,
    pub image_concurrency: usize,
    pub image_dir: PathBuf,
    pub fallback_on_unavailable: bool,
    pub bookend_slides: bool,
    pub static_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            database_url: "sqlite://data/presentations.db".to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            text_timeout: Duration::from_secs(30),
            image_service_url: DEFAULT_IMAGE_SERVICE_URL.to_string(),
            image_timeout: Duration::from_secs(20),
            image_concurrency: 4,
            image_dir: PathBuf::from("data/images"),
            fallback_on_unavailable: true,
            bookend_slides: false,
            static_dir: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            text_timeout: parse_secs("TEXT_TIMEOUT_SECS", get("TEXT_TIMEOUT_SECS"))?
                .unwrap_or(defaults.text_timeout),
            image_service_url: get("IMAGE_SERVICE_URL").unwrap_or(defaults.image_service_url),
            image_timeout: parse_secs("IMAGE_TIMEOUT_SECS", get("IMAGE_TIMEOUT_SECS"))?
                .unwrap_or(defaults.image_timeout),
            image_concurrency: parse_num::<usize>("IMAGE_CONCURRENCY", get("IMAGE_CONCURRENCY"))?
                .filter(|n| *n > 0)
                .unwrap_or(defaults.image_concurrency),
            image_dir: get("IMAGE_DIR").map(PathBuf::from).unwrap_or(defaults.image_dir),
            fallback_on_unavailable: parse_bool(
                "FALLBACK_ON_UNAVAILABLE",
                get("FALLBACK_ON_UNAVAILABLE"),
            )?
            .unwrap_or(defaults.fallback_on_unavailable),
            bookend_slides: parse_bool("DECK_BOOKEND_SLIDES", get("DECK_BOOKEND_SLIDES"))?
                .unwrap_or(defaults.bookend_slides),
            static_dir: get("STATIC_DIR").map(PathBuf::from),
        })
    }
}

fn parse_num<T: FromStr>(key: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError> {
    value
        .map(|v| v.parse::<T>().map_err(|_| ConfigError::Invalid { key, value: v }))
        .transpose()
}

fn parse_secs(key: &'static str, value: Option<String>) -> Result<Option<Duration>, ConfigError> {
    Ok(parse_num::<u64>(key, value)?.map(Duration::from_secs))
}

fn parse_bool(key: &'static str, value: Option<String>) -> Result<Option<bool>, ConfigError> {
    value
        .map(|v| match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value: v }),
        })
        .transpose()
}
