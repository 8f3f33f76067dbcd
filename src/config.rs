use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::errors::IngestError;
use crate::retry::RetryPolicy;
use crate::scrape::USER_AGENT_DEFAULT;

const DEFAULT_LISTING_PATH: &str = "/api/edge/channels";
const DEFAULT_CREATE_PATH: &str = "/admin/channel-items/create";
const DEFAULT_HINT_PAGE_PATH: &str = "/admin/channels/{channel_id}";
const DEFAULT_HINT_SELECTOR: &str = r#"select[name="playlist_id"]"#;
const DEFAULT_HINT_FORM_FIELD: &str = "playlist_id";

/// Listings and admin page lookups
const DEFAULT_LISTING_TIMEOUT_SECS: u64 = 10;
/// Watch page scraping
const DEFAULT_METADATA_TIMEOUT_SECS: u64 = 20;
/// Item creation
const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 30;

const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY_SECS: u64 = 2;

/// Environment variables that override the config file.
pub const ENV_CENTRAL_URL: &str = "CENTRAL_URL";
pub const ENV_API_KEY: &str = "API_KEY";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HintConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Admin page path, `{channel_id}` is substituted.
    #[serde(default = "default_hint_page_path")]
    pub page_path: String,

    /// CSS selector of the `<select>` holding the hint.
    #[serde(default = "default_hint_selector")]
    pub selector: String,

    /// Form field the hint is sent as.
    #[serde(default = "default_hint_form_field")]
    pub form_field: String,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            page_path: default_hint_page_path(),
            selector: default_hint_selector(),
            form_field: default_hint_form_field(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub base_url: String,

    /// Sent as `X-API-KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_listing_path")]
    pub listing_path: String,

    #[serde(default = "default_create_path")]
    pub create_path: String,

    #[serde(default)]
    pub hint: HintConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            listing_path: default_listing_path(),
            create_path: default_create_path(),
            hint: HintConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_listing_timeout_secs")]
    pub listing_secs: u64,
    #[serde(default = "default_metadata_timeout_secs")]
    pub metadata_secs: u64,
    #[serde(default = "default_write_timeout_secs")]
    pub write_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            listing_secs: DEFAULT_LISTING_TIMEOUT_SECS,
            metadata_secs: DEFAULT_METADATA_TIMEOUT_SECS,
            write_secs: DEFAULT_WRITE_TIMEOUT_SECS,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_retry_attempts")]
    pub attempts: u32,
    #[serde(default = "default_retry_delay_secs")]
    pub delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RETRY_ATTEMPTS,
            delay_secs: DEFAULT_RETRY_DELAY_SECS,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            timeouts: TimeoutConfig::default(),
            retry: RetryConfig::default(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_hint_page_path() -> String {
    DEFAULT_HINT_PAGE_PATH.to_string()
}

fn default_hint_selector() -> String {
    DEFAULT_HINT_SELECTOR.to_string()
}

fn default_hint_form_field() -> String {
    DEFAULT_HINT_FORM_FIELD.to_string()
}

fn default_listing_path() -> String {
    DEFAULT_LISTING_PATH.to_string()
}

fn default_create_path() -> String {
    DEFAULT_CREATE_PATH.to_string()
}

fn default_listing_timeout_secs() -> u64 {
    DEFAULT_LISTING_TIMEOUT_SECS
}

fn default_metadata_timeout_secs() -> u64 {
    DEFAULT_METADATA_TIMEOUT_SECS
}

fn default_write_timeout_secs() -> u64 {
    DEFAULT_WRITE_TIMEOUT_SECS
}

fn default_retry_attempts() -> u32 {
    DEFAULT_RETRY_ATTEMPTS
}

fn default_retry_delay_secs() -> u64 {
    DEFAULT_RETRY_DELAY_SECS
}

fn default_user_agent() -> String {
    USER_AGENT_DEFAULT.to_string()
}

impl Config {
    /// Load from an optional yaml file, apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, IngestError> {
        let mut config = match path {
            Some(path) => Self::from_yaml(&std::fs::read_to_string(path).map_err(|err| {
                IngestError::Config(format!("cannot read {}: {err}", path.display()))
            })?)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    pub fn from_yaml(config_str: &str) -> Result<Self, IngestError> {
        serde_yml::from_str(config_str)
            .map_err(|err| IngestError::Config(format!("config is malformed: {err}")))
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_CENTRAL_URL) {
            self.catalog.base_url = url.trim().to_string();
        }
        if let Some(key) = non_empty(ENV_API_KEY) {
            self.catalog.api_key = Some(key);
        }
    }

    pub fn validate(&self) -> Result<(), IngestError> {
        if self.catalog.base_url.trim().is_empty() {
            return Err(IngestError::Config(format!(
                "{ENV_CENTRAL_URL} missing: set it in the environment, .env or catalog.base_url"
            )));
        }

        if self.retry.attempts == 0 {
            return Err(IngestError::Config(
                "retry.attempts must be greater than 0".to_string(),
            ));
        }

        let t = &self.timeouts;
        if t.listing_secs == 0 || t.metadata_secs == 0 || t.write_secs == 0 {
            return Err(IngestError::Config(
                "timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry.attempts, Duration::from_secs(self.retry.delay_secs))
    }

    pub fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.listing_secs)
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.metadata_secs)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.write_secs)
    }
}
