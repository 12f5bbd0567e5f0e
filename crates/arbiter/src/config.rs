use std::fmt;
use std::time::Duration;

use arbiter_core::ArbiterError;
use arbiter_openai::DEFAULT_BASE_URL;

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_JUDGE_MODEL: &str = "ARBITER_JUDGE_MODEL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "ARBITER_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_JUDGE_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// The provider credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ArbiterError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(ArbiterError::Config(format!(
                "{ENV_API_KEY} is not set; the judge model cannot be reached"
            )));
        }
        Ok(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([redacted])")
    }
}

/// Engine settings: the credential plus provider defaults.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub api_key: ApiKey,
    pub base_url: String,
    pub default_model: String,
    pub request_timeout: Duration,
}

impl EngineConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ArbiterError> {
        Ok(Self {
            api_key: ApiKey::new(api_key)?,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_JUDGE_MODEL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ArbiterError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`. Unset and blank values fall back to
    /// defaults, except the credential, which is required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ArbiterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut config = Self::new(get(ENV_API_KEY).unwrap_or_default())?;
        if let Some(url) = get(ENV_BASE_URL) {
            config = config.with_base_url(url.trim());
        }
        if let Some(model) = get(ENV_JUDGE_MODEL) {
            config = config.with_default_model(model.trim());
        }
        if let Some(raw) = get(ENV_REQUEST_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ArbiterError::Config(format!(
                    "{ENV_REQUEST_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"
                ))
            })?;
            if secs == 0 {
                return Err(ArbiterError::Config(format!(
                    "{ENV_REQUEST_TIMEOUT_SECS} must be greater than zero"
                )));
            }
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}
