//! Configuration file support
//!
//! A `packcheck.toml` file may tune the registry endpoints, retry policy
//! and cache. Every section and key is optional; missing values fall back
//! to the built-in defaults. Command-line flags override file values.

use crate::error::{ConfigError, FetchError};
use crate::registry::{
    CacheConfig, NpmAdapter, PackageCache, PubDevAdapter, PyPIAdapter, RegistryService,
    ReqwestFetcher, RetryPolicy, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
    NPM_REGISTRY_URL, PUB_DEV_API_URL, PYPI_API_URL,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "packcheck.toml";

/// Upper bound for cache TTLs and the sweep interval (one week)
pub const MAX_CACHE_SECS: u64 = 7 * 24 * 60 * 60;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub registry: RegistrySettings,
    pub retry: RetrySettings,
    pub cache: CacheSettings,
}

/// `[registry]` section
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrySettings {
    pub npm_url: String,
    pub pypi_url: String,
    pub pub_url: String,
    /// Per-request deadline in milliseconds
    pub timeout_ms: u64,
    /// Maximum simultaneous lookups
    pub concurrency: usize,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            npm_url: NPM_REGISTRY_URL.to_string(),
            pypi_url: PYPI_API_URL.to_string(),
            pub_url: PUB_DEV_API_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// `[retry]` section
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_factor: f64,
    pub jitter: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            initial_delay_ms: policy.initial_delay.as_millis() as u64,
            max_delay_ms: policy.max_delay.as_millis() as u64,
            backoff_factor: policy.backoff_factor,
            jitter: policy.use_jitter,
        }
    }
}

/// `[cache]` section
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSettings {
    pub ttl_secs: u64,
    pub error_ttl_secs: u64,
    pub max_entries: usize,
    pub cleanup_interval_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        let config = CacheConfig::default();
        Self {
            ttl_secs: config.ttl.as_secs(),
            error_ttl_secs: config.error_ttl.as_secs(),
            max_entries: config.max_entries,
            cleanup_interval_secs: config.cleanup_interval.as_secs(),
        }
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub concurrency: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub max_attempts: Option<u32>,
    pub npm_url: Option<String>,
    pub pypi_url: Option<String>,
    pub pub_url: Option<String>,
}

impl Config {
    /// Parse configuration from TOML text; `origin` names the source in errors
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::parse_error(origin, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        Self::from_toml_str(&content, path)
    }

    /// Load `path` if given, else `packcheck.toml` in `dir` if present, else defaults
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply command-line overrides and re-validate
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(concurrency) = overrides.concurrency {
            self.registry.concurrency = concurrency;
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.registry.timeout_ms = timeout_ms;
        }
        if let Some(max_attempts) = overrides.max_attempts {
            self.retry.max_attempts = max_attempts;
        }
        if let Some(url) = &overrides.npm_url {
            self.registry.npm_url = url.clone();
        }
        if let Some(url) = &overrides.pypi_url {
            self.registry.pypi_url = url.clone();
        }
        if let Some(url) = &overrides.pub_url {
            self.registry.pub_url = url.clone();
        }
        self.validate()?;
        Ok(self)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, url) in [
            ("registry.npm_url", &self.registry.npm_url),
            ("registry.pypi_url", &self.registry.pypi_url),
            ("registry.pub_url", &self.registry.pub_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::invalid_value(
                    key,
                    format!("'{}' is not an http(s) URL", url),
                ));
            }
        }
        if self.registry.timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "registry.timeout_ms",
                "must be greater than 0",
            ));
        }
        if self.registry.concurrency == 0 {
            return Err(ConfigError::invalid_value(
                "registry.concurrency",
                "must be at least 1",
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::invalid_value(
                "retry.max_attempts",
                "must be at least 1",
            ));
        }
        if !self.retry.backoff_factor.is_finite() || self.retry.backoff_factor < 1.0 {
            return Err(ConfigError::invalid_value(
                "retry.backoff_factor",
                "must be a finite number of at least 1.0",
            ));
        }
        if self.retry.initial_delay_ms > self.retry.max_delay_ms {
            return Err(ConfigError::invalid_value(
                "retry.initial_delay_ms",
                "must not exceed retry.max_delay_ms",
            ));
        }
        if self.cache.max_entries == 0 {
            return Err(ConfigError::invalid_value(
                "cache.max_entries",
                "must be at least 1",
            ));
        }
        if self.cache.cleanup_interval_secs == 0 {
            return Err(ConfigError::invalid_value(
                "cache.cleanup_interval_secs",
                "must be greater than 0",
            ));
        }
        for (key, secs) in [
            ("cache.ttl_secs", self.cache.ttl_secs),
            ("cache.error_ttl_secs", self.cache.error_ttl_secs),
            ("cache.cleanup_interval_secs", self.cache.cleanup_interval_secs),
        ] {
            if secs > MAX_CACHE_SECS {
                return Err(ConfigError::invalid_value(
                    key,
                    format!("must not exceed {} seconds", MAX_CACHE_SECS),
                ));
            }
        }
        Ok(())
    }

    /// Per-request deadline
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.registry.timeout_ms)
    }

    /// Retry policy described by the `[retry]` section
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::standard()
            .with_max_attempts(self.retry.max_attempts)
            .with_initial_delay(Duration::from_millis(self.retry.initial_delay_ms))
            .with_max_delay(Duration::from_millis(self.retry.max_delay_ms))
            .with_backoff_factor(self.retry.backoff_factor)
            .with_jitter(self.retry.jitter)
    }

    /// Cache settings described by the `[cache]` section
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: Duration::from_secs(self.cache.ttl_secs),
            error_ttl: Duration::from_secs(self.cache.error_ttl_secs),
            max_entries: self.cache.max_entries,
            cleanup_interval: Duration::from_secs(self.cache.cleanup_interval_secs),
        }
    }

    /// Build a registry service using reqwest and these settings
    pub fn registry_service(&self) -> Result<RegistryService, FetchError> {
        let fetcher = ReqwestFetcher::with_config(self.timeout(), DEFAULT_USER_AGENT)?;

        Ok(RegistryService::new(Arc::new(fetcher))
            .with_adapter(NpmAdapter::with_base_url(&self.registry.npm_url))
            .with_adapter(PyPIAdapter::with_base_url(&self.registry.pypi_url))
            .with_adapter(PubDevAdapter::with_base_url(&self.registry.pub_url))
            .with_cache(Arc::new(PackageCache::with_config(self.cache_config())))
            .with_retry(self.retry_policy())
            .with_concurrency(self.registry.concurrency))
    }
}
