//! Registry lookups for the latest package versions
//!
//! This module provides:
//! - HTTP transport behind the `HttpFetcher` trait
//! - Retry with exponential backoff and jitter
//! - A TTL cache with bounded size
//! - npm Registry, PyPI JSON API and pub.dev adapters
//! - `RegistryService`, which combines all of the above

mod cache;
mod client;
mod npm;
mod pub_dev;
mod pypi;
mod retry;
mod service;

pub use cache::{
    CacheConfig, CacheEntry, CacheStats, Clock, ManualClock, PackageCache, SweeperHandle,
    SystemClock, DEFAULT_CLEANUP_INTERVAL, DEFAULT_ERROR_TTL, DEFAULT_MAX_ENTRIES, DEFAULT_TTL,
};
pub use client::{HttpFetcher, HttpResponse, ReqwestFetcher, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use npm::{NpmAdapter, NPM_REGISTRY_URL};
pub use pub_dev::{PubDevAdapter, PUB_DEV_API_URL};
pub use pypi::{PyPIAdapter, PYPI_API_URL};
pub use retry::{is_retryable, retry_with_backoff, RetryPolicy, Sleeper, TokioSleeper};
pub use service::{RegistryService, DEFAULT_CONCURRENCY};

use crate::domain::{PackageManager, PackageVersionInfo};
use crate::error::RegistryError;
use serde_json::Value;

/// Trait for registry adapters
///
/// Adapters only know where a package lives and how to read the registry's
/// document; fetching, retrying and caching happen in `RegistryService`.
pub trait RegistryAdapter: Send + Sync {
    /// Get the package manager this adapter handles
    fn manager(&self) -> PackageManager;

    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Build the metadata URL for a package
    fn package_url(&self, name: &str) -> String;

    /// Read the latest version and metadata from a registry document
    fn extract(&self, name: &str, json: &Value) -> Result<PackageVersionInfo, RegistryError>;
}

/// Create the public registry adapter for the given package manager
pub fn create_adapter(manager: PackageManager) -> Box<dyn RegistryAdapter> {
    match manager {
        PackageManager::Npm => Box::new(NpmAdapter::new()),
        PackageManager::Pip => Box::new(PyPIAdapter::new()),
        PackageManager::Pub => Box::new(PubDevAdapter::new()),
    }
}

/// Non-empty string at `value`
fn json_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
