//! Registry lookups with caching, retries and bounded concurrency
//!
//! `RegistryService` never fails: every lookup yields a `PackageVersionInfo`,
//! with `error` set when the registry could not answer. Failures are cached
//! with a shorter TTL than successes.

use super::cache::PackageCache;
use super::client::HttpFetcher;
use super::retry::{is_retryable, retry_with_backoff, RetryPolicy, Sleeper, TokioSleeper};
use super::{create_adapter, RegistryAdapter};
use crate::domain::{PackageManager, PackageQuery, PackageVersionInfo};
use crate::error::RegistryError;
use futures::future::join_all;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Default limit on simultaneous registry requests
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Registry front end shared by all analyses
pub struct RegistryService {
    fetcher: Arc<dyn HttpFetcher>,
    adapters: HashMap<PackageManager, Box<dyn RegistryAdapter>>,
    cache: Arc<PackageCache>,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    concurrency: usize,
}

impl RegistryService {
    /// Create a service for the public registries
    pub fn new(fetcher: Arc<dyn HttpFetcher>) -> Self {
        let adapters = PackageManager::all()
            .iter()
            .map(|&manager| (manager, create_adapter(manager)))
            .collect();

        Self {
            fetcher,
            adapters,
            cache: Arc::new(PackageCache::new()),
            retry: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Replace the adapter for the adapter's package manager
    pub fn with_adapter(mut self, adapter: impl RegistryAdapter + 'static) -> Self {
        self.adapters.insert(adapter.manager(), Box::new(adapter));
        self
    }

    /// Use a shared cache
    pub fn with_cache(mut self, cache: Arc<PackageCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Set how the service waits between attempts
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Set the maximum number of simultaneous lookups (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Returns the cache backing this service
    pub fn cache(&self) -> &Arc<PackageCache> {
        &self.cache
    }

    /// Returns the retry policy
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Returns the concurrency limit
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Looks up the latest version of one package
    pub async fn get_package_info(&self, name: &str, manager: PackageManager) -> PackageVersionInfo {
        if let Some(cached) = self.cache.get(manager, name) {
            debug!(package = %name, manager = %manager, "Cache hit");
            return cached;
        }

        let info = match self.adapters.get(&manager) {
            Some(adapter) => match self.fetch(adapter.as_ref(), name).await {
                Ok(info) => info,
                Err(e) => {
                    warn!(
                        package = %name,
                        registry = adapter.registry_name(),
                        error = %e,
                        "Registry lookup failed"
                    );
                    PackageVersionInfo::failed(name, e.to_string())
                }
            },
            None => PackageVersionInfo::failed(
                name,
                format!("No registry configured for {}", manager.registry_name()),
            ),
        };

        self.cache.insert(manager, name, info.clone());
        info
    }

    /// Looks up many packages; `result[i]` answers `queries[i]`
    pub async fn get_many(&self, queries: &[PackageQuery]) -> Vec<PackageVersionInfo> {
        let semaphore = Semaphore::new(self.concurrency);
        let semaphore = &semaphore;

        let lookups = queries.iter().map(|query| async move {
            // The semaphore is never closed, so acquiring cannot fail.
            let _permit = semaphore.acquire().await.ok();
            self.get_package_info(&query.name, query.manager).await
        });

        join_all(lookups).await
    }

    async fn fetch(
        &self,
        adapter: &dyn RegistryAdapter,
        name: &str,
    ) -> Result<PackageVersionInfo, RegistryError> {
        let url = adapter.package_url(name);
        let registry = adapter.registry_name();

        retry_with_backoff(
            &self.retry,
            self.sleeper.as_ref(),
            |e, _| is_retryable(e),
            |e, attempt, delay| {
                debug!(
                    package = %name,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Retrying registry request"
                );
            },
            |attempt| {
                let url = url.as_str();
                async move {
                    debug!(url, attempt, "Fetching package metadata");
                    let response = self
                        .fetcher
                        .get(url)
                        .await
                        .map_err(|e| RegistryError::from_fetch(e, name, registry))?;

                    match response.status {
                        _ if response.is_success() => {
                            let json: Value = serde_json::from_str(&response.body).map_err(|e| {
                                RegistryError::invalid_response(name, registry, e.to_string())
                            })?;
                            adapter.extract(name, &json)
                        }
                        404 => Err(RegistryError::not_found(name, registry)),
                        status => Err(RegistryError::http_status(name, registry, status)),
                    }
                }
            },
        )
        .await
    }
}
