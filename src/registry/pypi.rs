//! PyPI JSON API adapter
//!
//! API endpoint: https://pypi.org/pypi/{package}/json

use super::{json_str, RegistryAdapter};
use crate::domain::{PackageManager, PackageVersionInfo, UNKNOWN_VERSION};
use crate::error::RegistryError;
use serde_json::Value;

/// PyPI API base URL
pub const PYPI_API_URL: &str = "https://pypi.org/pypi";

/// PyPI JSON API adapter
#[derive(Debug, Clone)]
pub struct PyPIAdapter {
    base_url: String,
}

impl PyPIAdapter {
    /// Create a new PyPI adapter for the public index
    pub fn new() -> Self {
        Self::with_base_url(PYPI_API_URL)
    }

    /// Create a new PyPI adapter for a custom index
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for PyPIAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryAdapter for PyPIAdapter {
    fn manager(&self) -> PackageManager {
        PackageManager::Pip
    }

    fn registry_name(&self) -> &'static str {
        "PyPI"
    }

    fn package_url(&self, name: &str) -> String {
        format!("{}/{}/json", self.base_url, name)
    }

    fn extract(&self, name: &str, json: &Value) -> Result<PackageVersionInfo, RegistryError> {
        let info = json.get("info").filter(|v| v.is_object()).ok_or_else(|| {
            RegistryError::invalid_response(name, self.registry_name(), "missing 'info' object")
        })?;

        let latest = json_str(info.get("version")).unwrap_or(UNKNOWN_VERSION);
        let homepage = json_str(info.get("home_page"))
            .or_else(|| json_str(info.pointer("/project_urls/Homepage")));

        Ok(PackageVersionInfo::found(name, latest)
            .with_description(json_str(info.get("summary")).map(str::to_string))
            .with_homepage(homepage.map(str::to_string)))
    }
}
