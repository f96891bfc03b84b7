//! npm Registry adapter
//!
//! Reads the latest version from the npm registry document.
//! API endpoint: https://registry.npmjs.org/{package}

use super::{json_str, RegistryAdapter};
use crate::domain::{PackageManager, PackageVersionInfo, UNKNOWN_VERSION};
use crate::error::RegistryError;
use serde_json::Value;

/// npm registry base URL
pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// npm Registry adapter
#[derive(Debug, Clone)]
pub struct NpmAdapter {
    base_url: String,
}

impl NpmAdapter {
    /// Create a new npm adapter for the public registry
    pub fn new() -> Self {
        Self::with_base_url(NPM_REGISTRY_URL)
    }

    /// Create a new npm adapter for a custom registry
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for NpmAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryAdapter for NpmAdapter {
    fn manager(&self) -> PackageManager {
        PackageManager::Npm
    }

    fn registry_name(&self) -> &'static str {
        "npm"
    }

    fn package_url(&self, name: &str) -> String {
        // Scoped packages keep the `@` but escape the slash.
        format!("{}/{}", self.base_url, name.replace('/', "%2F"))
    }

    fn extract(&self, name: &str, json: &Value) -> Result<PackageVersionInfo, RegistryError> {
        if !json.is_object() {
            return Err(RegistryError::invalid_response(
                name,
                self.registry_name(),
                "expected a JSON object",
            ));
        }

        let latest = json_str(json.pointer("/dist-tags/latest")).unwrap_or(UNKNOWN_VERSION);
        let homepage =
            json_str(json.get("homepage")).or_else(|| json_str(json.pointer("/repository/url")));

        Ok(PackageVersionInfo::found(name, latest)
            .with_description(json_str(json.get("description")).map(str::to_string))
            .with_homepage(homepage.map(str::to_string)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_npm_adapter_identity() {
        let adapter = NpmAdapter::new();
        assert_eq!(adapter.manager(), PackageManager::Npm);
        assert_eq!(adapter.registry_name(), "npm");
    }

    #[test]
    fn test_package_url() {
        let adapter = NpmAdapter::new();
        assert_eq!(
            adapter.package_url("lodash"),
            "https://registry.npmjs.org/lodash"
        );
    }

    #[test]
    fn test_package_url_scoped_package() {
        let adapter = NpmAdapter::with_base_url("http://127.0.0.1:4873/");
        assert_eq!(
            adapter.package_url("@types/node"),
            "http://127.0.0.1:4873/@types%2Fnode"
        );
    }

    #[test]
    fn test_extract_full_document() {
        let doc = json!({
            "name": "express",
            "description": "Fast, unopinionated, minimalist web framework",
            "dist-tags": {"latest": "4.18.2", "next": "5.0.0-beta.1"},
            "homepage": "http://expressjs.com/",
            "repository": {"type": "git", "url": "git+https://github.com/expressjs/express.git"}
        });
        let info = NpmAdapter::new().extract("express", &doc).unwrap();

        assert_eq!(info.latest_version, "4.18.2");
        assert_eq!(
            info.description.as_deref(),
            Some("Fast, unopinionated, minimalist web framework")
        );
        assert_eq!(info.homepage.as_deref(), Some("http://expressjs.com/"));
        assert!(info.error.is_none());
    }

    #[test]
    fn test_extract_falls_back_to_repository_url() {
        let doc = json!({
            "dist-tags": {"latest": "1.0.0"},
            "homepage": "",
            "repository": {"url": "https://github.com/a/b"}
        });
        let info = NpmAdapter::new().extract("b", &doc).unwrap();
        assert_eq!(info.homepage.as_deref(), Some("https://github.com/a/b"));
    }

    #[test]
    fn test_extract_missing_latest_is_unknown() {
        let info = NpmAdapter::new().extract("a", &json!({"name": "a"})).unwrap();
        assert_eq!(info.latest_version, UNKNOWN_VERSION);
        assert!(info.description.is_none());
        assert!(info.homepage.is_none());
    }

    #[test]
    fn test_extract_rejects_non_object() {
        let err = NpmAdapter::new().extract("a", &json!([1, 2])).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidResponse { .. }));
    }
}
