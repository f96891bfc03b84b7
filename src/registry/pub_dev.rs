//! pub.dev adapter
//!
//! API endpoint: https://pub.dev/api/packages/{package}

use super::{json_str, RegistryAdapter};
use crate::domain::{PackageManager, PackageVersionInfo, UNKNOWN_VERSION};
use crate::error::RegistryError;
use serde_json::Value;

/// pub.dev API base URL
pub const PUB_DEV_API_URL: &str = "https://pub.dev/api";

/// pub.dev adapter
#[derive(Debug, Clone)]
pub struct PubDevAdapter {
    base_url: String,
}

impl PubDevAdapter {
    /// Create a new pub.dev adapter
    pub fn new() -> Self {
        Self::with_base_url(PUB_DEV_API_URL)
    }

    /// Create a new adapter for a self-hosted pub repository
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for PubDevAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryAdapter for PubDevAdapter {
    fn manager(&self) -> PackageManager {
        PackageManager::Pub
    }

    fn registry_name(&self) -> &'static str {
        "pub.dev"
    }

    fn package_url(&self, name: &str) -> String {
        format!("{}/packages/{}", self.base_url, name)
    }

    fn extract(&self, name: &str, json: &Value) -> Result<PackageVersionInfo, RegistryError> {
        if !json.is_object() {
            return Err(RegistryError::invalid_response(
                name,
                self.registry_name(),
                "expected a JSON object",
            ));
        }

        let latest = json_str(json.pointer("/latest/version")).unwrap_or(UNKNOWN_VERSION);
        let pubspec = json.pointer("/latest/pubspec");
        let field = |key: &str| json_str(pubspec.and_then(|p| p.get(key)));
        let homepage = field("homepage").or_else(|| field("repository"));

        Ok(PackageVersionInfo::found(name, latest)
            .with_description(field("description").map(str::to_string))
            .with_homepage(homepage.map(str::to_string)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pub_dev_adapter_identity() {
        let adapter = PubDevAdapter::new();
        assert_eq!(adapter.manager(), PackageManager::Pub);
        assert_eq!(adapter.registry_name(), "pub.dev");
        assert_eq!(
            adapter.package_url("http"),
            "https://pub.dev/api/packages/http"
        );
    }

    #[test]
    fn test_extract_latest_pubspec() {
        let doc = json!({
            "name": "provider",
            "latest": {
                "version": "6.1.1",
                "pubspec": {
                    "name": "provider",
                    "description": "A wrapper around InheritedWidget",
                    "repository": "https://github.com/rrousselGit/provider"
                }
            },
            "versions": []
        });
        let info = PubDevAdapter::new().extract("provider", &doc).unwrap();

        assert_eq!(info.latest_version, "6.1.1");
        assert_eq!(
            info.description.as_deref(),
            Some("A wrapper around InheritedWidget")
        );
        assert_eq!(
            info.homepage.as_deref(),
            Some("https://github.com/rrousselGit/provider")
        );
    }

    #[test]
    fn test_extract_prefers_homepage() {
        let doc = json!({
            "latest": {
                "version": "1.1.0",
                "pubspec": {"homepage": "https://dart.dev", "repository": "https://github.com/x"}
            }
        });
        let info = PubDevAdapter::new().extract("http", &doc).unwrap();
        assert_eq!(info.homepage.as_deref(), Some("https://dart.dev"));
    }

    #[test]
    fn test_extract_without_latest() {
        let info = PubDevAdapter::new().extract("http", &json!({})).unwrap();
        assert_eq!(info.latest_version, UNKNOWN_VERSION);
        assert!(info.homepage.is_none());
    }
}
