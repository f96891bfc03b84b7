//! Analysis orchestrator
//!
//! This module provides:
//! - Request validation (size, file name, extension)
//! - Workflow coordination: detect → parse → fetch → classify → summarize
//! - Manifest regeneration for the analyzed packages
//!
//! Registry failures never abort an analysis; they surface as packages
//! with `status == error`.

use crate::domain::{
    AnalysisResponse, FileKind, PackageInfo, PackageQuery, PackageStatus, PackageVersionInfo,
};
use crate::error::{InputError, ParseError};
use crate::generator::generate_updated_manifest;
use crate::manifest::{detect_file_type, get_all_dependencies};
use crate::registry::RegistryService;
use crate::update::{compare_versions, UpdateOptions};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Largest accepted manifest, in bytes
pub const MAX_CONTENT_SIZE: usize = 5 * 1024 * 1024;

/// Longest accepted file name
pub const MAX_FILE_NAME_LENGTH: usize = 255;

/// File extensions accepted for the file name hint
pub const ALLOWED_EXTENSIONS: &[&str] = &[".json", ".txt", ".yaml", ".yml"];

/// Manifest content to analyze
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Raw manifest text
    pub content: String,
    /// Original file name, used as a detection hint
    pub file_name: Option<String>,
}

impl AnalysisRequest {
    /// Create a request without a file name
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            file_name: None,
        }
    }

    /// Attach the original file name
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// Errors that stop an analysis before any registry lookup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl AnalysisError {
    /// HTTP status a service front end would answer with
    pub fn http_status(&self) -> u16 {
        match self {
            AnalysisError::Input(InputError::ContentTooLarge { .. }) => 413,
            AnalysisError::Input(_) | AnalysisError::Parse(_) => 400,
        }
    }
}

/// Completed analysis together with what was detected
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Detected manifest kind
    pub file_kind: FileKind,
    /// Sanitized file name used for detection
    pub file_name: Option<String>,
    /// Per-package results and summary
    pub response: AnalysisResponse,
}

/// Removes path separators and surrounding whitespace
pub fn sanitize_file_name(file_name: &str) -> String {
    file_name.replace(['/', '\\'], "").trim().to_string()
}

fn has_allowed_extension(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Validates a request, returning the sanitized file name hint
pub fn validate_request(request: &AnalysisRequest) -> Result<Option<String>, InputError> {
    if request.content.is_empty() {
        return Err(InputError::MissingContent);
    }
    if request.content.len() > MAX_CONTENT_SIZE {
        return Err(InputError::ContentTooLarge {
            size: request.content.len(),
            max: MAX_CONTENT_SIZE,
        });
    }

    let Some(file_name) = request.file_name.as_deref().filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    if file_name.chars().count() > MAX_FILE_NAME_LENGTH {
        return Err(InputError::invalid_file_name(format!(
            "longer than {} characters",
            MAX_FILE_NAME_LENGTH
        )));
    }

    let sanitized = sanitize_file_name(file_name);
    if sanitized.is_empty() {
        return Ok(None);
    }
    if !has_allowed_extension(&sanitized) {
        return Err(InputError::unsupported_file_type(sanitized));
    }
    Ok(Some(sanitized))
}

/// Combines a registry answer with the declared version
fn build_package_info(
    name: &str,
    current_version: &str,
    file_kind: FileKind,
    info: PackageVersionInfo,
) -> PackageInfo {
    let manager = file_kind.package_manager();

    if let Some(error) = info.error {
        return PackageInfo::error(name, current_version, info.latest_version, manager, error);
    }

    let status = compare_versions(current_version, &info.latest_version);
    if status == PackageStatus::Error {
        let message = format!(
            "Unable to compare versions {} and {}",
            current_version, info.latest_version
        );
        return PackageInfo::error(name, current_version, info.latest_version, manager, message);
    }

    let mut package = PackageInfo::new(
        name,
        current_version,
        info.latest_version,
        status,
        manager,
    );
    package.description = info.description;
    package.homepage = info.homepage;
    package
}

/// Runs analyses against a shared registry service
#[derive(Clone)]
pub struct Analyzer {
    registry: Arc<RegistryService>,
}

impl Analyzer {
    /// Create an analyzer backed by the given registry service
    pub fn new(registry: Arc<RegistryService>) -> Self {
        Self { registry }
    }

    /// Returns the registry service
    pub fn registry(&self) -> &Arc<RegistryService> {
        &self.registry
    }

    /// Analyzes a manifest, returning the per-package report
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        self.run(request).await.map(|analysis| analysis.response)
    }

    /// Analyzes a manifest, also reporting the detected kind
    pub async fn run(&self, request: &AnalysisRequest) -> Result<Analysis, AnalysisError> {
        let file_name = validate_request(request)?;
        let manifest = detect_file_type(&request.content, file_name.as_deref())?;
        let dependencies = get_all_dependencies(&manifest);

        info!(
            kind = %manifest.kind,
            dependencies = dependencies.len(),
            "Starting analysis"
        );

        if dependencies.is_empty() {
            return Ok(Analysis {
                file_kind: manifest.kind,
                file_name,
                response: AnalysisResponse::empty(),
            });
        }

        let queries: Vec<PackageQuery> = dependencies
            .keys()
            .map(|name| PackageQuery::new(name.as_str(), manifest.package_manager))
            .collect();
        let results = self.registry.get_many(&queries).await;

        let packages: Vec<PackageInfo> = dependencies
            .iter()
            .zip(results)
            .map(|((name, current), info)| build_package_info(name, current, manifest.kind, info))
            .collect();

        let response = AnalysisResponse::from_packages(packages);
        info!(
            total = response.summary.total,
            outdated = response.summary.outdated,
            errors = response.summary.errors,
            "Analysis finished"
        );

        Ok(Analysis {
            file_kind: manifest.kind,
            file_name,
            response,
        })
    }

    /// Regenerates `content` with the selected upgrades applied
    ///
    /// Returns `content` unchanged when nothing applies or regeneration fails.
    pub fn generate_update(
        &self,
        content: &str,
        packages: &[PackageInfo],
        options: &UpdateOptions,
        file_name: Option<&str>,
    ) -> String {
        debug!(
            major = options.update_major,
            minor = options.update_minor,
            patch = options.update_patch,
            "Generating update"
        );
        generate_updated_manifest(content, packages, options, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnalysisSummary, PackageManager, UNKNOWN_VERSION};
    use crate::error::FetchError;
    use crate::registry::{HttpFetcher, HttpResponse, RetryPolicy, Sleeper};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Fetcher with one fixed reply per URL; unknown URLs answer 404
    #[derive(Default)]
    struct StaticFetcher {
        replies: HashMap<String, Result<HttpResponse, FetchError>>,
        calls: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        fn reply(mut self, url: &str, status: u16, body: &str) -> Self {
            self.replies
                .insert(url.to_string(), Ok(HttpResponse::new(status, body)));
            self
        }

        fn fail(mut self, url: &str, err: FetchError) -> Self {
            self.replies.insert(url.to_string(), Err(err));
            self
        }
    }

    #[async_trait]
    impl HttpFetcher for StaticFetcher {
        async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            self.replies
                .get(url)
                .cloned()
                .unwrap_or_else(|| Ok(HttpResponse::new(404, "")))
        }
    }

    struct NoSleep;

    #[async_trait]
    impl Sleeper for NoSleep {
        async fn sleep(&self, _duration: Duration) {}
    }

    fn analyzer(fetcher: StaticFetcher) -> Analyzer {
        let service = RegistryService::new(Arc::new(fetcher))
            .with_retry(RetryPolicy::standard())
            .with_sleeper(Arc::new(NoSleep));
        Analyzer::new(Arc::new(service))
    }

    fn npm(name: &str, latest: &str) -> (String, String) {
        (
            format!("https://registry.npmjs.org/{}", name),
            format!(r#"{{"dist-tags":{{"latest":"{}"}}}}"#, latest),
        )
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("../../etc/package.json"), "....etcpackage.json");
        assert_eq!(sanitize_file_name(" dir\\requirements.txt "), "dirrequirements.txt");
    }

    #[test]
    fn test_validate_request() {
        assert_eq!(
            validate_request(&AnalysisRequest::new("")),
            Err(InputError::MissingContent)
        );
        assert_eq!(
            validate_request(&AnalysisRequest::new("x").with_file_name("Pubspec.YML")),
            Ok(Some("Pubspec.YML".to_string()))
        );
        assert_eq!(
            validate_request(&AnalysisRequest::new("x").with_file_name("")),
            Ok(None)
        );
        assert!(matches!(
            validate_request(&AnalysisRequest::new("x").with_file_name("a".repeat(256))),
            Err(InputError::InvalidFileName { .. })
        ));
        assert!(matches!(
            validate_request(&AnalysisRequest::new("x").with_file_name("Cargo.toml")),
            Err(InputError::UnsupportedFileType { .. })
        ));
    }

    #[test]
    fn test_validate_content_size() {
        let big = "a".repeat(MAX_CONTENT_SIZE + 1);
        let err = validate_request(&AnalysisRequest::new(big)).unwrap_err();
        assert!(matches!(err, InputError::ContentTooLarge { .. }));
        assert_eq!(AnalysisError::from(err).http_status(), 413);

        let exact = "a".repeat(MAX_CONTENT_SIZE);
        assert!(validate_request(&AnalysisRequest::new(exact)).is_ok());
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(AnalysisError::from(InputError::MissingContent).http_status(), 400);
        assert_eq!(AnalysisError::from(ParseError::UnsupportedFormat).http_status(), 400);
    }

    #[test]
    fn test_build_package_info_keeps_error_invariant() {
        let failed = build_package_info(
            "x",
            "1.0.0",
            FileKind::PackageJson,
            PackageVersionInfo::failed("x", "Package not found"),
        );
        assert_eq!(failed.status, PackageStatus::Error);
        assert_eq!(failed.latest_version, UNKNOWN_VERSION);
        assert_eq!(failed.error.as_deref(), Some("Package not found"));

        let incomparable = build_package_info(
            "y",
            "1.0.0",
            FileKind::PackageJson,
            PackageVersionInfo::found("y", UNKNOWN_VERSION),
        );
        assert_eq!(incomparable.status, PackageStatus::Error);
        assert_eq!(
            incomparable.error.as_deref(),
            Some("Unable to compare versions 1.0.0 and unknown")
        );

        let fine = build_package_info(
            "z",
            "^1.0.0",
            FileKind::PackageJson,
            PackageVersionInfo::found("z", "1.2.0").with_description(Some("d".to_string())),
        );
        assert_eq!(fine.status, PackageStatus::Outdated);
        assert!(fine.error.is_none());
        assert_eq!(fine.description.as_deref(), Some("d"));
    }

    #[tokio::test]
    async fn test_analyze_package_json() {
        let (url, body) = npm("lodash", "4.17.21");
        let analyzer = analyzer(StaticFetcher::default().reply(&url, 200, &body));

        let response = analyzer
            .analyze(&AnalysisRequest::new(r#"{"dependencies":{"lodash":"4.17.20"}}"#))
            .await
            .unwrap();

        assert_eq!(
            response.summary,
            AnalysisSummary {
                total: 1,
                up_to_date: 0,
                outdated: 1,
                errors: 0
            }
        );
        let lodash = &response.packages[0];
        assert_eq!(lodash.package_manager, PackageManager::Npm);
        assert_eq!(lodash.latest_version, "4.17.21");

        let updated = analyzer.generate_update(
            r#"{"dependencies":{"lodash":"4.17.20"}}"#,
            &response.packages,
            &UpdateOptions::none().with_patch(true),
            None,
        );
        assert!(updated.contains(r#""lodash": "4.17.21""#));
    }

    #[tokio::test]
    async fn test_analyze_merges_dev_dependencies_in_order() {
        let content = r#"{
  "dependencies": {"react": "^18.0.0", "axios": "1.6.0"},
  "devDependencies": {"jest": "^29.0.0", "react": "18.2.0"}
}"#;
        let (r_url, r_body) = npm("react", "18.2.0");
        let (a_url, a_body) = npm("axios", "1.6.2");
        let (j_url, j_body) = npm("jest", "29.7.0");
        let analyzer = analyzer(
            StaticFetcher::default()
                .reply(&r_url, 200, &r_body)
                .reply(&a_url, 200, &a_body)
                .reply(&j_url, 200, &j_body),
        );

        let response = analyzer
            .analyze(&AnalysisRequest::new(content).with_file_name("package.json"))
            .await
            .unwrap();

        let rows: Vec<_> = response
            .packages
            .iter()
            .map(|p| (p.name.as_str(), p.current_version.as_str(), p.status))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("react", "18.2.0", PackageStatus::UpToDate),
                ("axios", "1.6.0", PackageStatus::Outdated),
                ("jest", "^29.0.0", PackageStatus::Outdated),
            ]
        );
    }

    #[tokio::test]
    async fn test_analyze_requirements_skips_non_packages() {
        let fetcher = StaticFetcher::default().reply(
            "https://pypi.org/pypi/Django/json",
            200,
            r#"{"info":{"version":"4.2.7"}}"#,
        );
        let analyzer = analyzer(fetcher);

        let analysis = analyzer
            .run(&AnalysisRequest::new("Django==4.1.0\n# comment\n-e .").with_file_name("requirements.txt"))
            .await
            .unwrap();

        assert_eq!(analysis.file_kind, FileKind::RequirementsTxt);
        assert_eq!(analysis.response.packages.len(), 1);
        assert_eq!(analysis.response.packages[0].name, "Django");
        assert_eq!(analysis.response.packages[0].current_version, "4.1.0");
        assert_eq!(analysis.response.packages[0].status, PackageStatus::Outdated);
    }

    #[tokio::test]
    async fn test_timeout_becomes_error_package() {
        let analyzer = analyzer(
            StaticFetcher::default().fail("https://registry.npmjs.org/slow", FetchError::Timeout),
        );

        let response = analyzer
            .analyze(&AnalysisRequest::new(r#"{"dependencies":{"slow":"1.0.0"}}"#))
            .await
            .unwrap();

        let slow = &response.packages[0];
        assert_eq!(slow.status, PackageStatus::Error);
        assert_eq!(slow.error.as_deref(), Some("Request timeout"));
        assert_eq!(response.summary.errors, 1);

        let cached = analyzer
            .registry()
            .cache()
            .get(PackageManager::Npm, "slow")
            .unwrap();
        assert_eq!(cached.error.as_deref(), Some("Request timeout"));
    }

    #[tokio::test]
    async fn test_empty_dependencies() {
        let analyzer = analyzer(StaticFetcher::default());
        let analysis = analyzer
            .run(&AnalysisRequest::new(r#"{"name":"app","version":"1.0.0"}"#))
            .await
            .unwrap();

        assert_eq!(analysis.file_kind, FileKind::PackageJson);
        assert_eq!(analysis.response, AnalysisResponse::empty());
    }

    #[tokio::test]
    async fn test_parse_errors_are_reported() {
        let analyzer = analyzer(StaticFetcher::default());

        let err = analyzer
            .analyze(&AnalysisRequest::new("{ broken"))
            .await
            .unwrap_err();
        assert_eq!(err, AnalysisError::Parse(ParseError::InvalidJson));

        let err = analyzer
            .analyze(&AnalysisRequest::new("   \n"))
            .await
            .unwrap_err();
        assert_eq!(err, AnalysisError::Parse(ParseError::EmptyContent));
        assert_eq!(err.http_status(), 400);
    }
}
