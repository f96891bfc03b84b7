//! Application error types using thiserror
//!
//! Error hierarchy:
//! - InputError: Rejected analysis requests (content, file name)
//! - ParseError: Manifest content that cannot be detected or parsed
//! - RegistryError: Failures talking to a package registry
//! - FetchError: Transport-level failures below the registry adapters
//! - GenerateError: Failures while regenerating a manifest
//! - ConfigError: Invalid configuration files or values
//! - IoError: File system operation failures

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Analysis request validation errors
    #[error(transparent)]
    Input(#[from] InputError),

    /// Manifest detection or parsing errors
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Package registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Manifest regeneration errors
    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Errors raised while validating an analysis request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Content missing or blank
    #[error("Valid content is required")]
    MissingContent,

    /// Content exceeds the accepted size
    #[error("Content too large: {size} bytes exceeds the {max} byte limit")]
    ContentTooLarge { size: usize, max: usize },

    /// File name rejected
    #[error("Invalid file name: {message}")]
    InvalidFileName { message: String },

    /// File extension not accepted
    #[error("Unsupported file type '{file_name}'. Supported extensions: .json, .txt, .yaml, .yml")]
    UnsupportedFileType { file_name: String },
}

/// Errors raised while detecting or parsing manifest content
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Blank input
    #[error("File content is empty")]
    EmptyContent,

    /// Undetected content that looks like broken JSON
    #[error("Invalid JSON format - file may be corrupted")]
    InvalidJson,

    /// No parser recognized the content
    #[error("Unable to detect file type. Supported formats: package.json, requirements.txt, pubspec.yaml")]
    UnsupportedFormat,

    /// package.json that could not be deserialized
    #[error("Failed to parse package.json: {message}")]
    Json { message: String },
}

/// Errors related to package registry communication
///
/// The display strings double as the per-package error messages reported to
/// callers, so they stay short and free of package names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Registry answered 404
    #[error("Package not found")]
    NotFound { package: String, registry: String },

    /// Request exceeded its deadline
    #[error("Request timeout")]
    Timeout { package: String, registry: String },

    /// Non-success status other than 404
    #[error("HTTP error: status {status}")]
    HttpStatus {
        package: String,
        registry: String,
        status: u16,
    },

    /// Connection-level failure
    #[error("{message}")]
    Network {
        package: String,
        registry: String,
        message: String,
    },

    /// Response body did not match the registry schema
    #[error("Invalid response: {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },
}

/// Transport failures reported by an HTTP fetcher
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request did not complete before the deadline
    #[error("request timed out")]
    Timeout,

    /// Connection, DNS, TLS or body read failure
    #[error("{0}")]
    Network(String),
}

/// Errors raised while regenerating a manifest
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// Content could not be detected or parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// package.json could not be read or written back
    #[error("Failed to regenerate package.json: {message}")]
    Json { message: String },

    /// A line pattern for a package name could not be built
    #[error("Invalid pattern for package '{package}': {message}")]
    Pattern { package: String, message: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected schema
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// A value is outside its accepted range
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors related to IO operations
#[derive(Error, Debug)]
pub enum IoError {
    /// Manifest file not found
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read a file
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// Creates a new Json error
    pub fn json(message: impl Into<String>) -> Self {
        ParseError::Json {
            message: message.into(),
        }
    }
}

impl InputError {
    /// Creates a new InvalidFileName error
    pub fn invalid_file_name(message: impl Into<String>) -> Self {
        InputError::InvalidFileName {
            message: message.into(),
        }
    }

    /// Creates a new UnsupportedFileType error
    pub fn unsupported_file_type(file_name: impl Into<String>) -> Self {
        InputError::UnsupportedFileType {
            file_name: file_name.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new NotFound error
    pub fn not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::NotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new HttpStatus error
    pub fn http_status(package: impl Into<String>, registry: impl Into<String>, status: u16) -> Self {
        RegistryError::HttpStatus {
            package: package.into(),
            registry: registry.into(),
            status,
        }
    }

    /// Creates a new Network error
    pub fn network(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::Network {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Converts a transport failure for the given package
    pub fn from_fetch(
        err: FetchError,
        package: impl Into<String>,
        registry: impl Into<String>,
    ) -> Self {
        match err {
            FetchError::Timeout => RegistryError::timeout(package, registry),
            FetchError::Network(message) => RegistryError::network(package, registry, message),
        }
    }

    /// Returns the package this error refers to
    pub fn package(&self) -> &str {
        match self {
            RegistryError::NotFound { package, .. }
            | RegistryError::Timeout { package, .. }
            | RegistryError::HttpStatus { package, .. }
            | RegistryError::Network { package, .. }
            | RegistryError::InvalidResponse { package, .. } => package,
        }
    }

    /// Returns the HTTP status code, if the failure carried one
    pub fn status(&self) -> Option<u16> {
        match self {
            RegistryError::NotFound { .. } => Some(404),
            RegistryError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl GenerateError {
    /// Creates a new Json error
    pub fn json(message: impl Into<String>) -> Self {
        GenerateError::Json {
            message: message.into(),
        }
    }

    /// Creates a new Pattern error
    pub fn pattern(package: impl Into<String>, message: impl Into<String>) -> Self {
        GenerateError::Pattern {
            package: package.into(),
            message: message.into(),
        }
    }
}

impl ConfigError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidValue error
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl IoError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        IoError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::WriteError {
            path: path.into(),
            source,
        }
    }
}
