//! CLI argument parsing module for packcheck

use crate::config::ConfigOverrides;
use crate::update::UpdateOptions;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

/// Parse a strictly positive integer
fn parse_positive<T>(s: &str) -> Result<T, String>
where
    T: FromStr + PartialOrd + Default,
{
    let value: T = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", s))?;
    if value <= T::default() {
        return Err(format!("must be greater than 0: {}", s));
    }
    Ok(value)
}

/// Check manifests for outdated dependencies
#[derive(Parser, Debug, Clone)]
#[command(
    name = "packcheck",
    version,
    about = "Check package.json, requirements.txt and pubspec.yaml for outdated dependencies"
)]
pub struct CliArgs {
    /// Manifest file to analyze
    pub file: PathBuf,

    /// File name used for type detection instead of FILE's own name
    #[arg(long, value_name = "NAME")]
    pub file_name: Option<String>,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Show the changes the selected updates would make to the manifest
    #[arg(long)]
    pub diff: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Update selection
    /// Apply major updates
    #[arg(long)]
    pub major: bool,

    /// Apply minor updates
    #[arg(long)]
    pub minor: bool,

    /// Apply patch updates
    #[arg(long)]
    pub patch: bool,

    /// Rewrite FILE with the selected updates
    #[arg(short, long, conflicts_with = "output")]
    pub write: bool,

    /// Write the updated manifest to PATH
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    // Registry options
    /// Configuration file (default: ./packcheck.toml if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Maximum simultaneous registry requests
    #[arg(long, value_parser = parse_positive::<usize>)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in milliseconds
    #[arg(long, value_name = "MS", value_parser = parse_positive::<u64>)]
    pub timeout: Option<u64>,

    /// Attempts per registry request, including the first
    #[arg(long, value_parser = parse_positive::<u32>)]
    pub max_attempts: Option<u32>,

    /// npm registry base URL
    #[arg(long, value_name = "URL")]
    pub npm_registry: Option<String>,

    /// PyPI JSON API base URL
    #[arg(long, value_name = "URL")]
    pub pypi_registry: Option<String>,

    /// pub.dev API base URL
    #[arg(long, value_name = "URL")]
    pub pub_registry: Option<String>,
}

impl CliArgs {
    /// Check if any update type was selected explicitly
    pub fn has_update_selection(&self) -> bool {
        self.major || self.minor || self.patch
    }

    /// Update types to apply; minor and patch when none is given
    pub fn update_options(&self) -> UpdateOptions {
        if !self.has_update_selection() {
            return UpdateOptions::default();
        }
        UpdateOptions::none()
            .with_major(self.major)
            .with_minor(self.minor)
            .with_patch(self.patch)
    }

    /// Check if the updated manifest needs to be generated
    pub fn needs_update(&self) -> bool {
        self.diff || self.write || self.output.is_some()
    }

    /// Where the updated manifest should be written, if anywhere
    pub fn output_path(&self) -> Option<PathBuf> {
        if self.write {
            Some(self.file.clone())
        } else {
            self.output.clone()
        }
    }

    /// File name hint passed to type detection
    pub fn detection_name(&self) -> Option<String> {
        self.file_name.clone().or_else(|| {
            self.file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
    }

    /// Registry settings given on the command line
    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            concurrency: self.concurrency,
            timeout_ms: self.timeout,
            max_attempts: self.max_attempts,
            npm_url: self.npm_registry.clone(),
            pypi_url: self.pypi_registry.clone(),
            pub_url: self.pub_registry.clone(),
        }
    }
}
