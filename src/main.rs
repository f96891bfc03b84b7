//! packcheck - dependency freshness checker CLI tool
//!
//! Analyzes a single manifest against its registry:
//! - package.json (npm)
//! - requirements.txt (PyPI)
//! - pubspec.yaml (pub.dev)

use clap::Parser;
use packcheck::cli::CliArgs;
use packcheck::config::Config;
use packcheck::generator::{read_manifest, write_manifest};
use packcheck::orchestrator::{AnalysisRequest, Analyzer};
use packcheck::output::{create_formatter, OutputConfig, Report};
use packcheck::progress::Progress;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "PACKCHECK_LOG";

/// Exit code when the analysis completed but some lookups failed
const EXIT_PARTIAL: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, filtered by `PACKCHECK_LOG`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be set when embedded; logging is optional then.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.verbose {
        eprintln!("packcheck v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Manifest: {}", args.file.display());
    }

    let config_dir = args
        .file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let config = Config::discover(args.config.as_deref(), config_dir)?
        .with_overrides(&args.config_overrides())?;

    let registry = Arc::new(config.registry_service()?);
    let _sweeper = registry.cache().spawn_sweeper();
    let analyzer = Analyzer::new(registry);

    let content = read_manifest(&args.file)?;
    let mut request = AnalysisRequest::new(content.clone());
    if let Some(name) = args.detection_name() {
        request = request.with_file_name(name);
    }

    let mut progress = Progress::new(!args.quiet && !args.json && io::stderr().is_terminal());
    progress.spinner("Checking registries...");
    let analysis = analyzer.run(&request).await;
    progress.finish_and_clear();
    let analysis = analysis?;

    let options = args.update_options();
    let updated = args.needs_update().then(|| {
        analyzer.generate_update(
            &content,
            &analysis.response.packages,
            &options,
            analysis.file_name.as_deref(),
        )
    });

    let mut report = Report::new(&analysis, &content).with_options(options);
    if let Some(updated) = updated.as_deref() {
        report = report.with_updated(updated);
    }

    let output_config = OutputConfig::from_cli(args.json, args.diff, args.verbose, args.quiet)
        .with_color(io::stdout().is_terminal());
    let formatter = create_formatter(output_config);

    let mut stdout = io::stdout().lock();
    formatter.format(&report, &mut stdout)?;
    stdout.flush()?;

    if let (Some(path), Some(updated)) = (args.output_path(), updated.as_deref()) {
        if updated != content || path != args.file {
            write_manifest(&path, updated)?;
            if !args.quiet && !args.json {
                eprintln!("Wrote {}", path.display());
            }
        }
    }

    if analysis.response.summary.has_errors() {
        Ok(ExitCode::from(EXIT_PARTIAL))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
