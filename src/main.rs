//! Page-Harvester main entry point
//!
//! This is the command-line interface for the Page-Harvester site mirror.

use clap::Parser;
use page_harvester::config::{load_settings_with_hash, CrawlConfig, CrawlSettings};
use page_harvester::crawler::harvest;
use page_harvester::output::print_report;
use page_harvester::{ConfigError, HarvestError};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Page-Harvester: a same-domain web mirror
///
/// Page-Harvester downloads every page reachable from a base URL on the same
/// host, mirrors the URL structure onto disk and records per-page metadata.
#[derive(Parser, Debug)]
#[command(name = "page-harvester")]
#[command(version = "1.0.0")]
#[command(about = "A same-domain web mirror", long_about = None)]
struct Cli {
    /// Base URL to start from (overrides the config file)
    #[arg(value_name = "BASE_URL", required_unless_present = "config")]
    base_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory for mirrored pages
    #[arg(short, long, value_name = "DIR")]
    output: Option<String>,

    /// Delay between requests in seconds
    #[arg(short, long, value_name = "SECONDS")]
    delay: Option<f64>,

    /// Store pages under hashed flat file names instead of mirrored paths
    #[arg(long)]
    flat: bool,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<f64>,

    /// User agent to rotate through (repeatable; replaces the default pool)
    #[arg(long = "user-agent", value_name = "AGENT")]
    user_agents: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (config, config_hash) = resolve_config(&cli)?;

    // The log file lives inside the output directory
    std::fs::create_dir_all(config.output_root())?;
    setup_logging(
        cli.verbose,
        cli.quiet,
        config.output_root(),
        config.log_file_name(),
    )?;

    if let (Some(path), Some(hash)) = (&cli.config, &config_hash) {
        tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        );
    }

    tracing::info!(
        "Mirroring {} into {} ({} mode, {:.1}s delay)",
        config.base_url(),
        config.output_root().display(),
        if config.preserve_structure() {
            "mirrored"
        } else {
            "flat"
        },
        config.delay().as_secs_f64()
    );

    // Failures are logged by the engine
    let report = harvest(config).await?;
    if !cli.quiet {
        print_report(&report);
    }

    Ok(())
}

/// Resolves the run configuration from the config file (if any) and
/// command-line overrides
///
/// Returns the validated configuration and the config file fingerprint.
fn resolve_config(cli: &Cli) -> Result<(CrawlConfig, Option<String>), HarvestError> {
    let (settings, hash) = build_settings(cli)?;
    let config = CrawlConfig::from_settings(settings)?;
    Ok((config, hash))
}

fn build_settings(cli: &Cli) -> Result<(CrawlSettings, Option<String>), ConfigError> {
    let (mut settings, hash) = match (&cli.config, &cli.base_url) {
        (Some(path), _) => {
            let (settings, hash) = load_settings_with_hash(path)?;
            (settings, Some(hash))
        }
        (None, Some(url)) => (CrawlSettings::new(url.clone()), None),
        (None, None) => {
            return Err(ConfigError::Validation(
                "either BASE_URL or --config is required".to_string(),
            ))
        }
    };

    if let Some(url) = &cli.base_url {
        settings.crawl.base_url = url.clone();
    }
    if let Some(output) = &cli.output {
        settings.output.directory = output.clone();
    }
    if let Some(delay) = cli.delay {
        settings.crawl.delay_seconds = delay;
    }
    if let Some(timeout) = cli.timeout {
        settings.crawl.request_timeout_seconds = timeout;
    }
    if cli.flat {
        settings.crawl.preserve_structure = false;
    }
    if !cli.user_agents.is_empty() {
        settings.user_agent.pool = cli.user_agents.clone();
    }

    Ok((settings, hash))
}

/// Opens the never-rotated log file inside `log_dir`
fn log_file_appender(log_dir: &Path, log_file: &str) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(log_file)
        .build(log_dir)
}

/// Sets up the tracing subscriber: terminal output plus a log file
fn setup_logging(
    verbose: u8,
    quiet: bool,
    log_dir: &Path,
    log_file: &str,
) -> Result<(), InitError> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_harvester=info,warn"),
            1 => EnvFilter::new("page_harvester=debug,info"),
            2 => EnvFilter::new("page_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let file_appender = log_file_appender(log_dir, log_file)?;

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(false);

    let terminal_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(terminal_layer)
        .with(file_layer)
        .init();

    Ok(())
}
