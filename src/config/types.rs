use crate::config::validation::{seconds_to_duration, validate};
use crate::url::network_location;
use crate::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// User agents rotated through when the configuration does not supply a pool
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
];

pub const DEFAULT_OUTPUT_DIR: &str = "downloaded_pages";
pub const DEFAULT_METADATA_FILE: &str = "metadata.json";
pub const DEFAULT_LOG_FILE: &str = "scraper.log";
pub const DEFAULT_DELAY_SECONDS: f64 = 1.0;
pub const DEFAULT_TIMEOUT_SECONDS: f64 = 30.0;

/// Raw crawl settings as read from a TOML file or assembled by the CLI
///
/// Settings are freely editable. They become a [`CrawlConfig`] once validated.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSettings {
    pub crawl: CrawlSection,

    #[serde(default)]
    pub output: OutputSection,

    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentSection,
}

/// Crawl behavior settings
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSection {
    /// The URL the crawl starts from; also defines the crawl's domain
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Pause after every successful download (seconds)
    #[serde(rename = "delay-seconds", default = "default_delay")]
    pub delay_seconds: f64,

    /// Mirror the URL path structure instead of hashing URLs into flat names
    #[serde(rename = "preserve-structure", default = "default_true")]
    pub preserve_structure: bool,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-seconds", default = "default_timeout")]
    pub request_timeout_seconds: f64,
}

/// Output location settings
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSection {
    /// Root directory for mirrored pages, metadata and the log file
    #[serde(default = "default_output_dir")]
    pub directory: String,

    /// File name of the metadata snapshot inside the output directory
    #[serde(rename = "metadata-file", default = "default_metadata_file")]
    pub metadata_file: String,

    /// File name of the persistent log inside the output directory
    #[serde(rename = "log-file", default = "default_log_file")]
    pub log_file: String,
}

/// User agent pool settings
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentSection {
    #[serde(default = "default_user_agents")]
    pub pool: Vec<String>,
}

fn default_delay() -> f64 {
    DEFAULT_DELAY_SECONDS
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> f64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

fn default_metadata_file() -> String {
    DEFAULT_METADATA_FILE.to_string()
}

fn default_log_file() -> String {
    DEFAULT_LOG_FILE.to_string()
}

fn default_user_agents() -> Vec<String> {
    DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect()
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            metadata_file: default_metadata_file(),
            log_file: default_log_file(),
        }
    }
}

impl Default for UserAgentSection {
    fn default() -> Self {
        Self {
            pool: default_user_agents(),
        }
    }
}

impl CrawlSettings {
    /// Creates settings for `base_url` with every other field at its default
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            crawl: CrawlSection {
                base_url: base_url.into(),
                delay_seconds: DEFAULT_DELAY_SECONDS,
                preserve_structure: true,
                request_timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            },
            output: OutputSection::default(),
            user_agent: UserAgentSection::default(),
        }
    }
}

/// Validated, immutable configuration for a single crawl run
///
/// The derived fields (`base_domain`, `base_path`) are computed once here and
/// never change for the lifetime of the run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    base_url: Url,
    base_domain: String,
    base_path: String,
    output_root: PathBuf,
    metadata_file: String,
    log_file: String,
    delay: Duration,
    preserve_structure: bool,
    request_timeout: Duration,
    user_agents: Vec<String>,
}

impl CrawlConfig {
    /// Builds a configuration for `base_url` using default settings
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Self::from_settings(CrawlSettings::new(base_url))
    }

    /// Validates raw settings and derives the run-constant fields
    pub fn from_settings(settings: CrawlSettings) -> Result<Self, ConfigError> {
        validate(&settings)?;

        let base_url = Url::parse(settings.crawl.base_url.trim())
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

        let base_domain = network_location(&base_url).ok_or_else(|| {
            ConfigError::InvalidUrl(format!("base_url '{}' has no host", base_url))
        })?;

        let base_path = base_url.path().trim_end_matches('/').to_string();

        Ok(Self {
            base_url,
            base_domain,
            base_path,
            output_root: PathBuf::from(settings.output.directory),
            metadata_file: settings.output.metadata_file,
            log_file: settings.output.log_file,
            delay: seconds_to_duration("delay_seconds", settings.crawl.delay_seconds)?,
            preserve_structure: settings.crawl.preserve_structure,
            request_timeout: seconds_to_duration(
                "request_timeout_seconds",
                settings.crawl.request_timeout_seconds,
            )?,
            user_agents: settings.user_agent.pool,
        })
    }

    /// The seed URL of the crawl
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Network location (`host[:port]`) every crawled URL must share
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Path of the base URL without its trailing separator
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.output_root.join(&self.metadata_file)
    }

    pub fn log_file_name(&self) -> &str {
        &self.log_file
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn preserve_structure(&self) -> bool {
        self.preserve_structure
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn user_agents(&self) -> &[String] {
        &self.user_agents
    }
}
